use std::fmt;

use serde::Serialize;

/// One of the two players sharing the board.
///
/// Dark (`o`) starts at the bottom and moves first; Light (`x`) starts at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Dark,
    Light,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Dark => Side::Light,
            Side::Light => Side::Dark,
        }
    }

    /// Row delta of a man's forward step.
    pub fn forward(self) -> i32 {
        match self {
            Side::Dark => -1,
            Side::Light => 1,
        }
    }

    /// Symbol used for this side's men; kings use the uppercase form.
    pub fn symbol(self) -> char {
        match self {
            Side::Dark => 'o',
            Side::Light => 'x',
        }
    }

    /// Process exit code that announces this side as the winner.
    pub fn exit_code(self) -> u8 {
        match self {
            Side::Dark => 1,
            Side::Light => 2,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rank {
    Man,
    King,
}

/// A piece on the board: its owner and whether it has been crowned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub side: Side,
    pub rank: Rank,
}

impl Piece {
    pub const fn man(side: Side) -> Self {
        Self {
            side,
            rank: Rank::Man,
        }
    }

    pub const fn king(side: Side) -> Self {
        Self {
            side,
            rank: Rank::King,
        }
    }

    pub fn is_king(self) -> bool {
        self.rank == Rank::King
    }
}

/// Content of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Piece),
}

impl Cell {
    pub const DARK_MAN: Cell = Cell::Occupied(Piece::man(Side::Dark));
    pub const DARK_KING: Cell = Cell::Occupied(Piece::king(Side::Dark));
    pub const LIGHT_MAN: Cell = Cell::Occupied(Piece::man(Side::Light));
    pub const LIGHT_KING: Cell = Cell::Occupied(Piece::king(Side::Light));

    pub fn piece(self) -> Option<Piece> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(piece) => Some(piece),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn belongs_to(self, side: Side) -> bool {
        self.piece().is_some_and(|piece| piece.side == side)
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(piece) => match piece.rank {
                Rank::Man => piece.side.symbol(),
                Rank::King => piece.side.symbol().to_ascii_uppercase(),
            },
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Cell::Empty),
            'o' => Some(Cell::DARK_MAN),
            'O' => Some(Cell::DARK_KING),
            'x' => Some(Cell::LIGHT_MAN),
            'X' => Some(Cell::LIGHT_KING),
            _ => None,
        }
    }
}

/// A board coordinate. Row 0 is the top rank as printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinates {
    pub row: i32,
    pub col: i32,
}

impl Coordinates {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn is_valid(self) -> bool {
        self.row >= 0 && self.col >= 0
    }

    pub fn offset(self, drow: i32, dcol: i32) -> Self {
        Self::new(self.row + drow, self.col + dcol)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Public game state for whoever drives the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// One string per row, one symbol per cell.
    pub rows: Vec<String>,
    pub current_player: Side,
    pub dark_count: usize,
    pub light_count: usize,
    pub is_running: bool,
    /// Contract:
    /// - `None` while the game is running.
    /// - `Some(side)` once a win condition has been detected.
    pub winner: Option<Side>,
    /// Squares emptied by the captures of the last accepted input.
    pub captured: Vec<Coordinates>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Side,
    pub dark_count: usize,
    pub light_count: usize,
}
