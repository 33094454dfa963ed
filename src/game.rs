use crate::board::{Board, Step};
use crate::config::{ChainPolicy, GameConfig};
use crate::error::{BoardError, MoveError};
use crate::types::{Cell, Coordinates, GameResult, GameSnapshot, Side};

/// What an accepted input did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// The side that moved.
    pub side: Side,
    /// Starting square followed by every landing square.
    pub path: Vec<Coordinates>,
    pub captured: Vec<Coordinates>,
    pub promoted: bool,
    /// Set when this input ended the game.
    pub winner: Option<Side>,
}

#[derive(Debug, Default)]
struct Chain {
    path: Vec<Coordinates>,
    captured: Vec<Coordinates>,
    promoted: bool,
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    config: GameConfig,
    current_player: Side,
    is_running: bool,
    winner: Option<Side>,
    captured: Vec<Coordinates>,
}

impl Game {
    /// Creates a game with the configured opening laid out. Dark moves first.
    pub fn new(config: GameConfig) -> Result<Self, BoardError> {
        Ok(Self {
            board: Board::with_opening(config.size, config.opening)?,
            config,
            current_player: Side::Dark,
            is_running: true,
            winner: None,
            captured: Vec::new(),
        })
    }

    pub fn with_size(size: usize) -> Result<Self, BoardError> {
        Self::new(GameConfig::with_size(size))
    }

    /// Lays the configured opening position out again.
    pub fn initialize_board(&mut self) {
        self.board.lay_out(self.config.opening);
    }

    /// Installs an externally built board. The rows must be exactly
    /// `size` x `size`; otherwise the current board is kept.
    pub fn initialize_custom_board(&mut self, rows: Vec<Vec<Cell>>) -> Result<(), BoardError> {
        self.board.replace_rows(rows)
    }

    /// Parses a text layout (one line per row) and installs it.
    pub fn load_board_text(&mut self, text: &str) -> Result<(), BoardError> {
        let rows = Board::parse_rows(text, self.board.size())?;
        self.initialize_custom_board(rows)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn current_player(&self) -> Side {
        self.current_player
    }

    /// Only meaningful once `is_running()` is false.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Resolves a typed square such as `b4` to board coordinates.
    ///
    /// The token must be a lowercase column letter followed by the rank
    /// digits; ranks count down from `size` at the top row to 1 at the bottom.
    pub fn coordinates(&self, token: &str) -> Result<Coordinates, MoveError> {
        let (letter, digits) = validate_format(token)?;
        let size = self.board.size() as i64;

        let col = i64::from(u32::from(letter) - u32::from('a'));
        if col >= size {
            return Err(MoveError::ColumnOutOfBounds {
                token: token.to_string(),
                col,
            });
        }

        let row = digits
            .parse::<i64>()
            .map_or(i64::MIN, |rank| size - rank);
        if !(0..size).contains(&row) {
            return Err(MoveError::RowOutOfBounds {
                token: token.to_string(),
                row,
            });
        }

        Ok(Coordinates::new(row as i32, col as i32))
    }

    /// Inverse of [`Game::coordinates`]. Returns `None` for squares off the board.
    pub fn square_name(&self, coord: Coordinates) -> Option<String> {
        if !self.board.contains(coord) {
            return None;
        }
        let letter = char::from(b'a' + coord.col as u8);
        let rank = self.board.size() as i32 - coord.row;
        Some(format!("{letter}{rank}"))
    }

    /// Applies one typed command: the piece to move, then its destination chain.
    ///
    /// Every token is validated before the board is touched. Captures chain
    /// into the next token; a plain move ends the command and any further
    /// tokens are ignored. On success the win condition is evaluated and, if
    /// the game goes on, the turn passes.
    pub fn process_input<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<TurnReport, MoveError> {
        if !self.is_running {
            return Err(MoveError::GameOver);
        }
        if tokens.len() < 2 {
            return Err(MoveError::TooFewTokens(tokens.len()));
        }

        let squares = tokens
            .iter()
            .map(|token| {
                let token = token.as_ref();
                self.coordinates(token).map(|coord| (token, coord))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let side = self.current_player;
        let (origin_token, origin) = squares[0];
        if !self.board.get(origin).is_some_and(|cell| cell.belongs_to(side)) {
            return Err(MoveError::NotYourPiece {
                square: origin_token.to_string(),
                side,
            });
        }

        let chain = match self.config.chain_policy {
            ChainPolicy::Atomic => {
                let mut scratch = self.board.clone();
                let chain = apply_chain(&mut scratch, &squares)?;
                self.board = scratch;
                chain
            }
            ChainPolicy::BestEffort => apply_chain(&mut self.board, &squares)?,
        };

        self.captured = chain.captured.clone();
        let winner = self.check_win_condition();
        if winner.is_none() {
            self.next_turn();
        }

        Ok(TurnReport {
            side,
            path: chain.path,
            captured: chain.captured,
            promoted: chain.promoted,
            winner,
        })
    }

    /// Evaluates the losing conditions in a fixed order and latches the result:
    /// Dark without pieces, Light without pieces, Dark without a move, Light
    /// without a move.
    pub fn check_win_condition(&mut self) -> Option<Side> {
        if let Some(winner) = self.winner {
            return Some(winner);
        }

        let (dark_count, light_count) = self.board.counts();
        let winner = if dark_count == 0 {
            Some(Side::Light)
        } else if light_count == 0 {
            Some(Side::Dark)
        } else if !self.board.has_any_move(Side::Dark) {
            Some(Side::Light)
        } else if !self.board.has_any_move(Side::Light) {
            Some(Side::Dark)
        } else {
            None
        };

        if winner.is_some() {
            self.is_running = false;
            self.winner = winner;
        }
        winner
    }

    pub fn possible_moves(&self, origin: Coordinates) -> Vec<Coordinates> {
        self.board.possible_moves(origin)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let (dark_count, light_count) = self.board.counts();
        GameSnapshot {
            rows: self.board.row_strings(),
            current_player: self.current_player,
            dark_count,
            light_count,
            is_running: self.is_running,
            winner: self.winner,
            captured: self.captured.clone(),
        }
    }

    /// `None` while the game is still running.
    pub fn result(&self) -> Option<GameResult> {
        let winner = self.winner?;
        let (dark_count, light_count) = self.board.counts();
        Some(GameResult {
            winner,
            dark_count,
            light_count,
        })
    }

    fn next_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    #[cfg(test)]
    fn set_turn_for_test(&mut self, side: Side) {
        self.current_player = side;
    }
}

/// Walks the destination chain on `board`. Steps applied before a failing
/// step stay on `board`; the caller decides whether to keep them.
fn apply_chain(board: &mut Board, squares: &[(&str, Coordinates)]) -> Result<Chain, MoveError> {
    let Some((&(first_token, first), rest)) = squares.split_first() else {
        return Ok(Chain::default());
    };

    let (mut from_token, mut from) = (first_token, first);
    let mut chain = Chain {
        path: vec![from],
        ..Chain::default()
    };

    for &(to_token, to) in rest {
        if board.get(to) != Some(Cell::Empty) {
            return Err(MoveError::DestinationOccupied(to_token.to_string()));
        }

        let step = board
            .move_piece(from, to)
            .ok_or_else(|| MoveError::IllegalStep {
                from: from_token.to_string(),
                to: to_token.to_string(),
            })?;

        chain.path.push(to);
        chain.promoted |= step.promoted();
        match step {
            Step::Capture { captured, .. } => {
                chain.captured.push(captured);
                from = to;
                from_token = to_token;
            }
            Step::Move { .. } => break,
        }
    }

    Ok(chain)
}

/// Splits a token into its column letter and rank digits.
fn validate_format(token: &str) -> Result<(char, &str), MoveError> {
    let malformed = || MoveError::MalformedToken(token.to_string());

    let mut chars = token.chars();
    let letter = chars
        .next()
        .filter(char::is_ascii_lowercase)
        .ok_or_else(malformed)?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    Ok((letter, digits))
}
