use std::fmt;

use crate::config::{MAX_BOARD_SIZE, MIN_BOARD_SIZE, OpeningLayout};
use crate::error::BoardError;
use crate::types::{Cell, Coordinates, Piece, Rank, Side};

const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const MAX_OPENING_RANKS: usize = 3;

/// What a committed step did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Move { promoted: bool },
    Capture { captured: Coordinates, promoted: bool },
}

impl Step {
    pub fn is_capture(self) -> bool {
        matches!(self, Step::Capture { .. })
    }

    pub fn promoted(self) -> bool {
        match self {
            Step::Move { promoted } | Step::Capture { promoted, .. } => promoted,
        }
    }
}

/// Checkers board state: `size` rows of `size` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates a board with every square empty.
    pub fn empty(size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        Ok(Self {
            size,
            cells: vec![vec![Cell::Empty; size]; size],
        })
    }

    pub fn with_opening(size: usize, layout: OpeningLayout) -> Result<Self, BoardError> {
        let mut board = Self::empty(size)?;
        board.lay_out(layout);
        Ok(board)
    }

    /// Overwrites every square with the given opening position.
    /// Pieces only ever stand on squares where `row + col` is odd.
    pub fn lay_out(&mut self, layout: OpeningLayout) {
        let size = self.size;
        let (light_rows, dark_rows, dark_rank) = match layout {
            OpeningLayout::Standard => {
                let ranks = opening_ranks(size);
                (0..ranks, size - ranks..size, Rank::Man)
            }
            OpeningLayout::Legacy => {
                let first_dark_row = size.saturating_sub(MAX_OPENING_RANKS).max(1);
                (0..1, first_dark_row..size, Rank::King)
            }
        };

        for (row, cells) in self.cells.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = if !is_playable(row, col) {
                    Cell::Empty
                } else if light_rows.contains(&row) {
                    Cell::LIGHT_MAN
                } else if dark_rows.contains(&row) {
                    Cell::Occupied(Piece {
                        side: Side::Dark,
                        rank: dark_rank,
                    })
                } else {
                    Cell::Empty
                };
            }
        }
    }

    /// Parses the plain-text layout format: one line per row, one symbol per cell.
    pub fn parse_rows(text: &str, size: usize) -> Result<Vec<Vec<Cell>>, BoardError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() != size {
            return Err(BoardError::RowCount {
                expected: size,
                actual: lines.len(),
            });
        }

        lines
            .iter()
            .enumerate()
            .map(|(row, line)| {
                let len = line.chars().count();
                if len != size {
                    return Err(BoardError::RowLength {
                        row,
                        expected: size,
                        actual: len,
                    });
                }
                line.chars()
                    .enumerate()
                    .map(|(col, symbol)| {
                        Cell::from_symbol(symbol)
                            .ok_or(BoardError::UnknownSymbol { row, col, symbol })
                    })
                    .collect()
            })
            .collect()
    }

    /// Takes ownership of externally supplied rows.
    /// On a shape mismatch the current cells are kept and an error is returned.
    pub fn replace_rows(&mut self, rows: Vec<Vec<Cell>>) -> Result<(), BoardError> {
        if rows.len() != self.size {
            return Err(BoardError::RowCount {
                expected: self.size,
                actual: rows.len(),
            });
        }
        let ragged = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != self.size);
        if let Some((row, cells)) = ragged {
            return Err(BoardError::RowLength {
                row,
                expected: self.size,
                actual: cells.len(),
            });
        }

        self.cells = rows;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn contains(&self, coord: Coordinates) -> bool {
        self.index(coord).is_some()
    }

    pub fn get(&self, coord: Coordinates) -> Option<Cell> {
        let (row, col) = self.index(coord)?;
        self.cells.get(row)?.get(col).copied()
    }

    /// Number of pieces owned by `side`.
    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.belongs_to(side))
            .count()
    }

    /// Returns `(dark_count, light_count)`.
    pub fn counts(&self) -> (usize, usize) {
        (self.count(Side::Dark), self.count(Side::Light))
    }

    /// Squares holding a piece of `side`, top row first.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Coordinates> + '_ {
        self.cells.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(move |(_, cell)| cell.belongs_to(side))
                .map(move |(col, _)| Coordinates::new(row as i32, col as i32))
        })
    }

    /// The rank on which men of `side` are crowned.
    pub fn back_rank(&self, side: Side) -> i32 {
        match side {
            Side::Dark => 0,
            Side::Light => self.size as i32 - 1,
        }
    }

    /// Legality of a single step, ignoring what lies on a jumped square.
    ///
    /// The destination must be empty and lie on a diagonal one or two squares
    /// away; men may only head toward the opposing back rank.
    pub fn can_move(&self, origin: Coordinates, dest: Coordinates) -> bool {
        let Some(piece) = self.get(origin).and_then(Cell::piece) else {
            return false;
        };
        if self.get(dest) != Some(Cell::Empty) || !is_reachable(origin, dest, 2) {
            return false;
        }

        match piece.rank {
            Rank::King => true,
            Rank::Man => (dest.row - origin.row).signum() == piece.side.forward(),
        }
    }

    /// A step that jumps over an opposing piece.
    pub fn can_capture(&self, origin: Coordinates, dest: Coordinates) -> bool {
        if !is_capture(origin, dest) || !self.can_move(origin, dest) {
            return false;
        }
        let Some(piece) = self.get(origin).and_then(Cell::piece) else {
            return false;
        };
        self.get(jumped_square(origin, dest))
            .is_some_and(|cell| cell.belongs_to(piece.side.opponent()))
    }

    /// Applies one step. Returns `None` and leaves the board unchanged when
    /// the step is illegal.
    pub fn move_piece(&mut self, origin: Coordinates, dest: Coordinates) -> Option<Step> {
        if !self.can_move(origin, dest) {
            return None;
        }

        if is_capture(origin, dest) {
            self.handle_capture(origin, dest)
        } else {
            self.handle_move(origin, dest)
                .map(|promoted| Step::Move { promoted })
        }
    }

    /// Every destination the piece at `origin` can reach this turn.
    pub fn possible_moves(&self, origin: Coordinates) -> Vec<Coordinates> {
        let Some(piece) = self.get(origin).and_then(Cell::piece) else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        for (drow, dcol) in DIAGONALS {
            if !piece.is_king() && drow != piece.side.forward() {
                continue;
            }
            for distance in 1..=2 {
                let dest = origin.offset(drow * distance, dcol * distance);
                if !self.contains(dest) {
                    continue;
                }
                let legal = if distance == 1 {
                    self.can_move(origin, dest)
                } else {
                    self.can_capture(origin, dest)
                };
                if legal {
                    moves.push(dest);
                }
            }
        }
        moves
    }

    pub fn has_any_move(&self, side: Side) -> bool {
        self.pieces(side)
            .any(|origin| !self.possible_moves(origin).is_empty())
    }

    /// Renders each row as a string of cell symbols.
    pub fn row_strings(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|cells| cells.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    /// Relocates the piece and crowns it on arrival. Returns whether it was crowned.
    fn handle_move(&mut self, origin: Coordinates, dest: Coordinates) -> Option<bool> {
        let mut piece = self.get(origin).and_then(Cell::piece)?;
        let promoted = piece.rank == Rank::Man && dest.row == self.back_rank(piece.side);
        if promoted {
            piece.rank = Rank::King;
        }

        self.set(origin, Cell::Empty);
        self.set(dest, Cell::Occupied(piece));
        Some(promoted)
    }

    fn handle_capture(&mut self, origin: Coordinates, dest: Coordinates) -> Option<Step> {
        let piece = self.get(origin).and_then(Cell::piece)?;
        let captured = jumped_square(origin, dest);
        let victim = self.get(captured)?;
        if !victim.belongs_to(piece.side.opponent()) {
            return None;
        }

        self.set(captured, Cell::Empty);
        let promoted = self.handle_move(origin, dest)?;
        Some(Step::Capture { captured, promoted })
    }

    fn set(&mut self, coord: Coordinates, cell: Cell) {
        if let Some((row, col)) = self.index(coord) {
            if let Some(slot) = self.cells.get_mut(row).and_then(|cells| cells.get_mut(col)) {
                *slot = cell;
            }
        }
    }

    fn index(&self, coord: Coordinates) -> Option<(usize, usize)> {
        let row = usize::try_from(coord.row).ok()?;
        let col = usize::try_from(coord.col).ok()?;
        (row < self.size && col < self.size).then_some((row, col))
    }
}

impl fmt::Display for Board {
    /// Column letters above and below, ranks counted down from `size` on both sides.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.size.to_string().len();
        let letters: Vec<String> = (b'a'..)
            .take(self.size)
            .map(|letter| char::from(letter).to_string())
            .collect();
        let header = format!("{:width$} {}", "", letters.join(" "));

        writeln!(f, "{header}")?;
        for (row, cells) in self.cells.iter().enumerate() {
            let rank = self.size - row;
            write!(f, "{rank:>width$}")?;
            for cell in cells {
                write!(f, " {}", cell.symbol())?;
            }
            writeln!(f, " {rank}")?;
        }
        write!(f, "{header}")
    }
}

/// A step of row distance 2 is a capture; distance 1 is a plain move.
pub fn is_capture(origin: Coordinates, dest: Coordinates) -> bool {
    (dest.row - origin.row).abs() == 2
}

/// The square between `origin` and `dest`, one step back from `dest`.
fn jumped_square(origin: Coordinates, dest: Coordinates) -> Coordinates {
    dest.offset(
        -(dest.row - origin.row).signum(),
        -(dest.col - origin.col).signum(),
    )
}

fn is_reachable(a: Coordinates, b: Coordinates, steps: i32) -> bool {
    let row_diff = (a.row - b.row).abs();
    let col_diff = (a.col - b.col).abs();
    row_diff == col_diff && (1..=steps).contains(&row_diff)
}

fn is_playable(row: usize, col: usize) -> bool {
    (row + col) % 2 == 1
}

fn opening_ranks(size: usize) -> usize {
    ((size - 2) / 2).min(MAX_OPENING_RANKS)
}

fn check_size(size: usize) -> Result<(), BoardError> {
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(BoardError::UnsupportedSize {
            size,
            min: MIN_BOARD_SIZE,
            max: MAX_BOARD_SIZE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: i32, col: i32) -> Coordinates {
        Coordinates::new(row, col)
    }

    fn board_from(text: &str) -> Board {
        let size = text.lines().count();
        let mut board = Board::empty(size).unwrap();
        board
            .replace_rows(Board::parse_rows(text, size).unwrap())
            .unwrap();
        board
    }

    const LONE_MEN: &str = "\
........
........
........
....x...
...o....
........
........
........";

    #[test]
    fn standard_opening_has_twelve_men_a_side_on_dark_squares() {
        let board = Board::with_opening(8, OpeningLayout::Standard).unwrap();

        assert_eq!(board.counts(), (12, 12));
        for (row, cells) in board.rows().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if !cell.is_empty() {
                    assert!(is_playable(row, col), "piece on light square {row},{col}");
                    assert!(!cell.piece().unwrap().is_king());
                }
            }
        }
        assert!(board.rows()[3].iter().all(|cell| cell.is_empty()));
        assert!(board.rows()[4].iter().all(|cell| cell.is_empty()));
        assert_eq!(board.get(at(0, 1)), Some(Cell::LIGHT_MAN));
        assert_eq!(board.get(at(5, 0)), Some(Cell::DARK_MAN));
    }

    #[test]
    fn legacy_opening_reproduces_single_light_rank_against_dark_kings() {
        let board = Board::with_opening(8, OpeningLayout::Legacy).unwrap();

        assert_eq!(board.row_strings()[0], ".x.x.x.x");
        assert_eq!(board.row_strings()[5], "O.O.O.O.");
        assert_eq!(board.row_strings()[7], "O.O.O.O.");
        assert_eq!(board.counts(), (12, 4));
        assert!(board.rows()[1..5].iter().flatten().all(|cell| cell.is_empty()));
    }

    #[test]
    fn unsupported_sizes_are_rejected() {
        assert!(matches!(
            Board::empty(3),
            Err(BoardError::UnsupportedSize { size: 3, .. })
        ));
        assert!(Board::empty(27).is_err());
        assert!(Board::empty(26).is_ok());
    }

    #[test]
    fn can_move_requires_short_equal_diagonal() {
        let board = board_from(LONE_MEN);
        let dark = at(4, 3);

        assert!(board.can_move(dark, at(3, 2)));
        assert!(!board.can_move(dark, at(3, 3)), "straight up");
        assert!(!board.can_move(dark, at(4, 4)), "sideways");
        assert!(!board.can_move(dark, at(2, 2)), "unequal deltas");
        assert!(!board.can_move(dark, at(1, 0)), "three squares away");
        assert!(!board.can_move(dark, dark), "zero distance");
        assert!(!board.can_move(dark, at(3, 4)), "occupied");
        assert!(!board.can_move(dark, at(4, 9)), "off board");
    }

    #[test]
    fn men_only_move_forward_and_kings_both_ways() {
        let board = board_from(LONE_MEN);

        assert!(!board.can_move(at(4, 3), at(5, 2)), "dark man backwards");
        assert!(board.can_move(at(3, 4), at(4, 5)), "light man forwards");
        assert!(!board.can_move(at(3, 4), at(2, 3)), "light man backwards");

        let kings = board_from(&LONE_MEN.replace('o', "O"));
        assert!(kings.can_move(at(4, 3), at(5, 2)));
        assert!(kings.can_move(at(4, 3), at(3, 2)));
    }

    #[test]
    fn capture_removes_jumped_piece() {
        let mut board = board_from(LONE_MEN);

        let step = board.move_piece(at(4, 3), at(2, 5));

        assert_eq!(
            step,
            Some(Step::Capture {
                captured: at(3, 4),
                promoted: false
            })
        );
        assert_eq!(board.get(at(3, 4)), Some(Cell::Empty));
        assert_eq!(board.get(at(4, 3)), Some(Cell::Empty));
        assert_eq!(board.get(at(2, 5)), Some(Cell::DARK_MAN));
        assert_eq!(board.counts(), (1, 0));
    }

    #[test]
    fn capture_over_empty_or_friendly_square_leaves_board_unchanged() {
        let mut board = board_from(LONE_MEN);
        let before = board.clone();
        assert_eq!(board.move_piece(at(4, 3), at(2, 1)), None);
        assert_eq!(board, before);

        let mut friendly = board_from(&LONE_MEN.replace('x', "o"));
        let before = friendly.clone();
        assert!(!friendly.can_capture(at(4, 3), at(2, 5)));
        assert_eq!(friendly.move_piece(at(4, 3), at(2, 5)), None);
        assert_eq!(friendly, before);
    }

    #[test]
    fn man_is_crowned_on_reaching_back_rank() {
        let mut board = board_from(
            "\
........
o.......
........
........
........
........
.......x
........",
        );

        assert_eq!(
            board.move_piece(at(1, 0), at(0, 1)),
            Some(Step::Move { promoted: true })
        );
        assert_eq!(board.get(at(0, 1)), Some(Cell::DARK_KING));

        assert_eq!(
            board.move_piece(at(6, 7), at(7, 6)),
            Some(Step::Move { promoted: true })
        );
        assert_eq!(board.get(at(7, 6)), Some(Cell::LIGHT_KING));

        // Crowning only happens on arrival; a king moving along does not change.
        assert_eq!(
            board.move_piece(at(0, 1), at(1, 2)),
            Some(Step::Move { promoted: false })
        );
    }

    #[test]
    fn capture_landing_on_back_rank_crowns() {
        let mut board = board_from(
            "\
........
.x......
o.......
........
........
........
........
........",
        );

        assert_eq!(
            board.move_piece(at(2, 0), at(0, 2)),
            Some(Step::Capture {
                captured: at(1, 1),
                promoted: true
            })
        );
        assert_eq!(board.get(at(0, 2)), Some(Cell::DARK_KING));
        assert_eq!(board.counts(), (1, 0));
    }

    #[test]
    fn possible_moves_cover_candidate_set() {
        let board = board_from(LONE_MEN);

        let mut dark = board.possible_moves(at(4, 3));
        dark.sort_by_key(|c| (c.row, c.col));
        assert_eq!(dark, vec![at(2, 5), at(3, 2)]);

        let kings = board_from(&LONE_MEN.replace('o', "O"));
        let mut king = kings.possible_moves(at(4, 3));
        king.sort_by_key(|c| (c.row, c.col));
        assert_eq!(king, vec![at(2, 5), at(3, 2), at(5, 2), at(5, 4)]);

        assert!(board.possible_moves(at(0, 0)).is_empty());
    }

    #[test]
    fn blocked_men_have_no_moves() {
        let board = board_from(
            "\
.x......
o.o.....
...o....
........
........
........
........
........",
        );

        assert!(board.possible_moves(at(0, 1)).is_empty());
        assert!(!board.has_any_move(Side::Light));
        assert!(board.has_any_move(Side::Dark));
    }

    #[test]
    fn parse_rows_reports_shape_and_symbol_errors() {
        assert_eq!(
            Board::parse_rows("....\n....\n....", 4),
            Err(BoardError::RowCount {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            Board::parse_rows("....\n...\n....\n....", 4),
            Err(BoardError::RowLength {
                row: 1,
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            Board::parse_rows("....\n..k.\n....\n....", 4),
            Err(BoardError::UnknownSymbol {
                row: 1,
                col: 2,
                symbol: 'k'
            })
        );
        assert!(Board::parse_rows(".x.x\r\n....\n....\no.o.\n", 4).is_ok());
    }

    #[test]
    fn failed_replace_keeps_current_cells() {
        let mut board = Board::with_opening(8, OpeningLayout::Standard).unwrap();
        let before = board.clone();

        let err = board.replace_rows(vec![vec![Cell::Empty; 8]; 7]).unwrap_err();
        assert_eq!(
            err,
            BoardError::RowCount {
                expected: 8,
                actual: 7
            }
        );
        let mut ragged = vec![vec![Cell::Empty; 8]; 8];
        ragged[6].pop();
        assert!(board.replace_rows(ragged).is_err());
        assert!(board.replace_rows(Vec::new()).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn display_matches_console_layout() {
        let board = Board::with_opening(8, OpeningLayout::Standard).unwrap();
        let expected = "  a b c d e f g h
8 . x . x . x . x 8
7 x . x . x . x . 7
6 . x . x . x . x 6
5 . . . . . . . . 5
4 . . . . . . . . 4
3 o . o . o . o . 3
2 . o . o . o . o 2
1 o . o . o . o . 1
  a b c d e f g h";

        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn display_aligns_two_digit_ranks() {
        let board = Board::empty(10).unwrap();
        let rendered = board.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "   a b c d e f g h i j");
        assert_eq!(lines[1], "10 . . . . . . . . . . 10");
        assert_eq!(lines[10], " 1 . . . . . . . . . . 1");
    }
}
