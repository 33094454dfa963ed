use thiserror::Error;

use crate::types::Side;

/// Why an input line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,
    #[error("input length must be at least 2, got {0}")]
    TooFewTokens(usize),
    #[error("malformed coordinate `{0}`")]
    MalformedToken(String),
    #[error("col out of bounds in `{token}`: {col}")]
    ColumnOutOfBounds { token: String, col: i64 },
    #[error("row out of bounds in `{token}`: {row}")]
    RowOutOfBounds { token: String, row: i64 },
    #[error("`{square}` is not a valid {side} piece")]
    NotYourPiece { square: String, side: Side },
    #[error("invalid destination `{0}`: square is occupied")]
    DestinationOccupied(String),
    #[error("unable to move from `{from}` to `{to}`")]
    IllegalStep { from: String, to: String },
}

/// Problems with a board size or a supplied layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("unsupported board size {size}: expected {min}..={max}")]
    UnsupportedSize { size: usize, min: usize, max: usize },
    #[error("expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[error("row {row}: expected {expected} cells, got {actual}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("row {row}, col {col}: unknown symbol {symbol:?}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
}
