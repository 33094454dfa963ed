//! Two-player console checkers: board state, move validation, captures,
//! promotion, turn order and win detection.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod types;

pub use board::{Board, Step};
pub use config::{ChainPolicy, GameConfig, OpeningLayout};
pub use error::{BoardError, MoveError};
pub use game::{Game, TurnReport};
pub use types::{Cell, Coordinates, GameResult, GameSnapshot, Piece, Rank, Side};
