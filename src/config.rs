//! Engine configuration chosen once, before the first move.

use serde::Serialize;

pub const DEFAULT_BOARD_SIZE: usize = 8;
/// Smallest board that leaves an empty rank between the two armies.
pub const MIN_BOARD_SIZE: usize = 4;
/// Columns are typed as single letters `a..=z`.
pub const MAX_BOARD_SIZE: usize = 26;

/// Which starting position `Board::with_opening` lays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OpeningLayout {
    /// Both sides start with men on their first ranks.
    #[default]
    Standard,
    /// The historical asymmetric opening: a single rank of Light men against
    /// three ranks of Dark kings.
    Legacy,
}

/// What happens to already applied steps when a later step of a chain fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChainPolicy {
    /// The whole chain is applied or none of it.
    #[default]
    Atomic,
    /// Steps before the failing one stay on the board.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    pub size: usize,
    pub opening: OpeningLayout,
    pub chain_policy: ChainPolicy,
}

impl GameConfig {
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            opening: OpeningLayout::default(),
            chain_policy: ChainPolicy::default(),
        }
    }
}
