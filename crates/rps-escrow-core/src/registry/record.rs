//! Game records and their lifecycle states.

use crate::address::Address;
use crate::crypto::Commitment;
use crate::game::Hand;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential game identifier, assigned at initialization
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    /// Create from a raw counter value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw counter value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a game record.
///
/// Advances forward only: Initialized -> InProgress -> Completed. A record
/// that was cancelled or settled stays Completed forever. Unknown
/// identifiers have no status at all; lookups return `None` for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Initialized,
    InProgress,
    Completed,
}

/// Settlement outcome recorded on a completed game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The full pot went to this address
    Winner(Address),
    /// No winner: a drawn round (stakes returned) or a cancelled game
    NoWinner,
}

/// One game record.
///
/// Created at initialization, mutated in place by the registry until
/// `Completed`, immutable afterwards. `stake` is fixed at creation;
/// `player`, `player_hand`, and `outcome` are write-once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub(crate) id: GameId,
    pub(crate) commitment: Commitment,
    pub(crate) stake: u64,
    pub(crate) status: GameStatus,
    pub(crate) player: Option<Address>,
    pub(crate) player_hand: Option<Hand>,
    pub(crate) outcome: Option<Outcome>,
}

impl Game {
    pub(crate) fn new(id: GameId, commitment: Commitment, stake: u64) -> Self {
        Self {
            id,
            commitment,
            stake,
            status: GameStatus::Initialized,
            player: None,
            player_hand: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    /// The owner's published commitment digest
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// Deposit captured at creation; the exact amount a joiner must match
    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The joined player, if any
    pub fn player(&self) -> Option<Address> {
        self.player
    }

    /// The joined player's hand, if any
    pub fn player_hand(&self) -> Option<Hand> {
        self.player_hand
    }

    /// Settlement outcome; `None` until the game completes
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}
