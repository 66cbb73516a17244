//! Protocol errors.

use crate::ledger::LedgerError;
use crate::registry::GameId;
use thiserror::Error;

/// A rejected registry operation.
///
/// Every rejection is atomic: no record is touched and the attached
/// deposit is not taken. Display strings are the protocol's wire-level
/// failure codes and must stay stable.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Owner-only entry point called by someone else
    #[error("caller is not the owner")]
    NotOwner,

    /// `initialize` deposit below the configured participation fee
    #[error("deposit amount error")]
    DepositBelowFee { fee: u64, deposited: u64 },

    /// `join` deposit does not equal the game's captured stake
    #[error("deposit amount mismatch")]
    DepositMismatch { stake: u64, deposited: u64 },

    /// `join` target is out of range or not currently joinable.
    /// One merged signal for both cases.
    #[error("invalid game ID")]
    InvalidGameId(GameId),

    /// The owner tried to join its own game
    #[error("cannot play alone")]
    CannotPlayAlone,

    /// `cancel` target is missing, already joined, or settled
    #[error("cannot cancel")]
    CannotCancel,

    /// Judge target is missing or not in progress
    #[error("invalid game status")]
    InvalidGameStatus,

    /// Judge caller is neither the owner nor the joined player
    #[error("invalid judger")]
    InvalidJudger,

    /// Blind reveal found no hand matching the stored commitment
    #[error("wrong commitment")]
    WrongCommitment,

    /// Asserted hand does not reproduce the stored commitment
    #[error("owner hand is not same with saved one")]
    HandMismatch,

    /// Fund movement failed underneath an otherwise valid operation
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
