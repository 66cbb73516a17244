//! RPS Escrow Core Library
//!
//! This crate provides the building blocks of a two-party, stake-escrowing
//! Rock-Paper-Scissors game on a commit-reveal protocol:
//! - Commitment codec binding {owner, hand, secret} to a one-way digest
//! - Game registry owning the record lifecycle, judging, and settlement
//! - Ledger abstraction for native-currency escrow

pub mod address;
pub mod crypto;
pub mod error;
pub mod game;
pub mod ledger;
pub mod registry;

pub use address::Address;
pub use crypto::{Commitment, Secret};
pub use error::GameError;
pub use game::{Hand, RoundResult};
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use registry::{Game, GameId, GameStatus, Outcome, Registry, RECEIVE_TAG};
