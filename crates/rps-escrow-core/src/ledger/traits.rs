//! Ledger trait definition.

use crate::address::Address;
use thiserror::Error;

/// Errors from ledger operations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds: account holds {available}, needs {required}")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("vault underflow: escrow holds {available}, release of {required} requested")]
    VaultUnderflow { available: u64, required: u64 },
}

/// Native-currency transfer primitives backing the registry's escrow.
///
/// The registry owns a single escrow vault: `collect` moves an attached
/// deposit from the caller's account into the vault, `release` disburses
/// out of it. Implementations can be:
/// - InMemoryLedger for tests, demos, and the bundled service
/// - An adapter over a real settlement layer in production
pub trait Ledger {
    /// Move `amount` from `from`'s account into the escrow vault
    fn collect(&self, from: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Release `amount` from the escrow vault to `to`
    fn release(&self, to: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Total amount currently held in the escrow vault
    fn escrowed(&self) -> u64;
}
