//! In-memory ledger for tests, demos, and the bundled service.

use super::traits::{Ledger, LedgerError};
use crate::address::Address;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct LedgerBook {
    accounts: HashMap<Address, u64>,
    vault: u64,
}

/// In-memory account book with a single escrow vault
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    inner: Arc<Mutex<LedgerBook>>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air (test and demo setup)
    pub fn fund(&self, account: &Address, amount: u64) {
        let mut book = self.inner.lock().unwrap();
        let balance = book.accounts.entry(*account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Current balance of an account
    pub fn balance(&self, account: &Address) -> u64 {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .get(account)
            .copied()
            .unwrap_or(0)
    }
}

impl Ledger for InMemoryLedger {
    fn collect(&self, from: &Address, amount: u64) -> Result<(), LedgerError> {
        let mut book = self.inner.lock().unwrap();
        let balance = book.accounts.entry(*from).or_insert(0);
        if *balance < amount {
            return Err(LedgerError::InsufficientFunds {
                available: *balance,
                required: amount,
            });
        }
        *balance -= amount;
        book.vault = book.vault.saturating_add(amount);
        Ok(())
    }

    fn release(&self, to: &Address, amount: u64) -> Result<(), LedgerError> {
        let mut book = self.inner.lock().unwrap();
        if book.vault < amount {
            return Err(LedgerError::VaultUnderflow {
                available: book.vault,
                required: amount,
            });
        }
        book.vault -= amount;
        let balance = book.accounts.entry(*to).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    fn escrowed(&self) -> u64 {
        self.inner.lock().unwrap().vault
    }
}
