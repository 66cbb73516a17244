//! Application state management.

use rps_escrow_core::{Address, InMemoryLedger, Registry};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared application state: one registry behind a single lock.
///
/// Registry operations are atomic read-modify-writes over shared counters,
/// so one mutex carries the core's serialization contract into the HTTP
/// layer.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<Mutex<Registry<InMemoryLedger>>>,
    ledger: InMemoryLedger,
}

impl AppState {
    /// Create a registry over a fresh in-memory ledger
    pub fn new(owner: Address, participation_fee: u64) -> Self {
        let ledger = InMemoryLedger::new();
        Self {
            registry: Arc::new(Mutex::new(Registry::new(
                owner,
                participation_fee,
                ledger.clone(),
            ))),
            ledger,
        }
    }

    /// Lock the registry for one operation
    pub fn registry(&self) -> MutexGuard<'_, Registry<InMemoryLedger>> {
        self.registry.lock().unwrap()
    }

    /// Handle to the ledger backing the registry
    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }
}
