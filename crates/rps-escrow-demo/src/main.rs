//! RPS Escrow Demo
//!
//! Plays three games against the in-memory ledger: a decisive round, a
//! draw, and a cancellation, logging balances after each settlement.

use rps_escrow_core::{Address, Commitment, Hand, InMemoryLedger, Ledger, Registry, Secret};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const FEE: u64 = 100;

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ledger = InMemoryLedger::new();
    let owner = Address::random();
    let player = Address::random();
    ledger.fund(&owner, 1_000);
    ledger.fund(&player, 1_000);
    let mut registry = Registry::new(owner, FEE, ledger.clone());

    tracing::info!("owner {} / player {}", owner, player);

    // Decisive round: owner commits Rock, player answers Scissors, the
    // owner reveals blind and takes the pot.
    let secret = Secret::random();
    let commitment = Commitment::bind(&owner, Hand::Rock, &secret);
    let id = registry.initialize(&owner, commitment, FEE).unwrap();
    registry.join(&player, id, Hand::Scissors, FEE).unwrap();
    let outcome = registry.judge(&owner, id, &secret).unwrap();
    tracing::info!(
        ?outcome,
        owner_balance = ledger.balance(&owner),
        player_balance = ledger.balance(&player),
        "decisive round settled"
    );

    // Draw: both sides pick Paper; the player forces settlement with the
    // hand-asserted reveal and everyone gets their stake back.
    let secret = Secret::random();
    let commitment = Commitment::bind(&owner, Hand::Paper, &secret);
    let id = registry.initialize(&owner, commitment, FEE).unwrap();
    registry.join(&player, id, Hand::Paper, FEE).unwrap();
    let outcome = registry
        .judge_with_hand(&player, id, Hand::Paper, &secret)
        .unwrap();
    tracing::info!(
        ?outcome,
        owner_balance = ledger.balance(&owner),
        player_balance = ledger.balance(&player),
        "drawn round settled"
    );

    // Cancellation: nobody joins, the owner withdraws its stake.
    let secret = Secret::random();
    let commitment = Commitment::bind(&owner, Hand::Scissors, &secret);
    let id = registry.initialize(&owner, commitment, FEE).unwrap();
    registry.cancel(&owner, id).unwrap();
    tracing::info!(
        owner_balance = ledger.balance(&owner),
        escrowed = ledger.escrowed(),
        "cancelled game refunded"
    );

    // An unsolicited transfer lands in the vault and touches no game.
    registry.receive(&player, 25).unwrap();
    tracing::info!(escrowed = ledger.escrowed(), "unsolicited transfer held");
}
