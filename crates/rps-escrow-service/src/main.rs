//! RPS Escrow Service
//!
//! HTTP facade over the commit-reveal game registry, backed by the
//! in-memory ledger. Caller identity travels in the `X-Caller` header.

mod handlers;
mod state;

use rps_escrow_core::Address;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fee: u64 = std::env::var("PARTICIPATION_FEE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000_000);

    let owner = Address::random();
    let state = AppState::new(owner, fee);

    // Pre-fund demo accounts so a client can play straight away.
    let player = Address::random();
    state.ledger().fund(&owner, 100 * fee);
    state.ledger().fund(&player, 100 * fee);
    tracing::info!("registry owner: {}", owner);
    tracing::info!("demo player: {}", player);
    tracing::info!("participation fee: {}", fee);

    let app = handlers::app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("escrow service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
