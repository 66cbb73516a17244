//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rps_escrow_core::{
    Address, Commitment, Game, GameError, GameId, GameStatus, Hand, Ledger, Outcome, Secret,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

// ============ Request/Response types ============

#[derive(Deserialize)]
pub struct InitializeRequest {
    pub commitment: String,
    pub deposit: u64,
}

#[derive(Serialize)]
pub struct InitializeResponse {
    pub id: u64,
}

#[derive(Deserialize)]
pub struct JoinRequest {
    pub hand: Hand,
    pub deposit: u64,
}

#[derive(Deserialize)]
pub struct JudgeRequest {
    pub secret: String,
}

#[derive(Deserialize)]
pub struct JudgeWithHandRequest {
    pub hand: Hand,
    pub secret: String,
}

#[derive(Serialize)]
pub struct JudgeResponse {
    /// Settlement recipient; `None` on a draw
    pub winner: Option<String>,
}

#[derive(Deserialize)]
pub struct FeeRequest {
    pub fee: u64,
}

#[derive(Deserialize)]
pub struct TransferRequest {
    pub amount: u64,
}

#[derive(Deserialize)]
pub struct FundRequest {
    pub amount: u64,
}

#[derive(Serialize)]
pub struct GameResponse {
    pub id: u64,
    pub commitment: String,
    pub stake: u64,
    pub status: GameStatus,
    pub player: Option<String>,
    pub player_hand: Option<Hand>,
    pub settled: bool,
    pub winner: Option<String>,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        let winner = match game.outcome() {
            Some(Outcome::Winner(address)) => Some(address.to_string()),
            _ => None,
        };
        Self {
            id: game.id().as_u64(),
            commitment: game.commitment().to_string(),
            stake: game.stake(),
            status: game.status(),
            player: game.player().map(|p| p.to_string()),
            player_hand: game.player_hand(),
            settled: game.outcome().is_some(),
            winner,
        }
    }
}

#[derive(Serialize)]
pub struct RegistryResponse {
    pub owner: String,
    pub participation_fee: u64,
    pub next_game_id: u64,
    pub escrowed: u64,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: u64,
}

// ============ Plumbing ============

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

fn game_error(err: GameError) -> ApiError {
    let status = match err {
        GameError::NotOwner | GameError::InvalidJudger => StatusCode::FORBIDDEN,
        _ => StatusCode::BAD_REQUEST,
    };
    error_body(status, err.to_string())
}

fn caller(headers: &HeaderMap) -> Result<Address, ApiError> {
    headers
        .get("X-Caller")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            error_body(
                StatusCode::UNAUTHORIZED,
                "missing or invalid X-Caller header",
            )
        })
}

fn digest32(hex_str: &str) -> Result<[u8; 32], ApiError> {
    let bytes = hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))
        .map_err(|_| error_body(StatusCode::BAD_REQUEST, "invalid hex digest"))?;
    bytes
        .try_into()
        .map_err(|_| error_body(StatusCode::BAD_REQUEST, "digest must be 32 bytes"))
}

// ============ Game handlers ============

pub async fn initialize_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<InitializeRequest>,
) -> Result<Json<InitializeResponse>, ApiError> {
    let caller = caller(&headers)?;
    let commitment = Commitment::from_bytes(digest32(&req.commitment)?);

    let id = state
        .registry()
        .initialize(&caller, commitment, req.deposit)
        .map_err(game_error)?;

    Ok(Json(InitializeResponse { id: id.as_u64() }))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<GameResponse>, ApiError> {
    let registry = state.registry();
    let game = registry
        .game(GameId::new(id))
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "game not found"))?;
    Ok(Json(GameResponse::from(game)))
}

pub async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<JoinRequest>,
) -> Result<Json<GameResponse>, ApiError> {
    let caller = caller(&headers)?;

    let mut registry = state.registry();
    registry
        .join(&caller, GameId::new(id), req.hand, req.deposit)
        .map_err(game_error)?;

    // Just joined, so the record exists.
    let game = registry
        .game(GameId::new(id))
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "game not found"))?;
    Ok(Json(GameResponse::from(game)))
}

pub async fn cancel_game(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let caller = caller(&headers)?;

    state
        .registry()
        .cancel(&caller, GameId::new(id))
        .map_err(game_error)?;

    Ok(StatusCode::OK)
}

pub async fn judge_game(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<JudgeRequest>,
) -> Result<Json<JudgeResponse>, ApiError> {
    let caller = caller(&headers)?;
    let secret = Secret::from_bytes(digest32(&req.secret)?);

    let outcome = state
        .registry()
        .judge(&caller, GameId::new(id), &secret)
        .map_err(game_error)?;

    Ok(Json(JudgeResponse {
        winner: match outcome {
            Outcome::Winner(address) => Some(address.to_string()),
            Outcome::NoWinner => None,
        },
    }))
}

pub async fn judge_game_with_hand(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(req): Json<JudgeWithHandRequest>,
) -> Result<Json<JudgeResponse>, ApiError> {
    let caller = caller(&headers)?;
    let secret = Secret::from_bytes(digest32(&req.secret)?);

    let outcome = state
        .registry()
        .judge_with_hand(&caller, GameId::new(id), req.hand, &secret)
        .map_err(game_error)?;

    Ok(Json(JudgeResponse {
        winner: match outcome {
            Outcome::Winner(address) => Some(address.to_string()),
            Outcome::NoWinner => None,
        },
    }))
}

// ============ Registry handlers ============

pub async fn configure_fee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FeeRequest>,
) -> Result<StatusCode, ApiError> {
    let caller = caller(&headers)?;

    state
        .registry()
        .configure_fee(&caller, req.fee)
        .map_err(game_error)?;

    Ok(StatusCode::OK)
}

pub async fn receive_transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TransferRequest>,
) -> Result<StatusCode, ApiError> {
    let caller = caller(&headers)?;

    state
        .registry()
        .receive(&caller, req.amount)
        .map_err(game_error)?;

    Ok(StatusCode::OK)
}

pub async fn registry_info(State(state): State<AppState>) -> Json<RegistryResponse> {
    let registry = state.registry();
    Json(RegistryResponse {
        owner: registry.owner().to_string(),
        participation_fee: registry.participation_fee(),
        next_game_id: registry.next_game_id().as_u64(),
        escrowed: registry.ledger().escrowed(),
    })
}

// ============ Account handlers ============

pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let address: Address = address
        .parse()
        .map_err(|_| error_body(StatusCode::BAD_REQUEST, "invalid address"))?;

    Ok(Json(BalanceResponse {
        address: address.to_string(),
        balance: state.ledger().balance(&address),
    }))
}

pub async fn fund_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(req): Json<FundRequest>,
) -> Result<StatusCode, ApiError> {
    let address: Address = address
        .parse()
        .map_err(|_| error_body(StatusCode::BAD_REQUEST, "invalid address"))?;

    state.ledger().fund(&address, req.amount);
    Ok(StatusCode::OK)
}

pub async fn health() -> &'static str {
    "ok"
}

// ============ Router ============

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Games
        .route("/api/games", post(initialize_game))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/join", post(join_game))
        .route("/api/games/:id/cancel", post(cancel_game))
        .route("/api/games/:id/judge", post(judge_game))
        .route("/api/games/:id/judge-with-hand", post(judge_game_with_hand))
        // Registry
        .route("/api/registry", get(registry_info))
        .route("/api/fee", post(configure_fee))
        .route("/api/transfer", post(receive_transfer))
        // Accounts
        .route("/api/accounts/:address", get(get_balance))
        .route("/api/accounts/:address/fund", post(fund_account))
        // Health
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}
