//! HTTP surface for the round lifecycle and public verification.
//!
//! Request and response bodies use camelCase field names; they are the
//! same wire shapes third-party verifiers consume, so the renames are
//! part of the protocol surface.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use pegfall_engine::{play_round, seeds, EngineError};
use pegfall_types::{PathStep, PegMap, RoundResult, RoundStatus, ROWS};

use crate::store::{RoundRecord, RoundStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RoundStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/rounds/commit", post(commit_round))
        .route("/api/rounds/:id/start", post(start_round))
        .route("/api/rounds/:id/reveal", post(reveal_round))
        .route("/api/rounds/:id", get(get_round))
        .route("/api/verify", get(verify))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            code: "NOT_FOUND",
            message: "route not found".to_string(),
        }),
    )
        .into_response()
}

#[derive(Debug, Error)]
enum ApiError {
    #[error("{0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidParameter(_) => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            ApiError::Engine(EngineError::InvalidParameter(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_PARAMETER")
            }
            ApiError::Engine(EngineError::InvalidSeedFormat(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_SEED_FORMAT")
            }
            ApiError::Store(StoreError::RoundNotFound(_)) => {
                (StatusCode::NOT_FOUND, "ROUND_NOT_FOUND")
            }
            ApiError::Store(StoreError::StateViolation { .. }) => {
                (StatusCode::CONFLICT, "STATE_VIOLATION")
            }
            ApiError::Store(StoreError::Engine(EngineError::InvalidSeedFormat(_))) => {
                (StatusCode::BAD_REQUEST, "INVALID_SEED_FORMAT")
            }
            ApiError::Store(StoreError::Engine(_)) => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct CommitResponse {
    #[serde(rename = "roundId")]
    round_id: String,
    #[serde(rename = "commitHex")]
    commit_hex: String,
    nonce: String,
}

#[derive(Deserialize)]
struct StartRequest {
    #[serde(rename = "clientSeed")]
    client_seed: String,
    #[serde(rename = "betCents")]
    bet_cents: u64,
    #[serde(rename = "dropColumn")]
    drop_column: i64,
}

#[derive(Serialize)]
struct StartResponse {
    #[serde(rename = "roundId")]
    round_id: String,
    status: RoundStatus,
    nonce: String,
    #[serde(rename = "commitHex")]
    commit_hex: String,
    #[serde(rename = "clientSeed")]
    client_seed: String,
    #[serde(rename = "combinedSeed")]
    combined_seed: String,
    #[serde(rename = "pegMapHash")]
    peg_map_hash: String,
    #[serde(rename = "dropColumn")]
    drop_column: u8,
    #[serde(rename = "binIndex")]
    bin_index: u8,
    #[serde(rename = "payoutMultiplier")]
    payout_multiplier: f64,
    #[serde(rename = "betCents")]
    bet_cents: u64,
    #[serde(rename = "winAmount")]
    win_amount: u64,
    #[serde(rename = "pegMap")]
    peg_map: PegMap,
    path: Vec<PathStep>,
}

#[derive(Serialize)]
struct RevealResponse {
    #[serde(rename = "roundId")]
    round_id: String,
    status: RoundStatus,
    #[serde(rename = "serverSeed")]
    server_seed: String,
    #[serde(rename = "clientSeed", skip_serializing_if = "Option::is_none")]
    client_seed: Option<String>,
    nonce: String,
    #[serde(rename = "commitHex")]
    commit_hex: String,
    #[serde(rename = "combinedSeed", skip_serializing_if = "Option::is_none")]
    combined_seed: Option<String>,
    #[serde(rename = "revealedAtMs", skip_serializing_if = "Option::is_none")]
    revealed_at_ms: Option<u64>,
}

#[derive(Serialize)]
struct RoundView {
    #[serde(rename = "roundId")]
    round_id: String,
    status: RoundStatus,
    nonce: String,
    #[serde(rename = "commitHex")]
    commit_hex: String,
    /// Hidden until the round is revealed.
    #[serde(rename = "serverSeed")]
    server_seed: Option<String>,
    #[serde(rename = "clientSeed", skip_serializing_if = "Option::is_none")]
    client_seed: Option<String>,
    #[serde(rename = "dropColumn", skip_serializing_if = "Option::is_none")]
    drop_column: Option<u8>,
    #[serde(flatten)]
    result: Option<RoundResult>,
    #[serde(rename = "revealedAtMs", skip_serializing_if = "Option::is_none")]
    revealed_at_ms: Option<u64>,
}

#[derive(Deserialize)]
struct VerifyQuery {
    #[serde(rename = "serverSeed")]
    server_seed: String,
    #[serde(rename = "clientSeed")]
    client_seed: String,
    nonce: String,
    #[serde(rename = "dropColumn")]
    drop_column: i64,
}

#[derive(Serialize)]
struct VerifyResponse {
    #[serde(rename = "serverSeed")]
    server_seed: String,
    #[serde(rename = "clientSeed")]
    client_seed: String,
    nonce: String,
    #[serde(rename = "dropColumn")]
    drop_column: u8,
    #[serde(rename = "commitHex")]
    commit_hex: String,
    #[serde(flatten)]
    result: RoundResult,
    verified: bool,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn commit_round(State(state): State<AppState>) -> Json<CommitResponse> {
    let record = state.store.commit();
    info!(round_id = %record.id, "round committed");
    Json(CommitResponse {
        round_id: record.id,
        commit_hex: record.commitment,
        nonce: record.nonce,
    })
}

async fn start_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    if request.client_seed.trim().is_empty() {
        return Err(ApiError::InvalidParameter("client seed required".into()));
    }
    if request.bet_cents == 0 {
        return Err(ApiError::InvalidParameter(
            "bet must be at least 1 cent".into(),
        ));
    }
    let drop_column = validate_drop_column(request.drop_column)?;

    let record = state
        .store
        .start(&id, &request.client_seed, request.bet_cents, drop_column)?;
    let result = round_result(&record)?;
    info!(
        round_id = %record.id,
        bin_index = result.bin_index,
        multiplier = result.multiplier,
        "round started"
    );

    Ok(Json(StartResponse {
        round_id: record.id,
        status: record.status,
        nonce: record.nonce,
        commit_hex: record.commitment,
        client_seed: request.client_seed,
        combined_seed: result.combined_seed.clone(),
        peg_map_hash: result.peg_map_hash.clone(),
        drop_column,
        bin_index: result.bin_index,
        payout_multiplier: result.multiplier,
        bet_cents: result.bet_cents,
        win_amount: result.payout_cents,
        peg_map: result.peg_map,
        path: result.path,
    }))
}

async fn reveal_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RevealResponse>, ApiError> {
    let record = state.store.reveal(&id)?;
    info!(round_id = %record.id, "round revealed");

    let combined_seed = record
        .result
        .as_ref()
        .map(|result| result.combined_seed.clone());
    Ok(Json(RevealResponse {
        round_id: record.id,
        status: record.status,
        server_seed: record.server_seed,
        client_seed: record.client_seed,
        nonce: record.nonce,
        commit_hex: record.commitment,
        combined_seed,
        revealed_at_ms: record.revealed_at_ms,
    }))
}

async fn get_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoundView>, ApiError> {
    let record = state.store.get(&id)?;

    let server_seed = if record.status == RoundStatus::Revealed {
        Some(record.server_seed)
    } else {
        None
    };
    Ok(Json(RoundView {
        round_id: record.id,
        status: record.status,
        nonce: record.nonce,
        commit_hex: record.commitment,
        server_seed,
        client_seed: record.client_seed,
        drop_column: record.drop_column,
        result: record.result,
        revealed_at_ms: record.revealed_at_ms,
    }))
}

/// Stateless replay for third-party audit: recomputes the round from the
/// supplied inputs alone, independent of anything persisted.
async fn verify(Query(query): Query<VerifyQuery>) -> Result<Json<VerifyResponse>, ApiError> {
    let drop_column = validate_drop_column(query.drop_column)?;

    let commit_hex = seeds::create_commitment(&query.server_seed, &query.nonce);
    // The bet does not influence the outcome; verification uses a
    // placeholder amount.
    let result = play_round(
        &query.server_seed,
        &query.client_seed,
        &query.nonce,
        drop_column,
        100,
    )?;

    Ok(Json(VerifyResponse {
        server_seed: query.server_seed,
        client_seed: query.client_seed,
        nonce: query.nonce,
        drop_column,
        commit_hex,
        result,
        verified: true,
    }))
}

fn validate_drop_column(raw: i64) -> Result<u8, ApiError> {
    if !(0..=i64::from(ROWS)).contains(&raw) {
        return Err(ApiError::InvalidParameter(format!(
            "drop column {raw} outside 0..={ROWS}"
        )));
    }
    Ok(raw as u8)
}

fn round_result(record: &RoundRecord) -> Result<RoundResult, ApiError> {
    record
        .result
        .clone()
        .ok_or_else(|| ApiError::Internal(format!("round {} has no result", record.id)))
}
