//! Routes for inspecting and triggering the scheduled passes.

use axum::extract::State;
use axum::{Json, Router, routing::get, routing::post};
use roastduel_generation::application::coordinator::GenerationReport;
use roastduel_narrative::application::publisher::NarrativeReport;
use serde::Serialize;
use tokio::task::JoinError;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::scheduler::{PassBusy, PassKind, PassOutcome, PassRecord};
use crate::state::AppState;

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct PassesResponse {
    /// Most recent generation pass, if any has run.
    pub generation: Option<PassRecord<GenerationReport>>,
    /// Most recent narrative pass, if any has run.
    pub narrative: Option<PassRecord<NarrativeReport>>,
}

/// GET /
async fn last_passes(State(state): State<AppState>) -> Json<PassesResponse> {
    Json(PassesResponse {
        generation: state.passes.last_generation(),
        narrative: state.passes.last_narrative(),
    })
}

/// POST /generation
#[instrument(skip(state))]
async fn trigger_generation(
    State(state): State<AppState>,
) -> Result<Json<PassRecord<GenerationReport>>, ApiError> {
    info!("generation pass triggered over http");
    let passes = state.passes;
    let pass = tokio::spawn(async move { passes.run_generation().await });
    respond(PassKind::Generation, pass.await)
}

/// POST /narrative
#[instrument(skip(state))]
async fn trigger_narrative(
    State(state): State<AppState>,
) -> Result<Json<PassRecord<NarrativeReport>>, ApiError> {
    info!("narrative pass triggered over http");
    let passes = state.passes;
    let pass = tokio::spawn(async move { passes.run_narrative().await });
    respond(PassKind::Narrative, pass.await)
}

/// Passes run on their own task so a dropped request cannot cancel them.
fn respond<R>(
    kind: PassKind,
    joined: Result<Result<PassRecord<R>, PassBusy>, JoinError>,
) -> Result<Json<PassRecord<R>>, ApiError> {
    let result = joined.map_err(|err| ApiError::PassAborted {
        kind,
        message: err.to_string(),
    })?;
    let record = result.map_err(|PassBusy(kind)| ApiError::PassInProgress(kind))?;
    if let PassOutcome::Failed { kind, error } = &record.outcome {
        return Err(ApiError::PassFailed {
            kind: record.kind,
            error_kind: *kind,
            message: error.clone(),
        });
    }
    Ok(Json(record))
}

/// Returns the pass router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(last_passes))
        .route("/generation", post(trigger_generation))
        .route("/narrative", post(trigger_narrative))
}
