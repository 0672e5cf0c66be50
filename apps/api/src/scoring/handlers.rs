use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::scoring::{score_for, BatchResult, ScoringRequest};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunScoringBody {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub scores: BTreeMap<String, u8>,
    /// Bumped on every save or reset; the UI re-renders when it changes.
    pub revision: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScoreResponse {
    pub candidate_id: String,
    pub score: u8,
    /// False when the score is a fallback rather than an AI result.
    pub recorded: bool,
}

/// POST /api/scores/run
///
/// The body may carry `apiKey` and `model`; otherwise the configured key and
/// model are used. An empty body means "use the configured values"; anything
/// else must be a valid JSON body. Responds once the whole batch has finished.
pub async fn handle_run_scoring(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchResult>, AppError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        RunScoringBody::default()
    } else {
        let Json(body) = Json::<RunScoringBody>::from_bytes(&body)
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        body
    };
    let api_key = body
        .api_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| state.config.openai_api_key.clone())
        .unwrap_or_default();
    let model = body
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.config.openai_model.clone());
    let request = ScoringRequest::new(api_key).with_model(model);

    let _run = state.run_lock.lock().await;
    let result = state.scorer.run(&state.store, &request, None).await?;
    Ok(Json(result))
}

/// POST /api/scores/reset
///
/// Waits for a running batch to finish first.
pub async fn handle_reset_scores(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let _run = state.run_lock.lock().await;
    state.store.lock().await.reset()?;
    info!("AI scores reset");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/scores
pub async fn handle_get_scores(State(state): State<AppState>) -> Json<ScoresResponse> {
    let scores = state.store.lock().await.snapshot();
    Json(ScoresResponse {
        scores,
        revision: state.notifier.revision(),
    })
}

/// GET /api/scores/:id
pub async fn handle_get_score(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CandidateScoreResponse> {
    let candidates = match state.source.candidates().await {
        Ok(c) => c,
        Err(e) => {
            warn!("Score lookup without candidate record: {e:#}");
            Vec::new()
        }
    };
    let candidate = candidates.iter().find(|c| c.id == id);

    let store = state.store.lock().await;
    Json(CandidateScoreResponse {
        score: score_for(&store, &id, candidate),
        recorded: store.contains(&id),
        candidate_id: id,
    })
}
