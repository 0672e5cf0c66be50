use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::config::CandidateSourceKind;
use crate::state::AppState;

/// GET /api/health
/// Reports which Airtable settings are present, plus the scoring setup.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let airtable = &state.config.airtable;
    let source = match state.config.candidate_source {
        CandidateSourceKind::Airtable => "airtable",
        CandidateSourceKind::Mock { .. } => "mock",
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "config": {
            "hasToken": airtable.token.is_some(),
            "hasBaseId": airtable.base_id.is_some(),
            "hasTableName": airtable.table_name.is_some(),
            "ready": airtable.is_ready()
        },
        "scoring": {
            "source": source,
            "stagePolicy": state.scorer.policy(),
            "hasApiKey": state.config.openai_api_key.is_some(),
            "model": state.config.openai_model
        }
    }))
}
