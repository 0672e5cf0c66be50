use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::models::candidate::CandidatePage;
use crate::state::AppState;

pub const DEFAULT_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct CandidatesQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl CandidatesQuery {
    /// Anything that is not a positive integer means the default.
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIMIT)
    }
}

#[derive(Debug, Serialize)]
struct CandidatesResponse {
    success: bool,
    #[serde(flatten)]
    page: CandidatePage,
}

/// GET /api/candidates?limit=&offset=
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidatesQuery>,
) -> Response {
    let offset = query.offset.clone().filter(|o| !o.is_empty());
    match state.source.page(query.limit(), offset).await {
        Ok(page) => Json(CandidatesResponse {
            success: true,
            page,
        })
        .into_response(),
        Err(e) => {
            error!("Error fetching candidates: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": format!("{e:#}"),
                    "message": "Failed to fetch candidates from Airtable. Check your API token and configuration."
                })),
            )
                .into_response()
        }
    }
}
