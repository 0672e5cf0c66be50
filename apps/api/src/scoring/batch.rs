use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::models::candidate::Candidate;
use crate::scoring::eligibility::{StagePolicy, StatusLookup};
use crate::scoring::requester::{ScoreRequester, DEFAULT_MODEL};
use crate::scoring::source::CandidateSource;
use crate::scoring::{Score, ScoreStore, ScoringError};

/// Pause between consecutive requests. A crude guard against provider rate limits.
pub const PACING_DELAY: Duration = Duration::from_millis(200);

/// Credential and model for one scoring run.
#[derive(Debug, Clone)]
pub struct ScoringRequest {
    pub api_key: String,
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl ScoringRequest {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Emitted after each successfully scored candidate.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based position within the eligible set.
    pub current: usize,
    pub total: usize,
    pub candidate: &'a Candidate,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringFailure {
    pub candidate_id: String,
    pub name: String,
    pub error: String,
}

/// Summary of one run. Failures keep source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<ScoringFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BatchResult {
    /// Nothing was eligible.
    pub fn empty() -> Self {
        Self {
            message: Some("No eligible candidates to score".to_string()),
            ..Default::default()
        }
    }
}

/// Scores every eligible candidate, one at a time, in source order.
///
/// A candidate is eligible when its status passes the stage policy and it has
/// no recorded score yet, so re-running after a full success is a no-op.
pub struct BatchScorer {
    source: Arc<dyn CandidateSource>,
    statuses: Arc<dyn StatusLookup>,
    policy: StagePolicy,
    requester: Arc<dyn ScoreRequester>,
}

impl BatchScorer {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        statuses: Arc<dyn StatusLookup>,
        policy: StagePolicy,
        requester: Arc<dyn ScoreRequester>,
    ) -> Self {
        Self {
            source,
            statuses,
            policy,
            requester,
        }
    }

    pub fn policy(&self) -> StagePolicy {
        self.policy
    }

    pub fn is_eligible(&self, store: &ScoreStore, candidate: &Candidate) -> bool {
        self.policy.admits(&self.statuses.status_of(candidate)) && !store.contains(&candidate.id)
    }

    /// Runs one batch. Per-candidate failures are collected, never fatal; scores
    /// already written stay written. Only a missing credential or an unreachable
    /// candidate source fails the run as a whole.
    ///
    /// The store is locked only to pick the eligible set and to commit each
    /// score, so readers see every save as it lands. Callers must not start two
    /// runs (or a run and a reset) on the same store at once.
    pub async fn run(
        &self,
        store: &Mutex<ScoreStore>,
        request: &ScoringRequest,
        mut on_progress: Option<&mut (dyn FnMut(Progress<'_>) + Send)>,
    ) -> Result<BatchResult, ScoringError> {
        let api_key = request.api_key.trim();
        if api_key.is_empty() {
            return Err(ScoringError::Configuration("API key required".to_string()));
        }

        let candidates = self.source.candidates().await?;
        let eligible: Vec<&Candidate> = {
            let store = store.lock().await;
            candidates
                .iter()
                .filter(|c| self.is_eligible(&store, c))
                .collect()
        };

        if eligible.is_empty() {
            info!("No eligible candidates to score");
            return Ok(BatchResult::empty());
        }

        let total = eligible.len();
        let mut result = BatchResult {
            total,
            ..Default::default()
        };
        info!("Starting AI scoring: {total} candidates with {}", request.model);

        for (i, candidate) in eligible.into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(PACING_DELAY).await;
            }

            let outcome = match self
                .requester
                .score(candidate, api_key, &request.model)
                .await
            {
                Ok(score) => {
                    commit(&mut *store.lock().await, &candidate.id, score).map(|()| score)
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(score) => {
                    result.successful += 1;
                    info!(
                        "{}/{}: {} = {}",
                        i + 1,
                        total,
                        candidate.display_name(),
                        score
                    );

                    if let Some(callback) = on_progress.as_deref_mut() {
                        callback(Progress {
                            current: i + 1,
                            total,
                            candidate,
                            score,
                        });
                    }
                }
                Err(e) => {
                    warn!("Scoring {} failed: {e}", candidate.id);
                    result.failed += 1;
                    result.errors.push(ScoringFailure {
                        candidate_id: candidate.id.clone(),
                        name: candidate.display_name(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "AI scoring complete: {} succeeded, {} failed",
            result.successful, result.failed
        );
        Ok(result)
    }
}

/// Records and persists one score. On a failed save the score is dropped from
/// memory again, so the store never claims a score that storage does not hold.
fn commit(store: &mut ScoreStore, candidate_id: &str, score: Score) -> Result<(), ScoringError> {
    store.insert(candidate_id, score);
    match store.save() {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Failed to persist score for {candidate_id}: {e:#}");
            store.remove(candidate_id);
            Err(ScoringError::Persist(format!("{e:#}")))
        }
    }
}
