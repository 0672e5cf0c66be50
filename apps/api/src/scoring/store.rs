use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::scoring::notify::RenderNotifier;
use crate::scoring::storage::KeyValueStorage;
use crate::scoring::Score;

/// Storage key holding the serialized `candidate id -> score` map.
pub const SCORES_KEY: &str = "zfellows-ai-scores";

/// In-memory AI scores, persisted as one JSON object under [`SCORES_KEY`].
///
/// Every write replaces the whole blob; concurrent writers must be serialized
/// by the owner (the server keeps the store behind a mutex).
pub struct ScoreStore {
    scores: BTreeMap<String, Score>,
    storage: Arc<dyn KeyValueStorage>,
    notifier: Arc<dyn RenderNotifier>,
}

impl ScoreStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, notifier: Arc<dyn RenderNotifier>) -> Self {
        Self {
            scores: BTreeMap::new(),
            storage,
            notifier,
        }
    }

    /// Replaces the in-memory map with whatever is persisted.
    ///
    /// Missing data yields an empty map. Unreadable or malformed data is logged
    /// and also yields an empty map; this never fails.
    pub fn load(&mut self) {
        self.scores = match self.storage.get(SCORES_KEY) {
            Ok(None) => BTreeMap::new(),
            Ok(Some(raw)) => match serde_json::from_str::<BTreeMap<String, Score>>(&raw) {
                Ok(scores) => scores,
                Err(e) => {
                    warn!("Ignoring malformed stored scores: {e}");
                    BTreeMap::new()
                }
            },
            Err(e) => {
                warn!("Failed to read stored scores: {e:#}");
                BTreeMap::new()
            }
        };
        if self.is_empty() {
            debug!("No stored AI scores");
        } else {
            debug!("Loaded {} stored AI scores", self.len());
        }
    }

    /// Persists the entire map, then asks the UI to re-render.
    pub fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.scores).context("Failed to serialize AI scores")?;
        self.storage
            .set(SCORES_KEY, &raw)
            .context("Failed to persist AI scores")?;
        self.notifier.scores_changed();
        Ok(())
    }

    /// Drops every score and persists the empty map.
    pub fn reset(&mut self) -> Result<()> {
        self.scores.clear();
        self.save()
    }

    pub fn get(&self, candidate_id: &str) -> Option<Score> {
        self.scores.get(candidate_id).copied()
    }

    pub fn contains(&self, candidate_id: &str) -> bool {
        self.scores.contains_key(candidate_id)
    }

    /// Records a score in memory only; call [`ScoreStore::save`] to persist.
    pub fn insert(&mut self, candidate_id: impl Into<String>, score: Score) {
        self.scores.insert(candidate_id.into(), score);
    }

    /// Forgets an unsaved score so the candidate stays eligible.
    pub fn remove(&mut self, candidate_id: &str) -> Option<Score> {
        self.scores.remove(candidate_id)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<String, u8> {
        self.scores
            .iter()
            .map(|(id, score)| (id.clone(), score.value()))
            .collect()
    }
}
