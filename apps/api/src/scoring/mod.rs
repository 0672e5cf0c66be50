// AI scoring of candidates: persisted score store, per-candidate requester,
// sequential batch runner and the read-side accessor used by the UI.
// All completion calls go through llm_client.

pub mod accessor;
pub mod batch;
pub mod eligibility;
pub mod handlers;
pub mod notify;
pub mod requester;
pub mod source;
pub mod storage;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use accessor::score_for;
pub use batch::{BatchResult, BatchScorer, Progress, ScoringRequest};
pub use store::ScoreStore;

/// An AI score. Always within `0..=100`; serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Option<Self> {
        (0..=Self::MAX as i64)
            .contains(&value)
            .then(|| Score(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Score::new(value).ok_or_else(|| format!("score {value} is outside 0-100"))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ScoringError {
    /// Missing credential; aborts before any work is done.
    #[error("{0}")]
    Configuration(String),

    #[error("API error: {status}")]
    Request { status: u16 },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid score: {0}")]
    Validation(String),

    /// The score was produced but could not be written to storage.
    #[error("Failed to persist score: {0}")]
    Persist(String),

    #[error("Failed to load candidates: {0}")]
    Source(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert_eq!(Score::new(0).map(Score::value), Some(0));
        assert_eq!(Score::new(100).map(Score::value), Some(100));
        assert!(Score::new(101).is_none());
        assert!(Score::new(-1).is_none());
    }

    #[test]
    fn test_score_deserialize_rejects_out_of_range() {
        assert_eq!(serde_json::from_str::<Score>("42").unwrap().value(), 42);
        assert!(serde_json::from_str::<Score>("150").is_err());
        assert!(serde_json::from_str::<Score>("\"42\"").is_err());
    }

    #[test]
    fn test_error_messages_name_the_cause() {
        assert_eq!(
            ScoringError::Request { status: 429 }.to_string(),
            "API error: 429"
        );
        assert_eq!(
            ScoringError::Validation("150".into()).to_string(),
            "Invalid score: 150"
        );
    }
}
