use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::candidate::Candidate;

/// Which pipeline stage is scored. Matching is a case-insensitive substring test
/// because upstream statuses are free text ("Stage 1 - Under Review", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePolicy {
    /// Live data: "stage 1" or anything "under review".
    Stage1Review,
    /// Mock data: "pending".
    Pending,
}

impl StagePolicy {
    pub fn admits(self, status: &str) -> bool {
        let status = status.to_lowercase();
        match self {
            StagePolicy::Stage1Review => status.contains("stage 1") || status.contains("review"),
            StagePolicy::Pending => status.contains("pending"),
        }
    }
}

/// Resolves the current pipeline status of a candidate.
pub trait StatusLookup: Send + Sync {
    fn status_of(&self, candidate: &Candidate) -> String;
}

/// Uses the status carried on the record itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct CandidateStatusField;

impl StatusLookup for CandidateStatusField {
    fn status_of(&self, candidate: &Candidate) -> String {
        candidate.status.clone().unwrap_or_default()
    }
}

/// Reviewer-assigned statuses keyed by candidate id, falling back to the record.
#[derive(Debug, Default, Clone)]
pub struct StatusOverrides {
    statuses: HashMap<String, String>,
}

impl StatusOverrides {
    pub fn new(statuses: HashMap<String, String>) -> Self {
        Self { statuses }
    }

    /// Loads a JSON object mapping candidate id to status.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read status overrides at {}", path.display()))?;
        let statuses = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse status overrides at {}", path.display()))?;
        Ok(Self::new(statuses))
    }
}

impl StatusLookup for StatusOverrides {
    fn status_of(&self, candidate: &Candidate) -> String {
        self.statuses
            .get(&candidate.id)
            .cloned()
            .unwrap_or_else(|| CandidateStatusField.status_of(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::testing::candidate;

    #[test]
    fn test_stage1_policy() {
        let policy = StagePolicy::Stage1Review;
        assert!(policy.admits("Stage 1"));
        assert!(policy.admits("STAGE 1 - screening"));
        assert!(policy.admits("Under Review"));
        assert!(!policy.admits("Stage 2"));
        assert!(!policy.admits("Pending"));
        assert!(!policy.admits(""));
    }

    #[test]
    fn test_pending_policy() {
        let policy = StagePolicy::Pending;
        assert!(policy.admits("pending"));
        assert!(policy.admits("Pending review"));
        assert!(!policy.admits("Accepted"));
    }

    #[test]
    fn test_overrides_fall_back_to_record() {
        let overrides = StatusOverrides::new(HashMap::from([(
            "rec1".to_string(),
            "Rejected".to_string(),
        )]));

        assert_eq!(overrides.status_of(&candidate("rec1", "Pending")), "Rejected");
        assert_eq!(overrides.status_of(&candidate("rec2", "Pending")), "Pending");
        let bare = Candidate {
            id: "rec3".into(),
            ..Default::default()
        };
        assert_eq!(overrides.status_of(&bare), "");
    }

    #[test]
    fn test_overrides_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statuses.json");
        std::fs::write(&path, r#"{"rec9": "Stage 1"}"#).unwrap();

        let overrides = StatusOverrides::from_path(&path).unwrap();
        assert_eq!(overrides.status_of(&candidate("rec9", "Stage 3")), "Stage 1");
    }
}
