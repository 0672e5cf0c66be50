use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::scoring::eligibility::StagePolicy;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Where the scoring workflow reads its candidate list from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSourceKind {
    Airtable,
    Mock { path: PathBuf },
}

impl CandidateSourceKind {
    /// Live Airtable data is scored in "Stage 1 / review"; the mock list uses "pending".
    pub fn stage_policy(&self) -> StagePolicy {
        match self {
            CandidateSourceKind::Airtable => StagePolicy::Stage1Review,
            CandidateSourceKind::Mock { .. } => StagePolicy::Pending,
        }
    }
}

/// Airtable credentials. Every field is optional so the server can still start
/// and report readiness through `/api/health`.
#[derive(Debug, Clone, Default)]
pub struct AirtableConfig {
    pub token: Option<String>,
    pub base_id: Option<String>,
    pub table_name: Option<String>,
}

impl AirtableConfig {
    pub fn is_ready(&self) -> bool {
        self.token.is_some() && self.base_id.is_some() && self.table_name.is_some()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub airtable: AirtableConfig,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub candidate_source: CandidateSourceKind,
    pub candidate_limit: usize,
    /// Optional JSON object of reviewer-assigned statuses, `{ "<id>": "<status>" }`.
    pub status_overrides: Option<PathBuf>,
    /// When false, scores live in memory only and are lost on restart.
    pub persist_scores: bool,
    pub scores_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let candidate_source = match optional_env("CANDIDATE_SOURCE")
            .unwrap_or_else(|| "airtable".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "airtable" => CandidateSourceKind::Airtable,
            "mock" => CandidateSourceKind::Mock {
                path: optional_env("MOCK_CANDIDATES_PATH")
                    .unwrap_or_else(|| "data/mock_candidates.json".to_string())
                    .into(),
            },
            other => bail!("CANDIDATE_SOURCE must be 'airtable' or 'mock', got '{other}'"),
        };

        Ok(Config {
            port: optional_env("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            airtable: AirtableConfig {
                token: optional_env("AIRTABLE"),
                base_id: optional_env("AIRTABLE_BASE_ID"),
                table_name: optional_env("AIRTABLE_TABLE_NAME"),
            },
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: optional_env("OPENAI_MODEL")
                .unwrap_or_else(|| crate::scoring::requester::DEFAULT_MODEL.to_string()),
            candidate_source,
            candidate_limit: optional_env("CANDIDATE_LIMIT")
                .unwrap_or_else(|| "500".to_string())
                .parse::<usize>()
                .context("CANDIDATE_LIMIT must be a positive integer")?,
            status_overrides: optional_env("STATUS_OVERRIDES_PATH").map(PathBuf::from),
            persist_scores: optional_env("PERSIST_SCORES")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
            scores_dir: optional_env("SCORES_DIR")
                .unwrap_or_else(|| "data".to_string())
                .into(),
            static_dir: optional_env("STATIC_DIR")
                .unwrap_or_else(|| "public".to_string())
                .into(),
        })
    }

    /// Logs a warning for every Airtable variable that is missing.
    pub fn warn_missing(&self) {
        if self.airtable.token.is_none() {
            warn!("AIRTABLE token not found in environment variables");
        }
        if self.airtable.base_id.is_none() {
            warn!("AIRTABLE_BASE_ID not found in environment variables");
        }
        if self.airtable.table_name.is_none() {
            warn!("AIRTABLE_TABLE_NAME not found in environment variables");
        }
    }
}

/// Reads an environment variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airtable_ready_requires_all_fields() {
        let mut airtable = AirtableConfig {
            token: Some("pat".to_string()),
            base_id: Some("app123".to_string()),
            table_name: None,
        };
        assert!(!airtable.is_ready());

        airtable.table_name = Some("Applications".to_string());
        assert!(airtable.is_ready());
    }

    #[test]
    fn test_stage_policy_follows_source() {
        assert_eq!(
            CandidateSourceKind::Airtable.stage_policy(),
            StagePolicy::Stage1Review
        );
        let mock = CandidateSourceKind::Mock {
            path: "data/mock.json".into(),
        };
        assert_eq!(mock.stage_policy(), StagePolicy::Pending);
    }
}
