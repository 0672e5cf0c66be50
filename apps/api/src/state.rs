use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::airtable::AirtableClient;
use crate::config::{CandidateSourceKind, Config};
use crate::llm_client::LlmClient;
use crate::scoring::eligibility::{CandidateStatusField, StatusLookup, StatusOverrides};
use crate::scoring::notify::{RenderNotifier, RevisionNotifier};
use crate::scoring::requester::LlmScoreRequester;
use crate::scoring::source::{AirtableSource, CandidateSource, StaticCandidates};
use crate::scoring::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::scoring::{BatchScorer, ScoreStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn CandidateSource>,
    pub scorer: Arc<BatchScorer>,
    /// Locked briefly per read or commit, never for a whole run.
    pub store: Arc<Mutex<ScoreStore>>,
    /// Held for the whole of a batch run or a reset, so they never interleave.
    pub run_lock: Arc<Mutex<()>>,
    pub notifier: Arc<RevisionNotifier>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let notifier = Arc::new(RevisionNotifier::new());
        let source = build_source(&config)?;
        let scorer = build_scorer(&config, source.clone())?;
        let store = load_store(&config, notifier.clone());

        Ok(Self {
            config,
            source,
            scorer: Arc::new(scorer),
            store: Arc::new(Mutex::new(store)),
            run_lock: Arc::new(Mutex::new(())),
            notifier,
        })
    }
}

pub fn build_source(config: &Config) -> Result<Arc<dyn CandidateSource>> {
    Ok(match &config.candidate_source {
        CandidateSourceKind::Airtable => Arc::new(AirtableSource::new(
            AirtableClient::from_config(&config.airtable),
            config.candidate_limit,
        )),
        CandidateSourceKind::Mock { path } => {
            info!("Using mock candidates from {}", path.display());
            Arc::new(StaticCandidates::from_path(path)?)
        }
    })
}

pub fn build_scorer(config: &Config, source: Arc<dyn CandidateSource>) -> Result<BatchScorer> {
    let statuses: Arc<dyn StatusLookup> = match &config.status_overrides {
        Some(path) => Arc::new(StatusOverrides::from_path(path)?),
        None => Arc::new(CandidateStatusField),
    };
    let llm = LlmClient::new(config.openai_base_url.clone());

    Ok(BatchScorer::new(
        source,
        statuses,
        config.candidate_source.stage_policy(),
        Arc::new(LlmScoreRequester::new(llm)),
    ))
}

/// Opens the score store and loads whatever was persisted.
pub fn load_store(config: &Config, notifier: Arc<dyn RenderNotifier>) -> ScoreStore {
    let storage: Arc<dyn KeyValueStorage> = if config.persist_scores {
        Arc::new(FileStorage::new(config.scores_dir.clone()))
    } else {
        warn!("PERSIST_SCORES is off; AI scores will not survive a restart");
        Arc::new(MemoryStorage::new())
    };

    let mut store = ScoreStore::new(storage, notifier);
    store.load();
    info!("Loaded {} AI scores", store.len());
    store
}
