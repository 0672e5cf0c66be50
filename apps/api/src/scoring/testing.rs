//! Test doubles shared by the scoring tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::models::candidate::Candidate;
use crate::scoring::notify::RenderNotifier;
use crate::scoring::requester::{parse_score, ScoreRequester};
use crate::scoring::source::CandidateSource;
use crate::scoring::storage::KeyValueStorage;
use crate::scoring::{Score, ScoringError};

pub fn score(value: u8) -> Score {
    Score::new(value as i64).unwrap()
}

pub fn candidate(id: &str, status: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        first_name: format!("First {id}"),
        last_name: format!("Last {id}"),
        company: format!("{id} Inc"),
        status: Some(status.to_string()),
        ..Default::default()
    }
}

#[derive(Debug, Default)]
pub struct CountingNotifier {
    count: AtomicUsize,
}

impl CountingNotifier {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl RenderNotifier for CountingNotifier {
    fn scores_changed(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

enum Reply {
    Text(String),
    Status(u16),
    /// Replies with the text once the gate is opened.
    Gated(Arc<Notify>, String),
}

/// Scripted requester: replies per candidate id, run through the real parser.
/// Unscripted candidates fail with a 404.
#[derive(Default)]
pub struct FakeRequester {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeRequester {
    pub fn reply(mut self, id: &str, text: &str) -> Self {
        self.replies.insert(id.to_string(), Reply::Text(text.to_string()));
        self
    }

    pub fn status(mut self, id: &str, status: u16) -> Self {
        self.replies.insert(id.to_string(), Reply::Status(status));
        self
    }

    pub fn gated(mut self, id: &str, text: &str, gate: Arc<Notify>) -> Self {
        self.replies
            .insert(id.to_string(), Reply::Gated(gate, text.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, model)| model.clone())
            .collect()
    }
}

#[async_trait]
impl ScoreRequester for FakeRequester {
    async fn score(
        &self,
        candidate: &Candidate,
        _api_key: &str,
        model: &str,
    ) -> Result<Score, ScoringError> {
        self.calls
            .lock()
            .unwrap()
            .push((candidate.id.clone(), model.to_string()));
        match self.replies.get(&candidate.id) {
            Some(Reply::Text(text)) => parse_score(text),
            Some(Reply::Status(status)) => Err(ScoringError::Request { status: *status }),
            Some(Reply::Gated(gate, text)) => {
                gate.notified().await;
                parse_score(text)
            }
            None => Err(ScoringError::Request { status: 404 }),
        }
    }
}

pub struct FailingSource;

#[async_trait]
impl CandidateSource for FailingSource {
    async fn candidates(&self) -> Result<Vec<Candidate>> {
        Err(anyhow!("upstream unavailable"))
    }
}

/// Storage whose writes always fail, as on a full or read-only disk.
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("disk full"))
    }
}
