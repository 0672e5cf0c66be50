//! Airtable client: reads the applications table and maps records onto `Candidate`.
//!
//! Read-only. Airtable caps `pageSize` at 100, so larger limits walk the
//! `offset` cursor until the limit is reached or the table is exhausted.

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::AirtableConfig;
use crate::models::candidate::{Candidate, CandidatePage};

pub const AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum AirtableError {
    #[error("Airtable is not configured: {0} is missing")]
    NotConfigured(&'static str),

    #[error("Invalid Airtable URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Airtable API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct RecordList {
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    id: String,
    #[serde(default)]
    created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Credentials are checked per request, so a half-configured deployment still
/// starts and reports what is missing.
#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_url: String,
    config: AirtableConfig,
}

impl AirtableClient {
    pub fn new(api_url: impl Into<String>, config: AirtableConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_url: api_url.into(),
            config,
        }
    }

    pub fn from_config(config: &AirtableConfig) -> Self {
        Self::new(AIRTABLE_API_URL, config.clone())
    }

    fn token(&self) -> Result<&str, AirtableError> {
        self.config
            .token
            .as_deref()
            .ok_or(AirtableError::NotConfigured("AIRTABLE"))
    }

    fn table_url(&self) -> Result<Url, AirtableError> {
        let base_id = self
            .config
            .base_id
            .as_deref()
            .ok_or(AirtableError::NotConfigured("AIRTABLE_BASE_ID"))?;
        let table_name = self
            .config
            .table_name
            .as_deref()
            .ok_or(AirtableError::NotConfigured("AIRTABLE_TABLE_NAME"))?;

        let mut url =
            Url::parse(&self.api_url).map_err(|e| AirtableError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| AirtableError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .push(base_id)
            .push(table_name);
        Ok(url)
    }

    /// Fetches up to `limit` candidates starting at the `offset` cursor.
    pub async fn fetch_candidates(
        &self,
        limit: usize,
        offset: Option<String>,
    ) -> Result<CandidatePage, AirtableError> {
        let token = self.token()?;
        let url = self.table_url()?;
        let mut candidates = Vec::new();
        let mut cursor = offset;

        while candidates.len() < limit {
            let page_size = (limit - candidates.len()).min(MAX_PAGE_SIZE);
            let page = self
                .fetch_page(token, url.clone(), page_size, cursor.as_deref())
                .await?;
            debug!("Fetched {} Airtable records", page.records.len());

            candidates.extend(page.records.into_iter().map(record_to_candidate));
            cursor = page.offset;
            if cursor.is_none() {
                break;
            }
        }

        Ok(CandidatePage {
            candidates,
            has_more: cursor.is_some(),
            offset: cursor,
        })
    }

    async fn fetch_page(
        &self,
        token: &str,
        url: Url,
        page_size: usize,
        offset: Option<&str>,
    ) -> Result<RecordList, AirtableError> {
        let mut query = vec![("pageSize", page_size.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AirtableError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

fn record_to_candidate(record: Record) -> Candidate {
    let f = &record.fields;
    Candidate {
        id: record.id,
        first_name: text(f, "First Name"),
        last_name: text(f, "Last Name"),
        email: text(f, "Email"),
        company: text(f, "Company"),
        technical: text(f, "Technical"),
        location: text(f, "Location"),
        school_or_work: text(f, "School or Work"),
        project_description: text(f, "Project Description"),
        problem_solving: text(f, "Problem Solving"),
        expertise: text(f, "Expertise"),
        competitors: text(f, "Competitors"),
        past_work: text(f, "Past Work"),
        achievements: text(f, "Achievements"),
        risk_or_challenge: text(f, "Risk or Challenge"),
        status: Some(text(f, "Status")).filter(|s| !s.is_empty()),
        ai_score: f
            .get("AI Score")
            .and_then(Value::as_f64)
            .map(|v| v.round().clamp(0.0, 100.0) as u8),
        created_time: record.created_time,
    }
}

/// Flattens an Airtable cell into display text. Multi-selects join with ", ".
fn text(fields: &Map<String, Value>, name: &str) -> String {
    match fields.get(name) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => (if *b { "Yes" } else { "No" }).to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}
