use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An applicant record as served to the review UI.
///
/// Owned by the upstream data store; this service only reads it. The wire form
/// is camelCase so mock files and the browser share one shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub technical: String,
    pub location: String,
    pub school_or_work: String,
    pub project_description: String,
    pub problem_solving: String,
    pub expertise: String,
    pub competitors: String,
    pub past_work: String,
    pub achievements: String,
    pub risk_or_challenge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Score embedded in the upstream record, used when nothing has been recorded locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One page of candidates from the upstream store. `offset` is the opaque cursor
/// for the next page, present only while more records remain.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePage {
    pub candidates: Vec<Candidate>,
    pub offset: Option<String>,
    pub has_more: bool,
}
