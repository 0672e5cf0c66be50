use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::airtable::AirtableClient;
use crate::models::candidate::{Candidate, CandidatePage};

/// Supplies the candidate list. Swapped at startup: live Airtable data or a mock file.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Every candidate the scoring run should consider, in display order.
    async fn candidates(&self) -> Result<Vec<Candidate>>;

    /// One page for the listing endpoint. The default pages an in-memory list,
    /// using the stringified start index as the cursor.
    async fn page(&self, limit: usize, offset: Option<String>) -> Result<CandidatePage> {
        let all = self.candidates().await?;
        let start = offset
            .as_deref()
            .and_then(|o| o.parse::<usize>().ok())
            .unwrap_or(0)
            .min(all.len());
        let end = start.saturating_add(limit).min(all.len());
        let has_more = end < all.len();

        Ok(CandidatePage {
            candidates: all[start..end].to_vec(),
            offset: has_more.then(|| end.to_string()),
            has_more,
        })
    }
}

/// A fixed list, typically the mock data set.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidates {
    candidates: Vec<Candidate>,
}

impl StaticCandidates {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Loads a JSON array of candidates.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mock candidates at {}", path.display()))?;
        let candidates: Vec<Candidate> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse mock candidates at {}", path.display()))?;
        Ok(Self::new(candidates))
    }
}

#[async_trait]
impl CandidateSource for StaticCandidates {
    async fn candidates(&self) -> Result<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }
}

/// Live candidates from the Airtable base.
pub struct AirtableSource {
    client: AirtableClient,
    limit: usize,
}

impl AirtableSource {
    pub fn new(client: AirtableClient, limit: usize) -> Self {
        Self { client, limit }
    }
}

#[async_trait]
impl CandidateSource for AirtableSource {
    async fn candidates(&self) -> Result<Vec<Candidate>> {
        let page = self.client.fetch_candidates(self.limit, None).await?;
        Ok(page.candidates)
    }

    async fn page(&self, limit: usize, offset: Option<String>) -> Result<CandidatePage> {
        Ok(self.client.fetch_candidates(limit, offset).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::testing::candidate;
    use std::io::Write;

    fn three() -> StaticCandidates {
        StaticCandidates::new(vec![
            candidate("a", "Pending"),
            candidate("b", "Pending"),
            candidate("c", "Pending"),
        ])
    }

    #[tokio::test]
    async fn test_default_paging_walks_the_list() {
        let source = three();

        let first = source.page(2, None).await.unwrap();
        assert_eq!(first.candidates.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.offset.as_deref(), Some("2"));

        let second = source.page(2, first.offset).await.unwrap();
        assert_eq!(second.candidates[0].id, "c");
        assert!(!second.has_more);
        assert!(second.offset.is_none());
    }

    #[tokio::test]
    async fn test_default_paging_tolerates_bad_offset() {
        let page = three().page(10, Some("garbage".into())).await.unwrap();
        assert_eq!(page.candidates.len(), 3);

        let past_end = three().page(10, Some("99".into())).await.unwrap();
        assert!(past_end.candidates.is_empty());
        assert!(!past_end.has_more);
    }

    #[tokio::test]
    async fn test_static_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "rec1", "firstName": "Ada", "status": "Pending", "aiScore": 64}}]"#
        )
        .unwrap();

        let source = StaticCandidates::from_path(file.path()).unwrap();
        let all = source.candidates().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ai_score, Some(64));
    }

    #[test]
    fn test_static_from_missing_path_errors() {
        assert!(StaticCandidates::from_path(Path::new("/nonexistent/mock.json")).is_err());
    }
}
