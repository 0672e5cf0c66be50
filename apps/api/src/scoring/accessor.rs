use crate::models::candidate::Candidate;
use crate::scoring::ScoreStore;

/// Shown when neither a recorded nor an embedded score exists.
pub const DEFAULT_AI_SCORE: u8 = 50;

/// Score to display for a candidate: the recorded AI score, else the score embedded
/// in the upstream record, else [`DEFAULT_AI_SCORE`]. An embedded 0 is a real score.
pub fn score_for(store: &ScoreStore, candidate_id: &str, candidate: Option<&Candidate>) -> u8 {
    store
        .get(candidate_id)
        .map(|s| s.value())
        .or_else(|| candidate.and_then(|c| c.ai_score))
        .unwrap_or(DEFAULT_AI_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::storage::MemoryStorage;
    use crate::scoring::testing::{candidate, score, CountingNotifier};
    use std::sync::Arc;

    fn store() -> ScoreStore {
        ScoreStore::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(CountingNotifier::default()),
        )
    }

    #[test]
    fn test_recorded_score_wins() {
        let mut store = store();
        store.insert("rec1", score(91));
        let mut c = candidate("rec1", "Stage 1");
        c.ai_score = Some(10);

        assert_eq!(score_for(&store, "rec1", Some(&c)), 91);
    }

    #[test]
    fn test_falls_back_to_embedded_score() {
        let mut c = candidate("rec1", "Stage 1");
        c.ai_score = Some(0);
        assert_eq!(score_for(&store(), "rec1", Some(&c)), 0);
    }

    #[test]
    fn test_falls_back_to_default() {
        let store = store();
        assert_eq!(score_for(&store, "rec1", None), DEFAULT_AI_SCORE);
        assert_eq!(
            score_for(&store, "rec1", Some(&candidate("rec1", "Stage 1"))),
            DEFAULT_AI_SCORE
        );
    }
}
