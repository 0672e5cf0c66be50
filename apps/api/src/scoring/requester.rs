use async_trait::async_trait;

use crate::llm_client::prompts::{candidate_prompt, SCORING_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::candidate::Candidate;
use crate::scoring::{Score, ScoringError};

/// Cheap model used unless the caller asks for another.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Produces one score for one candidate. Implementations must not retry or cache;
/// every call is a fresh request.
#[async_trait]
pub trait ScoreRequester: Send + Sync {
    async fn score(
        &self,
        candidate: &Candidate,
        api_key: &str,
        model: &str,
    ) -> Result<Score, ScoringError>;
}

/// Scores candidates through the chat-completion endpoint.
#[derive(Clone)]
pub struct LlmScoreRequester {
    llm: LlmClient,
}

impl LlmScoreRequester {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ScoreRequester for LlmScoreRequester {
    async fn score(
        &self,
        candidate: &Candidate,
        api_key: &str,
        model: &str,
    ) -> Result<Score, ScoringError> {
        let prompt = candidate_prompt(candidate);
        let reply = self
            .llm
            .complete_text(api_key, model, SCORING_SYSTEM, &prompt)
            .await
            .map_err(ScoringError::from)?;
        parse_score(&reply)
    }
}

impl From<LlmError> for ScoringError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, .. } => ScoringError::Request { status },
            LlmError::Http(e) => ScoringError::Transport(e.to_string()),
            LlmError::Parse(e) => ScoringError::Validation(format!("malformed reply ({e})")),
            LlmError::EmptyContent => ScoringError::Validation("empty reply".to_string()),
        }
    }
}

/// Parses a model reply into a score.
///
/// Lenient like a leading-integer parse: surrounding whitespace and trailing
/// text after the digits are ignored ("85/100" is 85). Anything without leading
/// digits, or outside 0-100, is rejected.
pub fn parse_score(reply: &str) -> Result<Score, ScoringError> {
    let text = reply.trim();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(ScoringError::Validation(format!("{text:?}")));
    }

    let magnitude: i64 = rest[..digits_len]
        .parse()
        .map_err(|_| ScoringError::Validation(format!("{text:?}")))?;
    let value = sign * magnitude;

    Score::new(value).ok_or_else(|| ScoringError::Validation(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(reply: &str) -> u8 {
        parse_score(reply).unwrap().value()
    }

    fn is_validation(reply: &str) -> bool {
        matches!(parse_score(reply), Err(ScoringError::Validation(_)))
    }

    #[test]
    fn test_parses_in_range_integers() {
        assert_eq!(ok("73"), 73);
        assert_eq!(ok("0"), 0);
        assert_eq!(ok("100"), 100);
        assert_eq!(ok("  42\n"), 42);
    }

    #[test]
    fn test_ignores_trailing_text() {
        assert_eq!(ok("85/100"), 85);
        assert_eq!(ok("61."), 61);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(is_validation("150"));
        assert!(is_validation("101"));
        assert!(is_validation("-5"));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(is_validation("abc"));
        assert!(is_validation(""));
        assert!(is_validation("Score: 80"));
        assert!(is_validation("99999999999999999999999"));
    }

    #[test]
    fn test_out_of_range_error_carries_value() {
        match parse_score("150") {
            Err(ScoringError::Validation(v)) => assert_eq!(v, "150"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_status_maps_to_request_error() {
        let err = ScoringError::from(LlmError::Api {
            status: 401,
            message: "bad key".to_string(),
        });
        assert!(matches!(err, ScoringError::Request { status: 401 }));
        assert!(matches!(
            ScoringError::from(LlmError::EmptyContent),
            ScoringError::Validation(_)
        ));
    }
}
