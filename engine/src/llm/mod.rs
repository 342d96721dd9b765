//! Text generation provider layer
//!
//! [`LLMProvider`] is the seam to the generative text service. A provider
//! serves any model name it is asked for; [`router::ModelRouter`] walks the
//! ordered candidate list and decides when to fall back.

use async_trait::async_trait;
use sdk::errors::EngineError;

pub mod gemini;
pub mod router;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Model overloaded: {0}")]
    Overloaded(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("All candidate models exhausted (tried: {})", attempted.join(", "))]
    ExhaustedCandidates { attempted: Vec<String> },
}

impl LLMError {
    /// Rate-limit and overload failures may move on to the next candidate.
    /// Everything else stops the chain.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(self, LLMError::RateLimitExceeded(_) | LLMError::Overloaded(_))
    }
}

impl From<LLMError> for EngineError {
    fn from(e: LLMError) -> Self {
        match e {
            LLMError::ExhaustedCandidates { attempted } => {
                EngineError::ExhaustedCandidates { attempted }
            }
            LLMError::Timeout(_) => EngineError::LLMTimeout,
            LLMError::NetworkError(msg) => EngineError::Network(msg),
            other => EngineError::LLMProvider(other.to_string()),
        }
    }
}

/// LLM Provider trait that all providers must implement
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "gemini")
    fn name(&self) -> &str;

    /// Generate a completion for `prompt` with `model`
    ///
    /// # Returns
    /// * `Ok(String)` - Raw generated text
    /// * `Err(LLMError)` - Classified failure
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

/// Quote characters removed from the ends of a generated question
pub const QUOTE_CHARS: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '`'];

/// Trim whitespace and strip wrapping quote characters.
///
/// Apostrophes inside the text ("What's") are kept.
pub fn clean_question(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| QUOTE_CHARS.contains(&c) || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_eligibility() {
        assert!(LLMError::RateLimitExceeded("429".into()).is_fallback_eligible());
        assert!(LLMError::Overloaded("503".into()).is_fallback_eligible());
        assert!(!LLMError::AuthenticationFailed("403".into()).is_fallback_eligible());
        assert!(!LLMError::InvalidRequest("400".into()).is_fallback_eligible());
        assert!(!LLMError::ProviderUnavailable("500".into()).is_fallback_eligible());
        assert!(!LLMError::Timeout(30).is_fallback_eligible());
    }

    #[test]
    fn test_clean_question_strips_wrapping_quotes() {
        assert_eq!(
            clean_question("  \"What's your favorite pie?\"\n"),
            "What's your favorite pie?"
        );
        assert_eq!(
            clean_question("\u{201C}Which board game never gets old?\u{201D}"),
            "Which board game never gets old?"
        );
        assert_eq!(clean_question("'  spaced?  '"), "spaced?");
    }

    #[test]
    fn test_clean_question_keeps_inner_apostrophes() {
        assert_eq!(
            clean_question("What's the best snack you've ever had?"),
            "What's the best snack you've ever had?"
        );
    }

    #[test]
    fn test_clean_question_all_quotes() {
        assert_eq!(clean_question("\"\""), "");
    }

    #[test]
    fn test_engine_error_conversion() {
        let err: EngineError = LLMError::ExhaustedCandidates {
            attempted: vec!["a".into()],
        }
        .into();
        assert!(matches!(err, EngineError::ExhaustedCandidates { .. }));

        let err: EngineError = LLMError::Timeout(30).into();
        assert!(matches!(err, EngineError::LLMTimeout));

        let err: EngineError = LLMError::AuthenticationFailed("no".into()).into();
        assert!(matches!(err, EngineError::LLMProvider(_)));
    }
}
