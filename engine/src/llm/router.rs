//! Model Router
//!
//! Walks the ordered candidate model list for a single generation request.
//!
//! Policy:
//! - Candidates are tried in configured order, each at most once.
//! - The first success is cleaned up and returned; later candidates are not tried.
//! - A rate-limit or overload failure on a non-final candidate moves on to the next.
//! - Any other failure stops the chain and propagates as-is.
//! - A rate-limit or overload failure on the final candidate ends in
//!   [`LLMError::ExhaustedCandidates`].
//!
//! There is no backoff and no retry of the same candidate.

use super::{clean_question, LLMError, LLMProvider};
use std::sync::Arc;
use std::time::Duration;

/// A successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Cleaned question text
    pub text: String,

    /// Model that produced it
    pub model: String,
}

/// Ordered-fallback generator over one provider
pub struct ModelRouter {
    provider: Arc<dyn LLMProvider>,
    timeout: Duration,
}

impl ModelRouter {
    /// Create a new router
    ///
    /// # Arguments
    /// * `provider` - Provider serving every candidate model
    /// * `timeout` - Limit for each attempt
    pub fn new(provider: Arc<dyn LLMProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Generate text for `prompt`, falling back through `candidates`
    pub async fn generate(
        &self,
        prompt: &str,
        candidates: &[String],
    ) -> super::Result<Generation> {
        let mut attempted = Vec::with_capacity(candidates.len());

        for (index, model) in candidates.iter().enumerate() {
            let is_last = index + 1 == candidates.len();
            attempted.push(model.clone());

            tracing::info!(
                "Attempting with {} via {} (timeout: {}s)",
                model,
                self.provider.name(),
                self.timeout.as_secs()
            );

            let result = tokio::time::timeout(self.timeout, self.provider.generate(model, prompt))
                .await
                .unwrap_or_else(|_| Err(LLMError::Timeout(self.timeout.as_secs())));

            match result {
                Ok(raw) => {
                    let text = clean_question(&raw);
                    if text.is_empty() {
                        tracing::error!("{} returned an empty question", model);
                        return Err(LLMError::ParseError(format!(
                            "{} returned an empty question",
                            model
                        )));
                    }

                    tracing::info!("Successfully generated using {}", model);
                    return Ok(Generation {
                        text,
                        model: model.clone(),
                    });
                }
                Err(e) if e.is_fallback_eligible() && !is_last => {
                    tracing::warn!("{} unavailable ({}). Falling back...", model, e);
                }
                Err(e) if e.is_fallback_eligible() => {
                    tracing::error!("{} unavailable ({}) and no candidates remain", model, e);
                    return Err(LLMError::ExhaustedCandidates { attempted });
                }
                Err(e) => {
                    tracing::error!("{} failed: {}", model, e);
                    return Err(e);
                }
            }
        }

        tracing::error!("No candidate models configured");
        Err(LLMError::ExhaustedCandidates { attempted })
    }
}
