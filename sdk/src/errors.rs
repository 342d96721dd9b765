//! Error types and handling
//!
//! This module provides the error types used throughout the qotd engine.
//! All errors implement the `QotdErrorExt` trait which provides operator
//! hints and indicates whether a later scheduled run can be expected to
//! succeed without intervention.
//!
//! # Security
//!
//! Error messages must never carry the provider credential or the webhook
//! token. Callers scrub provider/transport messages before wrapping them.

use thiserror::Error;

/// Trait for qotd error extensions
pub trait QotdErrorExt {
    /// Returns a short hint for the operator reading the job log
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors are expected to clear up on the next scheduled run
    /// (quota resets, provider load). Non-recoverable errors need a config or
    /// environment change.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// Every variant here is fatal for the current run: it aborts the rest of the
/// orchestration and makes the process exit non-zero. Tolerated failures
/// (holiday lookup, missing webhook, unreadable history) never reach this type.
///
/// # Examples
///
/// ```
/// use sdk::errors::{EngineError, QotdErrorExt};
///
/// let error = EngineError::ExhaustedCandidates {
///     attempted: vec!["gemini-2.5-flash".into(), "gemini-1.5-flash".into()],
/// };
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal_error = EngineError::MissingCredential("GEMINI_API_KEY".into());
/// assert!(!fatal_error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    // Generation errors
    #[error("All candidate models exhausted (tried: {})", attempted.join(", "))]
    ExhaustedCandidates { attempted: Vec<String> },

    #[error("LLM provider error: {0}")]
    LLMProvider(String),

    #[error("LLM call timed out")]
    LLMTimeout,

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),
}

impl QotdErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check qotd.toml and the QOTD_* environment variables",
            Self::MissingCredential(_) => "Set GEMINI_API_KEY in the job environment",
            Self::ExhaustedCandidates { .. } => {
                "Every candidate model is rate limited or overloaded. The next run will retry"
            }
            Self::LLMProvider(_) => "The generation provider rejected the request. Check the model names and API key",
            Self::LLMTimeout => "The generation provider took too long to respond",
            Self::Storage(_) => "Could not write question files. Check data_dir permissions and free space",
            Self::Network(_) => "Network operation failed. Check your connection",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::MissingCredential(_) | Self::LLMProvider(_) => false,
            Self::ExhaustedCandidates { .. }
            | Self::LLMTimeout
            | Self::Storage(_)
            | Self::Network(_) => true,
        }
    }
}
