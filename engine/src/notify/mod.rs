//! Outbound notification
//!
//! Publishing happens after the question has been committed locally, so a
//! failure here is reported and never rolls anything back.

pub mod discord;

use async_trait::async_trait;
use thiserror::Error;

use crate::calendar::RunDate;

pub use discord::DiscordWebhook;

/// Errors from a delivery attempt
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Channel rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// What happened to the notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by the channel
    Delivered,

    /// No destination configured
    Skipped,

    /// Attempted and failed; the reason is already scrubbed
    Failed(String),
}

impl Delivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::Delivered => "delivered",
            Delivery::Skipped => "skipped",
            Delivery::Failed(_) => "failed",
        }
    }
}

/// Notification channel
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Deliver `question` for `date`.
    ///
    /// Returns `Ok(Delivery::Skipped)` when no destination is configured.
    async fn publish(&self, question: &str, date: &RunDate) -> Result<Delivery, PublishError>;
}
