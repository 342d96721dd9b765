//! Discord webhook publisher
//!
//! Posts a single embed:
//!
//! ```json
//! {"embeds": [{"title": "❓ ?OTD — October 18, 2026",
//!              "description": "### What's your favorite pie?",
//!              "color": 3447003,
//!              "footer": {"text": "Reply in this thread to join the conversation!"}}]}
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{Delivery, PublishError, Publisher};
use crate::calendar::RunDate;
use crate::config::Config;
use crate::secrets::{scrub, SecretString};

#[derive(Debug, Serialize, PartialEq)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

/// Build the embed payload for a question
pub fn build_payload(question: &str, date: &RunDate, color: u32, footer: &str) -> WebhookPayload {
    let footer = if footer.trim().is_empty() {
        None
    } else {
        Some(EmbedFooter {
            text: footer.to_string(),
        })
    };

    WebhookPayload {
        embeds: vec![Embed {
            title: format!("❓ ?OTD — {}", date.canonical()),
            description: format!("### {}", question),
            color,
            footer,
        }],
    }
}

pub struct DiscordWebhook {
    url: Option<SecretString>,
    color: u32,
    footer: String,
    timeout: Duration,
    client: Client,
}

impl std::fmt::Debug for DiscordWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordWebhook")
            .field("configured", &self.is_configured())
            .field("color", &self.color)
            .finish()
    }
}

impl DiscordWebhook {
    pub fn new(url: Option<SecretString>, color: u32, footer: String, timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                // Each request still carries the timeout below
                tracing::warn!("Failed to build webhook client, using defaults: {}", e);
                Client::new()
            }
        };

        Self {
            url,
            color,
            footer,
            timeout,
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.notify.webhook_url.clone(),
            config.notify.color,
            config.notify.footer.clone(),
            config.notify_timeout(),
        )
    }

    /// True when a non-blank destination is set
    pub fn is_configured(&self) -> bool {
        self.url.as_ref().is_some_and(|u| !u.is_blank())
    }
}

#[async_trait]
impl Publisher for DiscordWebhook {
    async fn publish(&self, question: &str, date: &RunDate) -> Result<Delivery, PublishError> {
        let url = match self.url.as_ref().filter(|u| !u.is_blank()) {
            Some(url) => url,
            None => {
                tracing::info!("No webhook configured, skipping publish");
                return Ok(Delivery::Skipped);
            }
        };

        let payload = build_payload(question, date, self.color, &self.footer);

        let response = self
            .client
            .post(url.unsecure())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PublishError::Network(scrub(&e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body: scrub(&body),
            });
        }

        tracing::info!("Published question for {}", date);
        Ok(Delivery::Delivered)
    }
}
