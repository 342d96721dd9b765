//! Public holiday lookup
//!
//! Talks to a Nager.Date compatible API:
//! `GET {base_url}/PublicHolidays/{year}/{country}` returning
//! `[{"date": "2026-07-04", "localName": "...", "name": "Independence Day", ...}]`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::secrets::scrub;

/// Errors from the holiday lookup. None of these are fatal to a run.
#[derive(Debug, Error)]
pub enum HolidayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Holiday API returned status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One public holiday
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicHoliday {
    /// ISO date, e.g. "2026-07-04"
    pub date: String,

    /// English name
    pub name: String,

    #[serde(default, rename = "localName")]
    pub local_name: Option<String>,
}

/// Year -> public holidays
#[async_trait]
pub trait HolidayLookup: Send + Sync {
    async fn public_holidays(&self, year: i32) -> Result<Vec<PublicHoliday>, HolidayError>;
}

/// HTTP client for the Nager.Date public holiday API
pub struct NagerHolidayClient {
    base_url: String,
    country_code: String,
    client: Client,
}

impl NagerHolidayClient {
    pub fn new(base_url: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            country_code: country_code.into(),
            client: Client::new(),
        }
    }

    fn url(&self, year: i32) -> String {
        format!(
            "{}/PublicHolidays/{}/{}",
            self.base_url.trim_end_matches('/'),
            year,
            self.country_code
        )
    }
}

#[async_trait]
impl HolidayLookup for NagerHolidayClient {
    async fn public_holidays(&self, year: i32) -> Result<Vec<PublicHoliday>, HolidayError> {
        let response = self
            .client
            .get(self.url(year))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| HolidayError::Network(scrub(&e.to_string())))?;

        let status = response.status();

        // Unknown country codes answer 204 with no body
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        if !status.is_success() {
            return Err(HolidayError::Status(status.as_u16()));
        }

        response
            .json::<Vec<PublicHoliday>>()
            .await
            .map_err(|e| HolidayError::Parse(e.to_string()))
    }
}
