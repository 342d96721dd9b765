//! Theme resolution
//!
//! Picks the flavor for the day's question, in priority order:
//!
//! 1. An official public holiday on today's date (major)
//! 2. A novelty day from the static calendar (major)
//! 3. The weekly vibe for the day of the week (ambient)
//!
//! The holiday lookup is best-effort. Network failure, a bad response or a
//! timeout falls through to steps 2 and 3 and never aborts the run.

pub mod holidays;
pub mod novelty;

use sdk::types::ThemeContext;
use std::sync::Arc;
use std::time::Duration;

use crate::calendar::RunDate;
use crate::config::Config;
use holidays::{HolidayLookup, NagerHolidayClient};
use novelty::{weekly_vibe, NoveltyCalendar};

/// Resolves the [`ThemeContext`] for a date
pub struct ThemeResolver {
    /// `None` when the holiday lookup is disabled
    holidays: Option<Arc<dyn HolidayLookup>>,
    novelty: NoveltyCalendar,
    timeout: Duration,
}

impl ThemeResolver {
    pub fn new(
        holidays: Option<Arc<dyn HolidayLookup>>,
        novelty: NoveltyCalendar,
        timeout: Duration,
    ) -> Self {
        Self {
            holidays,
            novelty,
            timeout,
        }
    }

    /// Build the resolver described by the configuration
    pub fn from_config(config: &Config) -> Self {
        let holidays: Option<Arc<dyn HolidayLookup>> = if config.holidays.enabled {
            Some(Arc::new(NagerHolidayClient::new(
                config.holidays.base_url.clone(),
                config.holidays.country_code.clone(),
            )))
        } else {
            None
        };

        Self::new(
            holidays,
            NoveltyCalendar::with_overrides(&config.themes.novelty),
            config.holidays_timeout(),
        )
    }

    /// Resolve today's theme. Never fails.
    pub async fn resolve(&self, date: &RunDate) -> ThemeContext {
        if let Some(name) = self.official_holiday(date).await {
            tracing::info!("Theme from public holiday: {}", name);
            return ThemeContext::holiday(name);
        }

        if let Some(name) = self.novelty.lookup(date.month(), date.day()) {
            tracing::info!("Theme from novelty calendar: {}", name);
            return ThemeContext::novelty(name);
        }

        let vibe = weekly_vibe(date.weekday());
        tracing::info!("Theme from weekly vibe: {}", vibe);
        ThemeContext::weekly(vibe)
    }

    /// Name of today's public holiday, if the lookup succeeds and has one
    async fn official_holiday(&self, date: &RunDate) -> Option<String> {
        let lookup = self.holidays.as_ref()?;

        let result = tokio::time::timeout(self.timeout, lookup.public_holidays(date.year())).await;

        let holidays = match result {
            Ok(Ok(holidays)) => holidays,
            Ok(Err(e)) => {
                tracing::warn!("Holiday lookup failed, falling back: {}", e);
                return None;
            }
            Err(_) => {
                tracing::warn!(
                    "Holiday lookup timed out after {}s, falling back",
                    self.timeout.as_secs()
                );
                return None;
            }
        };

        let today = date.iso();
        holidays
            .into_iter()
            .find(|h| h.date == today)
            .map(|h| h.name)
    }
}
