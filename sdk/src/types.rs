//! Question and theme types shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded question.
///
/// `date` is the canonical date string for the day the question was
/// generated (for example `October 18, 2026`). Entries are never edited
/// after they are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub question: String,
}

impl HistoryEntry {
    /// Create a new history entry
    pub fn new(date: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            question: question.into(),
        }
    }
}

/// Where a theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSource {
    /// Official public holiday from the holiday lookup
    Holiday,

    /// Entry in the novelty-day calendar
    Novelty,

    /// Day-of-week vibe
    Weekly,
}

impl fmt::Display for ThemeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeSource::Holiday => write!(f, "holiday"),
            ThemeSource::Novelty => write!(f, "novelty"),
            ThemeSource::Weekly => write!(f, "weekly"),
        }
    }
}

/// Theme for one run. Derived from the date each run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeContext {
    /// Short label, e.g. "Pi Day" or "Taco Tuesday"
    pub theme: String,

    /// Major themes may be named in the question; ambient ones may not
    pub is_major: bool,

    pub source: ThemeSource,
}

impl ThemeContext {
    /// Theme taken from an official holiday
    pub fn holiday(name: impl Into<String>) -> Self {
        Self {
            theme: name.into(),
            is_major: true,
            source: ThemeSource::Holiday,
        }
    }

    /// Theme taken from the novelty calendar
    pub fn novelty(name: impl Into<String>) -> Self {
        Self {
            theme: name.into(),
            is_major: true,
            source: ThemeSource::Novelty,
        }
    }

    /// Ambient day-of-week theme
    pub fn weekly(name: impl Into<String>) -> Self {
        Self {
            theme: name.into(),
            is_major: false,
            source: ThemeSource::Weekly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_json_shape() {
        let entry = HistoryEntry::new("March 14, 2026", "What's your favorite pie?");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "March 14, 2026");
        assert_eq!(json["question"], "What's your favorite pie?");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_theme_constructors_set_major_flag() {
        assert!(ThemeContext::holiday("Labor Day").is_major);
        assert!(ThemeContext::novelty("Pi Day").is_major);
        assert!(!ThemeContext::weekly("Taco Tuesday").is_major);
        assert_eq!(ThemeContext::weekly("x").source, ThemeSource::Weekly);
    }

    #[test]
    fn test_theme_source_serialization() {
        let json = serde_json::to_string(&ThemeSource::Novelty).unwrap();
        assert_eq!(json, r#""novelty""#);
    }
}
