//! Static theme tables: novelty days and the weekly vibe cycle

use chrono::Weekday;
use std::collections::BTreeMap;

/// Built-in novelty days as ((month, day), name)
pub const BUILTIN_NOVELTY_DAYS: &[((u32, u32), &str)] = &[
    ((2, 24), "National Tortilla Chip Day"),
    ((2, 26), "National Toast Day"),
    ((3, 10), "Mario Day"),
    ((3, 14), "Pi Day"),
    ((3, 20), "First Day of Spring"),
    ((5, 4), "Star Wars Day"),
    ((9, 19), "Talk Like a Pirate Day"),
    ((10, 31), "Halloween"),
];

/// Weekly vibes, Sunday first
pub const WEEKLY_VIBES: [&str; 7] = [
    "Silly Sunday",
    "Motivation Monday",
    "Taco Tuesday",
    "Would You Rather Wednesday",
    "Throwback Thursday",
    "Friday Feeling",
    "Gaming Saturday",
];

/// Vibe for a day of the week
pub fn weekly_vibe(weekday: Weekday) -> &'static str {
    WEEKLY_VIBES[weekday.num_days_from_sunday() as usize]
}

/// Parse a "M-D" key such as "3-14". Rejects impossible dates.
pub fn parse_month_day(key: &str) -> Option<(u32, u32)> {
    let (month, day) = key.trim().split_once('-')?;
    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;

    // 2024 is a leap year, so Feb 29 is accepted
    chrono::NaiveDate::from_ymd_opt(2024, month, day)?;
    Some((month, day))
}

/// Novelty-day lookup table
#[derive(Debug, Clone)]
pub struct NoveltyCalendar {
    days: BTreeMap<(u32, u32), String>,
}

impl NoveltyCalendar {
    /// Built-in table only
    pub fn builtin() -> Self {
        let days = BUILTIN_NOVELTY_DAYS
            .iter()
            .map(|(key, name)| (*key, name.to_string()))
            .collect();
        Self { days }
    }

    /// Built-in table with `extra` entries ("M-D" => name) layered on top.
    /// Keys that do not parse are skipped; config validation reports them.
    pub fn with_overrides(extra: &BTreeMap<String, String>) -> Self {
        let mut calendar = Self::builtin();
        for (key, name) in extra {
            if let Some(month_day) = parse_month_day(key) {
                calendar.days.insert(month_day, name.clone());
            }
        }
        calendar
    }

    pub fn lookup(&self, month: u32, day: u32) -> Option<&str> {
        self.days.get(&(month, day)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Default for NoveltyCalendar {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_vibe_cycle() {
        assert_eq!(weekly_vibe(Weekday::Sun), "Silly Sunday");
        assert_eq!(weekly_vibe(Weekday::Tue), "Taco Tuesday");
        assert_eq!(weekly_vibe(Weekday::Sat), "Gaming Saturday");
    }

    #[test]
    fn test_builtin_lookup() {
        let calendar = NoveltyCalendar::builtin();
        assert_eq!(calendar.lookup(3, 14), Some("Pi Day"));
        assert_eq!(calendar.lookup(10, 31), Some("Halloween"));
        assert_eq!(calendar.lookup(1, 2), None);
        assert_eq!(calendar.len(), BUILTIN_NOVELTY_DAYS.len());
    }

    #[test]
    fn test_overrides_add_and_replace() {
        let mut extra = BTreeMap::new();
        extra.insert("7-17".to_string(), "World Emoji Day".to_string());
        extra.insert("3-14".to_string(), "Pie Day".to_string());

        let calendar = NoveltyCalendar::with_overrides(&extra);
        assert_eq!(calendar.lookup(7, 17), Some("World Emoji Day"));
        assert_eq!(calendar.lookup(3, 14), Some("Pie Day"));
        assert_eq!(calendar.lookup(5, 4), Some("Star Wars Day"));
    }

    #[test]
    fn test_parse_month_day() {
        assert_eq!(parse_month_day("3-14"), Some((3, 14)));
        assert_eq!(parse_month_day(" 12-25 "), Some((12, 25)));
        assert_eq!(parse_month_day("2-29"), Some((2, 29)));
        assert_eq!(parse_month_day("2-30"), None);
        assert_eq!(parse_month_day("13-1"), None);
        assert_eq!(parse_month_day("March 14"), None);
    }
}
