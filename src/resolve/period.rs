//! Time-period detection for list requests.
//!
//! Turns phrases like "today", "next week", or "from 15 feb to 23 feb" into
//! a concrete date window. Detection is split from date math so the intent
//! classifier can ask "is there a period here?" without knowing the clock.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// What kind of window the sentence named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Today,
    Tomorrow,
    DayAfterTomorrow,
    ThisWeek,
    NextWeek,
    Date,
    Range,
    All,
}

/// A resolved listing window. `end` is `None` for single-day windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub kind: PeriodKind,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub confidence: f32,
}

/// A detected period before any calendar math.
#[derive(Debug, Clone)]
struct Detected {
    kind: PeriodKind,
    confidence: f32,
    start_day: Option<u32>,
    end_day: Option<u32>,
    relative_start: Option<i64>,
    relative_end: Option<i64>,
}

impl Detected {
    fn keyword(kind: PeriodKind, confidence: f32) -> Self {
        Self {
            kind,
            confidence,
            start_day: None,
            end_day: None,
            relative_start: None,
            relative_end: None,
        }
    }
}

// ============================================================================
// Keyword groups
// ============================================================================

static TODAY_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["today"].into_iter().collect());

static TOMORROW_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["tomorrow", "tmr", "tmrw"].into_iter().collect());

static DAY_AFTER_TOMORROW_PHRASES: &[&str] =
    &["day after tomorrow", "day after tmrw", "day after tmr"];

static THIS_WEEK_PHRASES: &[&str] = &[
    "this week",
    "current week",
    "within this week",
    "during this week",
];

static NEXT_WEEK_PHRASES: &[&str] = &["next week", "following week", "upcoming week"];

static DATE_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "mon",
        "tue", "wed", "thu", "fri", "sat", "sun", "january", "february", "march", "april", "may",
        "june", "july", "august", "september", "october", "november", "december", "jan", "feb",
        "mar", "apr", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ]
    .into_iter()
    .collect()
});

static RANGE_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["from", "between", "range", "period", "start", "end", "until"]
        .into_iter()
        .collect()
});

static ALL_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["all", "every", "each"].into_iter().collect());

// ============================================================================
// Patterns
// ============================================================================

const MONTH_ALTERNATION: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|january|february|march|april|june|july|august|september|october|november|december";

static ORDINAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").expect("Invalid regex"));

static RANGE_TODAY_TOMORROW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+today\s+to\s+tomorrow").expect("Invalid regex"));

static RANGE_FROM_RELATIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"from\s+(today|tomorrow)\s+to\s+(\d{{1,2}})\s*(?:{MONTH_ALTERNATION})?"
    ))
    .expect("Invalid regex")
});

static RANGE_FROM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"from\s+(\d{{1,2}})\s*(?:{MONTH_ALTERNATION})?\s*to\s+(\d{{1,2}})"
    ))
    .expect("Invalid regex")
});

static RANGE_BETWEEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"between\s+(\d{{1,2}})\s*(?:{MONTH_ALTERNATION})?\s*(?:and|to)\s+(\d{{1,2}})"
    ))
    .expect("Invalid regex")
});

static DATE_WITH_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(\d{{1,2}})\s+({MONTH_ALTERNATION})\b")).expect("Invalid regex")
});

static MONTH_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({MONTH_ALTERNATION})\b")).expect("Invalid regex")
});

// ============================================================================
// Normalization
// ============================================================================

/// Lowercase, fold ordinals (`23rd` -> `23`), and strip punctuation while
/// keeping `:`, `/`, and `-` for date forms.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let folded = ORDINAL_PATTERN.replace_all(&lowered, "$1");
    let cleaned: String = folded
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || matches!(c, ':' | '/' | '-' | '\'') {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn month_number(name: &str) -> Option<u32> {
    let month = match &name[..3.min(name.len())] {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// First month name anywhere in the normalized text.
fn find_month(text: &str) -> Option<u32> {
    MONTH_NAME_PATTERN
        .captures(text)
        .and_then(|caps| month_number(&caps[1]))
}

// ============================================================================
// Detection
// ============================================================================

fn detect(text: &str) -> Option<Detected> {
    let words: Vec<&str> = text.split_whitespace().collect();

    let all_found = words.iter().any(|w| ALL_WORDS.contains(w));

    if RANGE_TODAY_TOMORROW_PATTERN.is_match(text) {
        let mut detected = Detected::keyword(PeriodKind::Range, 0.95);
        detected.relative_start = Some(0);
        detected.relative_end = Some(1);
        return Some(detected);
    }

    if let Some(caps) = RANGE_FROM_RELATIVE_PATTERN.captures(text) {
        let mut detected = Detected::keyword(PeriodKind::Range, 0.95);
        detected.relative_start = Some(if &caps[1] == "today" { 0 } else { 1 });
        detected.end_day = caps[2].parse().ok();
        return Some(detected);
    }

    if let Some(caps) = RANGE_FROM_PATTERN.captures(text) {
        let mut detected = Detected::keyword(PeriodKind::Range, 0.95);
        detected.start_day = caps[1].parse().ok();
        detected.end_day = caps[2].parse().ok();
        return Some(detected);
    }

    if let Some(caps) = RANGE_BETWEEN_PATTERN.captures(text) {
        let mut detected = Detected::keyword(PeriodKind::Range, 0.95);
        detected.start_day = caps[1].parse().ok();
        detected.end_day = caps[2].parse().ok();
        return Some(detected);
    }

    if let Some(caps) = DATE_WITH_MONTH_PATTERN.captures(text) {
        let mut detected = Detected::keyword(PeriodKind::Date, 0.90);
        detected.start_day = caps[1].parse().ok();
        return Some(detected);
    }

    // "day after tomorrow" contains "tomorrow", so it goes first.
    if DAY_AFTER_TOMORROW_PHRASES.iter().any(|p| text.contains(p)) {
        return Some(Detected::keyword(PeriodKind::DayAfterTomorrow, 0.95));
    }

    if words.iter().any(|w| TODAY_WORDS.contains(w)) {
        return Some(Detected::keyword(PeriodKind::Today, 0.95));
    }

    if words.iter().any(|w| TOMORROW_WORDS.contains(w)) {
        return Some(Detected::keyword(PeriodKind::Tomorrow, 0.95));
    }

    if THIS_WEEK_PHRASES.iter().any(|p| text.contains(p)) {
        return Some(Detected::keyword(PeriodKind::ThisWeek, 0.95));
    }

    if NEXT_WEEK_PHRASES.iter().any(|p| text.contains(p)) {
        return Some(Detected::keyword(PeriodKind::NextWeek, 0.95));
    }

    if words.iter().any(|w| DATE_WORDS.contains(w)) {
        return Some(Detected::keyword(PeriodKind::Date, 0.85));
    }

    if words.iter().any(|w| RANGE_WORDS.contains(w)) {
        return Some(Detected::keyword(PeriodKind::Range, 0.80));
    }

    if all_found {
        return Some(Detected::keyword(PeriodKind::All, 0.70));
    }

    None
}

/// Whether the sentence names any listing window at all.
pub fn has_time_period(text: &str) -> bool {
    detect(&normalize(text)).is_some()
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the period named in `text` into concrete dates, relative to
/// `today`. Returns `None` when no period is present.
pub fn resolve(text: &str, today: NaiveDate) -> Option<TimePeriod> {
    let normalized = normalize(text);
    let detected = detect(&normalized)?;

    let period = match detected.kind {
        PeriodKind::Today => single_day(PeriodKind::Today, today, detected.confidence),
        PeriodKind::Tomorrow => single_day(
            PeriodKind::Tomorrow,
            today + Duration::days(1),
            detected.confidence,
        ),
        PeriodKind::DayAfterTomorrow => single_day(
            PeriodKind::DayAfterTomorrow,
            today + Duration::days(2),
            detected.confidence,
        ),
        PeriodKind::ThisWeek => {
            let days_until_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
            TimePeriod {
                kind: PeriodKind::ThisWeek,
                start: today,
                end: Some(today + Duration::days(days_until_sunday)),
                confidence: detected.confidence,
            }
        }
        PeriodKind::NextWeek => {
            let days_until_monday = 7 - i64::from(today.weekday().num_days_from_monday());
            let start = today + Duration::days(days_until_monday);
            TimePeriod {
                kind: PeriodKind::NextWeek,
                start,
                end: Some(start + Duration::days(6)),
                confidence: detected.confidence,
            }
        }
        PeriodKind::Range => resolve_range(&detected, &normalized, today),
        PeriodKind::Date => resolve_date(&detected, &normalized, today),
        PeriodKind::All => wide_window(PeriodKind::All, today, detected.confidence),
    };

    Some(period)
}

fn single_day(kind: PeriodKind, date: NaiveDate, confidence: f32) -> TimePeriod {
    TimePeriod {
        kind,
        start: date,
        end: None,
        confidence,
    }
}

/// Fallback used when a range or date fails to parse: the next 30 days.
fn wide_window(kind: PeriodKind, today: NaiveDate, confidence: f32) -> TimePeriod {
    TimePeriod {
        kind,
        start: today,
        end: Some(today + Duration::days(30)),
        confidence,
    }
}

fn resolve_range(detected: &Detected, text: &str, today: NaiveDate) -> TimePeriod {
    let confidence = detected.confidence;
    let month = find_month(text);

    // "from today to tomorrow"
    if let (Some(start_offset), Some(end_offset)) = (detected.relative_start, detected.relative_end)
    {
        return TimePeriod {
            kind: PeriodKind::Range,
            start: today + Duration::days(start_offset),
            end: Some(today + Duration::days(end_offset)),
            confidence,
        };
    }

    // "from today to 23 feb"
    if let (Some(start_offset), Some(end_day)) = (detected.relative_start, detected.end_day) {
        let start = today + Duration::days(start_offset);
        // Without an explicit month, an end day earlier in the month than
        // today means the next month.
        let end_month = match month {
            Some(m) => (today.year(), m),
            None if end_day < today.day() => next_month(today.year(), today.month()),
            None => (today.year(), today.month()),
        };
        let end = NaiveDate::from_ymd_opt(end_month.0, end_month.1, end_day);
        return match end {
            Some(end) => TimePeriod {
                kind: PeriodKind::Range,
                start,
                end: Some(end),
                confidence,
            },
            None => wide_window(PeriodKind::Range, today, confidence),
        };
    }

    // "from 15 to 23 feb", "between 15 and 23"
    if let (Some(start_day), Some(end_day)) = (detected.start_day, detected.end_day) {
        let (year, month) = match month {
            Some(m) => (today.year(), m),
            None => (today.year(), today.month()),
        };
        let start = NaiveDate::from_ymd_opt(year, month, start_day);
        let (end_year, end_month) = if end_day < start_day {
            next_month(year, month)
        } else {
            (year, month)
        };
        let end = NaiveDate::from_ymd_opt(end_year, end_month, end_day);
        return match (start, end) {
            (Some(start), Some(end)) => TimePeriod {
                kind: PeriodKind::Range,
                start,
                end: Some(end),
                confidence,
            },
            _ => wide_window(PeriodKind::Range, today, confidence),
        };
    }

    // A bare range word ("from", "until") with no usable dates.
    wide_window(PeriodKind::Range, today, confidence)
}

fn resolve_date(detected: &Detected, text: &str, today: NaiveDate) -> TimePeriod {
    let confidence = detected.confidence;

    if let Some(day) = detected.start_day {
        let month = find_month(text).unwrap_or(today.month());
        return match NaiveDate::from_ymd_opt(today.year(), month, day) {
            Some(date) => single_day(PeriodKind::Date, date, confidence),
            None => wide_window(PeriodKind::Date, today, confidence),
        };
    }

    // Weekday or month name alone: no concrete day, use a wide window.
    wide_window(PeriodKind::Date, today, confidence)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_and_tomorrow() {
        let today = date(2025, 2, 10);
        let period = resolve("show events for today", today).unwrap();
        assert_eq!(period.kind, PeriodKind::Today);
        assert_eq!(period.start, today);
        assert_eq!(period.end, None);

        let period = resolve("meetings tomorrow", today).unwrap();
        assert_eq!(period.kind, PeriodKind::Tomorrow);
        assert_eq!(period.start, date(2025, 2, 11));
    }

    #[test]
    fn test_day_after_tomorrow_wins_over_tomorrow() {
        let today = date(2025, 2, 10);
        let period = resolve("events day after tomorrow", today).unwrap();
        assert_eq!(period.kind, PeriodKind::DayAfterTomorrow);
        assert_eq!(period.start, date(2025, 2, 12));
    }

    #[test]
    fn test_this_week_ends_on_sunday() {
        // 2025-02-10 is a Monday
        let today = date(2025, 2, 10);
        let period = resolve("list events this week", today).unwrap();
        assert_eq!(period.kind, PeriodKind::ThisWeek);
        assert_eq!(period.start, today);
        assert_eq!(period.end, Some(date(2025, 2, 16)));
    }

    #[test]
    fn test_next_week_is_monday_to_sunday() {
        let today = date(2025, 2, 12); // Wednesday
        let period = resolve("next week", today).unwrap();
        assert_eq!(period.start, date(2025, 2, 17));
        assert_eq!(period.end, Some(date(2025, 2, 23)));
    }

    #[test]
    fn test_numeric_range_with_month() {
        let today = date(2025, 2, 10);
        let period = resolve("events from 15 feb to 23 feb", today).unwrap();
        assert_eq!(period.kind, PeriodKind::Range);
        assert_eq!(period.start, date(2025, 2, 15));
        assert_eq!(period.end, Some(date(2025, 2, 23)));
    }

    #[test]
    fn test_range_wraps_into_next_month() {
        let today = date(2025, 2, 10);
        let period = resolve("events from 25 to 5", today).unwrap();
        assert_eq!(period.start, date(2025, 2, 25));
        assert_eq!(period.end, Some(date(2025, 3, 5)));
    }

    #[test]
    fn test_range_from_today_to_day() {
        let today = date(2025, 2, 20);
        let period = resolve("from today to 5", today).unwrap();
        // 5 is before the 20th, so it lands in March.
        assert_eq!(period.start, today);
        assert_eq!(period.end, Some(date(2025, 3, 5)));
    }

    #[test]
    fn test_between_range() {
        let today = date(2025, 2, 10);
        let period = resolve("between 12 and 14 feb", today).unwrap();
        assert_eq!(period.start, date(2025, 2, 12));
        assert_eq!(period.end, Some(date(2025, 2, 14)));
    }

    #[test]
    fn test_date_with_month_and_ordinal() {
        let today = date(2025, 2, 10);
        let period = resolve("events on 23rd feb", today).unwrap();
        assert_eq!(period.kind, PeriodKind::Date);
        assert_eq!(period.start, date(2025, 2, 23));
        assert_eq!(period.end, None);
    }

    #[test]
    fn test_weekday_alone_uses_wide_window() {
        let today = date(2025, 2, 10);
        let period = resolve("events on friday", today).unwrap();
        assert_eq!(period.kind, PeriodKind::Date);
        assert_eq!(period.start, today);
        assert_eq!(period.end, Some(date(2025, 3, 12)));
    }

    #[test]
    fn test_all_keyword() {
        let today = date(2025, 2, 10);
        let period = resolve("show all my events", today).unwrap();
        assert_eq!(period.kind, PeriodKind::All);
        assert_eq!(period.end, Some(today + Duration::days(30)));
    }

    #[test]
    fn test_no_period() {
        assert!(resolve("list my meetings", date(2025, 2, 10)).is_none());
        assert!(!has_time_period("list my meetings"));
        assert!(has_time_period("list my meetings today"));
    }

    #[test]
    fn test_invalid_day_falls_back_to_wide_window() {
        let today = date(2025, 2, 10);
        let period = resolve("events on 31 feb", today).unwrap();
        assert_eq!(period.start, today);
        assert_eq!(period.end, Some(today + Duration::days(30)));
    }
}
