//! Date extraction from natural language.
//!
//! Ten producers run in a strict order, from the most explicit form (ISO
//! dates) down to a loose month-name fallback. The first producer that
//! yields a calendar date wins; later producers never see the text.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;

use crate::meeting::Provenance;

// ============================================================================
// Types
// ============================================================================

/// Result of running the date producers over one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct DateOutcome {
    pub date: Option<NaiveDate>,
    /// The named date is strictly before the base date.
    pub is_past: bool,
    pub provenance: Provenance,
}

impl DateOutcome {
    fn explicit(date: NaiveDate, is_past: bool) -> Self {
        Self {
            date: Some(date),
            is_past,
            provenance: Provenance::Explicit,
        }
    }

    fn relative(date: NaiveDate, is_past: bool) -> Self {
        Self {
            date: Some(date),
            is_past,
            provenance: Provenance::Relative,
        }
    }

    fn none() -> Self {
        Self {
            date: None,
            is_past: false,
            provenance: Provenance::Default,
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

const MONTH_ALTERNATION: &str = "january|february|march|april|september|october|november|december|june|july|august|jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

static MONTH_NUMBERS: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    [
        ("jan", 1),
        ("january", 1),
        ("feb", 2),
        ("february", 2),
        ("mar", 3),
        ("march", 3),
        ("apr", 4),
        ("april", 4),
        ("may", 5),
        ("jun", 6),
        ("june", 6),
        ("jul", 7),
        ("july", 7),
        ("aug", 8),
        ("august", 8),
        ("sep", 9),
        ("september", 9),
        ("oct", 10),
        ("october", 10),
        ("nov", 11),
        ("november", 11),
        ("dec", 12),
        ("december", 12),
    ]
    .into_iter()
    .collect()
});

static ISO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})\b").expect("Invalid regex")
});

static NUMERIC_Y4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{4})\b").expect("Invalid regex")
});

static NUMERIC_Y2_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[-/.](\d{1,2})[-/.](\d{2})\b").expect("Invalid regex")
});

static DAYS_AFTER_DAY_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(\d+)\s*days?\s*(?:after|from)\s+(\d{{1,2}})(?:st|nd|rd|th)?\s*(?:of\s+)?({MONTH_ALTERNATION})"
    ))
    .expect("Invalid regex")
});

static DAYS_AFTER_MONTH_DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(\d+)\s*days?\s*(?:after|from)\s+({MONTH_ALTERNATION})\s+(\d{{1,2}})(?:st|nd|rd|th)?"
    ))
    .expect("Invalid regex")
});

static DAY_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTH_ALTERNATION})"
    ))
    .expect("Invalid regex")
});

static MONTH_DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b({MONTH_ALTERNATION})\s+(\d{{1,2}})(?:st|nd|rd|th)?"
    ))
    .expect("Invalid regex")
});

static TRAILING_YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*,?\s*(\d{4})").expect("Invalid regex"));

static CHAINED_RELATIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+)\s*days?\s+(?:after|from)\s+(today|tomorro|tomorrow|tmr|tmrw|day\s+after\s+(?:tomorro|tomorrow|tmr|tmrw))\b",
    )
    .expect("Invalid regex")
});

static IN_AFTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:in|after)\s+(\d+)\s*(days?|weeks?)\b").expect("Invalid regex"));

static FROM_NOW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(days?|weeks?)\s+from\s+now\b").expect("Invalid regex"));

static OVER_NEXT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:in|over)\s+the\s+next\s+(\d+)\s*(days?|weeks?)\b").expect("Invalid regex")
});

static LATER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(days?|weeks?)\s+later\b").expect("Invalid regex"));

static STARTING_IN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:starting|beginning)\s+in\s+(\d+)\s*(days?|weeks?)\b").expect("Invalid regex")
});

static DAY_AFTER_TOMORROW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bday\s*(?:after|afte|afta)\s*(tomorro|tomorrow|tmr|tmrw)\b").expect("Invalid regex")
});

static TOMORROW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(tomorro|tomorrow|tmr|tmrw)\b").expect("Invalid regex"));

static TODAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btoday\b").expect("Invalid regex"));

static YESTERDAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\byesterday\b").expect("Invalid regex"));

static NEXT_WEEK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnext\s+week\b").expect("Invalid regex"));

static THIS_MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bthis\s+month\b").expect("Invalid regex"));

static NEXT_MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnext\s+month\b").expect("Invalid regex"));

static BARE_DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\b(?:\s+(?:of\s+)?(?:next|this))?")
        .expect("Invalid regex")
});

static NEXT_WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([a-zA-Z]+)").expect("Invalid regex"));

static TIME_RANGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"from\s+\d+\s+to\s+\d",
        r"\d+\s*[-–]\s*\d+\s*(?:am|pm)",
        r"between\s+\d+\s+(?:and|to|-|–)\s+\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

static AM_PM_SUFFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:am|pm)\b").expect("Invalid regex"));

static COLON_SUFFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:\d+").expect("Invalid regex"));

static MONTH_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({MONTH_ALTERNATION})\b")).expect("Invalid regex")
});

/// Weekday patterns in map order; the first weekday present wins, in this
/// order, not in sentence order.
static WEEKDAY_PATTERNS: LazyLock<Vec<(Regex, u32)>> = LazyLock::new(|| {
    [
        ("monday", 0),
        ("tuesday", 1),
        ("wednesday", 2),
        ("thursday", 3),
        ("friday", 4),
        ("saturday", 5),
        ("sunday", 6),
    ]
    .into_iter()
    .map(|(name, index)| {
        (
            Regex::new(&format!(r"\b{name}\b")).expect("Invalid regex"),
            index,
        )
    })
    .collect()
});

// ============================================================================
// Date Resolver
// ============================================================================

/// Extracts the date a sentence names, relative to a base date.
pub struct DateResolver;

impl Default for DateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DateResolver {
    pub fn new() -> Self {
        Self
    }

    /// Run the producers in order and return the first hit.
    pub fn resolve(&self, text: &str, today: NaiveDate) -> DateOutcome {
        let text = text.to_lowercase();

        // ---------- 1. ISO / formal ----------
        if let Some(caps) = ISO_PATTERN.captures(&text) {
            if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
                return DateOutcome::explicit(date, date < today);
            }
        }

        // ---------- 2. Numeric dates ----------
        for pattern in [&*NUMERIC_Y4_PATTERN, &*NUMERIC_Y2_PATTERN] {
            if let Some(caps) = pattern.captures(&text) {
                let a: u32 = caps[1].parse().unwrap_or(0);
                let b: u32 = caps[2].parse().unwrap_or(0);
                let mut year: i32 = caps[3].parse().unwrap_or(0);
                if caps[3].len() == 2 {
                    year += 2000;
                }
                // Day-first, then month-first; the first valid reading wins.
                for (day, month) in [(a, b), (b, a)] {
                    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                        return DateOutcome::explicit(date, date < today);
                    }
                }
            }
        }

        // ---------- 3. N days after an explicit date ----------
        for (pattern, day_group, month_group) in [
            (&*DAYS_AFTER_DAY_MONTH_PATTERN, 2, 3),
            (&*DAYS_AFTER_MONTH_DAY_PATTERN, 3, 2),
        ] {
            if let Some(caps) = pattern.captures(&text) {
                let num_days: i64 = caps[1].parse().unwrap_or(0);
                let day: u32 = caps[day_group].parse().unwrap_or(0);
                if let Some(&month) = MONTH_NUMBERS.get(&caps[month_group]) {
                    let mut year = today.year();
                    if let Some(anchor) = NaiveDate::from_ymd_opt(year, month, day) {
                        if anchor < today {
                            year += 1;
                        }
                        if let Some(anchor) = NaiveDate::from_ymd_opt(year, month, day) {
                            return DateOutcome::explicit(
                                anchor + Duration::days(num_days),
                                false,
                            );
                        }
                    }
                }
            }
        }

        // ---------- 4. Day + month (+ year) ----------
        if let Some(caps) = DAY_MONTH_PATTERN.captures(&text) {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            if let Some(outcome) = self.literal_date(&caps[2], &caps[1], &text[end..], today) {
                return outcome;
            }
        }

        // ---------- 5. Month + day (+ year) ----------
        if let Some(caps) = MONTH_DAY_PATTERN.captures(&text) {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            if let Some(outcome) = self.literal_date(&caps[1], &caps[2], &text[end..], today) {
                return outcome;
            }
        }

        // ---------- 6. Chained relatives ----------
        if let Some(caps) = CHAINED_RELATIVE_PATTERN.captures(&text) {
            let num_days: i64 = caps[1].parse().unwrap_or(0);
            let anchor = &caps[2];
            let offset = if anchor == "today" {
                0
            } else if matches!(anchor, "tomorrow" | "tomorro" | "tmr" | "tmrw") {
                1
            } else {
                2
            };
            return DateOutcome::relative(today + Duration::days(offset + num_days), false);
        }

        // ---------- 7. Simple relatives ----------
        for pattern in [
            &*IN_AFTER_PATTERN,
            &*FROM_NOW_PATTERN,
            &*OVER_NEXT_PATTERN,
            &*LATER_PATTERN,
            &*STARTING_IN_PATTERN,
        ] {
            if let Some(caps) = pattern.captures(&text) {
                let num: i64 = caps[1].parse().unwrap_or(0);
                let days = if caps[2].starts_with("week") { num * 7 } else { num };
                return DateOutcome::relative(today + Duration::days(days), false);
            }
        }

        // ---------- 8. Named days and weekdays ----------
        if DAY_AFTER_TOMORROW_PATTERN.is_match(&text) {
            return DateOutcome::relative(today + Duration::days(2), false);
        }
        if TOMORROW_PATTERN.is_match(&text) {
            return DateOutcome::relative(today + Duration::days(1), false);
        }
        if TODAY_PATTERN.is_match(&text) {
            return DateOutcome::relative(today, false);
        }
        if YESTERDAY_PATTERN.is_match(&text) {
            return DateOutcome::relative(today - Duration::days(1), true);
        }

        let next_week = NEXT_WEEK_PATTERN.is_match(&text);
        let today_weekday = today.weekday().num_days_from_monday();
        for (pattern, index) in WEEKDAY_PATTERNS.iter() {
            if pattern.is_match(&text) {
                let mut days = i64::from((*index + 7 - today_weekday) % 7);
                if next_week {
                    // "next week friday" is a week past this week's friday.
                    days += 7;
                } else if days == 0 {
                    days = 7;
                }
                return DateOutcome::relative(today + Duration::days(days), false);
            }
        }

        // ---------- 9. Month-level ----------
        if THIS_MONTH_PATTERN.is_match(&text) {
            if let Some(date) = today.with_day(1) {
                return DateOutcome::relative(date, false);
            }
        }
        if NEXT_MONTH_PATTERN.is_match(&text) {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
                return DateOutcome::relative(date, false);
            }
        }

        // ---------- 10. Bare ordinal day ----------
        if let Some(outcome) = self.bare_day(&text, today) {
            return outcome;
        }

        // ---------- Fallback: lone month name ----------
        if let Some(caps) = MONTH_NAME_PATTERN.captures(&text) {
            if let Some(&month) = MONTH_NUMBERS.get(&caps[1]) {
                if let Some(date) = NaiveDate::from_ymd_opt(today.year(), month, today.day()) {
                    if date != today {
                        return DateOutcome::relative(date, date < today);
                    }
                }
            }
        }

        DateOutcome::none()
    }

    /// Producers 4 and 5: a literal day-of-month with a named month, with an
    /// optional trailing year. A past date without an explicit year bumps to
    /// next year.
    fn literal_date(
        &self,
        month_name: &str,
        day_text: &str,
        after: &str,
        today: NaiveDate,
    ) -> Option<DateOutcome> {
        let day: u32 = day_text.parse().ok()?;
        let month = *MONTH_NUMBERS.get(month_name)?;

        let year_match = TRAILING_YEAR_PATTERN.captures(after);
        let year = match &year_match {
            Some(caps) => caps[1].parse().ok()?,
            None => today.year(),
        };

        let mut date = NaiveDate::from_ymd_opt(year, month, day)?;
        if date < today && year_match.is_none() {
            date = NaiveDate::from_ymd_opt(today.year() + 1, month, day)?;
        }
        Some(DateOutcome::explicit(date, date < today))
    }

    /// Producer 10: a bare day number, skipped when it is really part of a
    /// date with a month or a clock time.
    fn bare_day(&self, text: &str, today: NaiveDate) -> Option<DateOutcome> {
        let has_time_range = TIME_RANGE_PATTERNS.iter().any(|p| p.is_match(text));

        for caps in BARE_DAY_PATTERN.captures_iter(text) {
            let day: u32 = match caps[1].parse() {
                Ok(day) => day,
                Err(_) => continue,
            };
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            let after = &text[end..];

            // "23 feb" belongs to the day+month producer.
            if let Some(word) = NEXT_WORD_PATTERN.captures(after) {
                if MONTH_NUMBERS.contains_key(&word[1]) {
                    continue;
                }
            }

            // Part of a clock time or a time range, not a date.
            if has_time_range
                || AM_PM_SUFFIX_PATTERN.is_match(after)
                || COLON_SUFFIX_PATTERN.is_match(after)
            {
                continue;
            }

            if !(1..=31).contains(&day) {
                continue;
            }

            match day.cmp(&today.day()) {
                std::cmp::Ordering::Less => {
                    // Earlier than today's day-of-month: next month.
                    let (year, month) = if today.month() == 12 {
                        (today.year() + 1, 1)
                    } else {
                        (today.year(), today.month() + 1)
                    };
                    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                        return Some(DateOutcome::relative(date, false));
                    }
                }
                std::cmp::Ordering::Greater => {
                    if let Some(date) = NaiveDate::from_ymd_opt(today.year(), today.month(), day) {
                        return Some(DateOutcome::relative(date, false));
                    }
                }
                std::cmp::Ordering::Equal => {}
            }
        }

        None
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
