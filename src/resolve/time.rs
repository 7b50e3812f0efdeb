//! Clock-time resolution against a base date.
//!
//! Date expressions are stripped from the sentence first so day numbers
//! ("23rd feb") are never read as hours. The stages then run from the most
//! explicit form down: a time range, a single am/pm time, a bare number
//! (which raises a question instead of a guess), named times of day, and
//! finally the configured default hour.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::meeting::{AmbiguityFlag, Provenance};

// ============================================================================
// Types
// ============================================================================

/// A clock reading captured before its AM/PM half is known.
///
/// Held by the clarification session so a one-word answer can rebuild the
/// exact instant without re-parsing the request text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingClock {
    Single {
        hour: u32,
        minute: u32,
    },
    Range {
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    },
}

/// Result of resolving the clock-time expressions in one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeOutcome {
    pub start: Option<DateTime<FixedOffset>>,
    /// Set only by an explicit range; a range end survives any duration
    /// phrase elsewhere in the sentence.
    pub end: Option<DateTime<FixedOffset>>,
    pub flag: Option<AmbiguityFlag>,
    pub provenance: Provenance,
    /// Clock digits held back for the clarification answer.
    pub pending: Option<PendingClock>,
}

impl TimeOutcome {
    fn range(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            flag: None,
            provenance: Provenance::Explicit,
            pending: None,
        }
    }

    fn single(start: DateTime<FixedOffset>, provenance: Provenance) -> Self {
        Self {
            start: Some(start),
            end: None,
            flag: None,
            provenance,
            pending: None,
        }
    }

    fn ambiguous(flag: AmbiguityFlag, pending: PendingClock) -> Self {
        Self {
            start: None,
            end: None,
            flag: Some(flag),
            provenance: Provenance::Explicit,
            pending: Some(pending),
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

const MONTH_ALTERNATION: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|january|february|march|april|june|july|august|september|october|november|december";

const WEEKDAY_ALTERNATION: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

/// Date phrases removed before any time matching. Compound relatives strip
/// first so the bare day words they end with survive long enough to match
/// as part of the phrase; the final two catch numeric dates so "03-05" is
/// never read as a clock range.
static DATE_STRIP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bafter\s+\d+\s*days?\s*from\s+(?:today|tomorrow|tmrw?|day\s*after\s*(?:tomorrow|tmrw?))\b"
            .to_string(),
        format!(
            r"\b\d+\s*days?\s*after\s+\d{{1,2}}(?:st|nd|rd|th)?\s*(?:of\s+)?(?:{MONTH_ALTERNATION})\b"
        ),
        r"\b\d+\s*days?\s*after\s*(?:today|tomorrow)\b".to_string(),
        r"\bday\s*after\s*(?:tomorrow|tmrw?)\b".to_string(),
        r"\btoday\b".to_string(),
        r"\btomorrow\b".to_string(),
        r"\btmrw?\b".to_string(),
        r"\bthis\s*month\b".to_string(),
        r"\bnext\s*month\b".to_string(),
        format!(r"\b(?:next|coming)\s+(?:{WEEKDAY_ALTERNATION})\b"),
        format!(r"\b(?:{WEEKDAY_ALTERNATION})\s*next\s*month\b"),
        format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?(?:{MONTH_ALTERNATION})\b"),
        format!(r"\b(?:{MONTH_ALTERNATION})\s+\d{{1,2}}(?:st|nd|rd|th)?\b"),
        r"\b\d+\s*days?\s+from\s+now\b".to_string(),
        r"\b\d+\s*weeks?\s+from\s+now\b".to_string(),
        r"\b(?:in|over)\s+the\s+next\s+\d+\s*days?\b".to_string(),
        r"\b(?:in|over)\s+the\s+next\s+\d+\s*weeks?\b".to_string(),
        r"\b\d+\s*days?\s+later\b".to_string(),
        r"\b\d+\s*weeks?\s+later\b".to_string(),
        r"\b(?:starting|beginning)\s+in\s+\d+\s*days?\b".to_string(),
        r"\b(?:starting|beginning)\s+in\s+\d+\s*weeks?\b".to_string(),
        r"\b\d{4}[-/.]\d{1,2}[-/.]\d{1,2}\b".to_string(),
        r"\b\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}\b".to_string(),
    ]
    .into_iter()
    .map(|pattern| Regex::new(&pattern).expect("Invalid regex"))
    .collect()
});

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:between\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*(?:to|-|and)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b",
    )
    .expect("Invalid regex")
});

static BETWEEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbetween\b").expect("Invalid regex"));

static SINGLE_TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("Invalid regex"));

/// A bare number is only a clock candidate directly after one of these
/// context words; "for 30 minutes" or "room 12" never ask.
static BARE_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:at|by|from|meeting|schedule|call|dinner|lunch|breakfast)\s+(\d{1,2})(?::(\d{2}))?\b")
        .expect("Invalid regex")
});

static ORDINAL_DAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}(?:st|nd|rd|th)\b").expect("Invalid regex"));

static DAY_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b\d{{1,2}}\s+(?:{MONTH_ALTERNATION})\b")).expect("Invalid regex")
});

/// "today"/"yesterday" pins the day, so an elapsed clock time must not be
/// bumped to the next occurrence.
static PAST_ANCHOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:yesterday|today)\b").expect("Invalid regex"));

static NOW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnow\b").expect("Invalid regex"));

/// Named times of day. Compound names come first so "early morning" is not
/// swallowed by "morning".
static NAMED_TIMES: LazyLock<Vec<(Regex, u32)>> = LazyLock::new(|| {
    [
        (r"\bearly\s+morning\b", 6),
        (r"\blate\s+night\b", 22),
        (r"\btonight\b", 18),
        (r"\bmorning\b", 9),
        (r"\bafternoon\b", 14),
        (r"\bevening\b", 18),
        (r"\bnight\b", 20),
        (r"\b(?:at\s+)?noon\b", 12),
        (r"\b(?:at\s+)?midnight\b", 0),
        (r"\b(?:at\s+)?lunch(?:\s*time)?\b", 13),
        (r"\b(?:at\s+)?breakfast(?:\s*time)?\b", 8),
        (r"\b(?:at\s+)?dinner(?:\s*time)?\b", 19),
        (r"\b(?:at\s+)?brunch\b", 11),
        (r"\b(?:eod|cob|eob)\b", 17),
    ]
    .into_iter()
    .map(|(pattern, hour)| (Regex::new(pattern).expect("Invalid regex"), hour))
    .collect()
});

// ============================================================================
// Resolver
// ============================================================================

/// Resolves clock times against a base date.
///
/// Pure over its inputs: `now` is injected so the roll-forward rules can be
/// pinned in tests.
#[derive(Debug, Clone)]
pub struct TimeResolver {
    default_start_hour: u32,
}

impl Default for TimeResolver {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl TimeResolver {
    pub fn new(parser: &ParserConfig) -> Self {
        Self {
            default_start_hour: parser.default_start_hour,
        }
    }

    /// Resolve the time expressions in `text` onto `base_date`.
    ///
    /// A start that is not strictly after `now` moves one day forward,
    /// unless the sentence pinned the day with "today"/"yesterday". Ranges
    /// roll on their end instant instead, unconditionally.
    pub fn resolve(
        &self,
        text: &str,
        base_date: NaiveDate,
        now: DateTime<FixedOffset>,
    ) -> TimeOutcome {
        let lowered = text.to_lowercase();
        let stripped = strip_date_phrases(&lowered);
        let offset = *now.offset();
        let anchored = PAST_ANCHOR_PATTERN.is_match(&lowered);

        // ---------- Explicit range ----------
        if let Some(caps) = RANGE_PATTERN.captures(&stripped) {
            let start_hour: u32 = caps[1].parse().unwrap_or(0);
            let start_minute: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            let end_hour: u32 = caps[4].parse().unwrap_or(0);
            let end_minute: u32 = caps.get(5).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            let start_half = caps.get(3).map(|m| m.as_str());
            let end_half = caps.get(6).map(|m| m.as_str());

            // "between" with a bare side is a question, never a guess.
            if BETWEEN_PATTERN.is_match(&lowered) && (start_half.is_none() || end_half.is_none()) {
                return TimeOutcome::ambiguous(
                    AmbiguityFlag::TimeRangeAmbiguous {
                        start_hour,
                        end_hour,
                    },
                    PendingClock::Range {
                        start_hour,
                        start_minute,
                        end_hour,
                        end_minute,
                    },
                );
            }

            // A bare side inherits the other side's half of day; two bare
            // sides take the current one.
            let current = half_of_day(now);
            let start_h24 = apply_meridiem(start_hour, start_half.or(end_half).unwrap_or(current));
            let mut end_h24 = apply_meridiem(end_hour, end_half.or(start_half).unwrap_or(current));
            // "11 to 1" crosses noon
            if end_h24 <= start_h24 {
                end_h24 += 12;
            }

            let mut start = clock_on(
                base_date,
                offset,
                i64::from(start_h24),
                i64::from(start_minute),
            );
            let mut end = clock_on(base_date, offset, i64::from(end_h24), i64::from(end_minute));
            if end <= now {
                start += Duration::days(1);
                end += Duration::days(1);
            }
            return TimeOutcome::range(start, end);
        }

        // ---------- Single time with meridiem ----------
        if let Some(caps) = SINGLE_TIME_PATTERN.captures(&stripped) {
            let hour: u32 = caps[1].parse().unwrap_or(0);
            let minute: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            let hour_24 = apply_meridiem(hour, &caps[3]);

            let mut start = clock_on(base_date, offset, i64::from(hour_24), i64::from(minute));
            if start <= now && !anchored {
                start += Duration::days(1);
            }
            return TimeOutcome::single(start, Provenance::Explicit);
        }

        // ---------- Bare clock digits ----------
        // No meridiem time matched above, so a remaining small number is a
        // candidate hour. Ordinal days and day-month pairs are dates.
        let looks_like_date =
            ORDINAL_DAY_PATTERN.is_match(&stripped) || DAY_MONTH_PATTERN.is_match(&stripped);
        if !looks_like_date {
            if let Some(caps) = BARE_TIME_PATTERN.captures(&stripped) {
                let hour: u32 = caps[1].parse().unwrap_or(0);
                let minute: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
                return TimeOutcome::ambiguous(
                    AmbiguityFlag::AmPmAmbiguous { hour },
                    PendingClock::Single { hour, minute },
                );
            }
        }

        // ---------- Named times of day ----------
        for (pattern, hour) in NAMED_TIMES.iter() {
            if pattern.is_match(&stripped) {
                let mut start = clock_on(base_date, offset, i64::from(*hour), 0);
                if start <= now && !anchored {
                    start += Duration::days(1);
                }
                return TimeOutcome::single(start, Provenance::Relative);
            }
        }

        // ---------- "now" ----------
        // Anchored to the current instant, so never rolled forward.
        if NOW_PATTERN.is_match(&stripped) {
            let start = clock_on(
                base_date,
                offset,
                i64::from(now.hour()),
                i64::from(now.minute()),
            );
            return TimeOutcome::single(start, Provenance::Relative);
        }

        // ---------- Default hour ----------
        let mut start = clock_on(base_date, offset, i64::from(self.default_start_hour), 0);
        if start <= now && !anchored {
            start += Duration::days(1);
        }
        TimeOutcome::single(start, Provenance::Default)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn strip_date_phrases(text: &str) -> String {
    let mut out = text.to_string();
    for pattern in DATE_STRIP_PATTERNS.iter() {
        out = pattern.replace_all(&out, "").into_owned();
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn half_of_day(now: DateTime<FixedOffset>) -> &'static str {
    if now.hour() >= 12 {
        "pm"
    } else {
        "am"
    }
}

/// Whether the sentence pins the day with "today"/"yesterday", which
/// exempts an elapsed time from the roll-forward rule.
pub fn has_past_anchor(text: &str) -> bool {
    PAST_ANCHOR_PATTERN.is_match(&text.to_lowercase())
}

/// 12-hour to 24-hour conversion; hours already past noon pass through.
pub fn apply_meridiem(hour: u32, meridiem: &str) -> u32 {
    match meridiem {
        "pm" if hour < 12 => hour + 12,
        "am" if hour == 12 => 0,
        _ => hour,
    }
}

/// An instant on `date` built from hour/minute counts. Counts past the end
/// of the day roll into the following day instead of failing.
pub fn clock_on(
    date: NaiveDate,
    offset: FixedOffset,
    hours: i64,
    minutes: i64,
) -> DateTime<FixedOffset> {
    let naive = date.and_time(NaiveTime::MIN) + Duration::hours(hours) + Duration::minutes(minutes);
    DateTime::from_naive_utc_and_offset(naive - offset, offset)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    /// Monday 2025-02-10, 10:00 local.
    fn now() -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2025, 2, 10, 10, 0, 0).unwrap()
    }

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn resolver() -> TimeResolver {
        TimeResolver::default()
    }

    #[test]
    fn test_explicit_pm_time() {
        let outcome = resolver().resolve("meeting at 6pm", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 18, 0)));
        assert_eq!(outcome.end, None);
        assert_eq!(outcome.flag, None);
        assert_eq!(outcome.provenance, Provenance::Explicit);
    }

    #[test]
    fn test_explicit_time_with_minutes() {
        let outcome = resolver().resolve("call at 4:45 PM", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 16, 45)));
    }

    #[test]
    fn test_elapsed_time_rolls_forward() {
        let outcome = resolver().resolve("call at 8am", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 11, 8, 0)));
    }

    #[test]
    fn test_today_keeps_elapsed_time() {
        let outcome = resolver().resolve("today at 8am", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 8, 0)));
    }

    #[test]
    fn test_noon_hours_pass_through() {
        let outcome = resolver().resolve("lunch at 12pm", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 12, 0)));
    }

    #[test]
    fn test_range_inherits_meridiem() {
        let outcome = resolver().resolve("from 5 to 7pm", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 17, 0)));
        assert_eq!(outcome.end, Some(local(2025, 2, 10, 19, 0)));
        assert_eq!(outcome.flag, None);
    }

    #[test]
    fn test_bare_range_crosses_noon() {
        // Both sides bare at 10:00 -> current half is AM; 1 <= 11 pushes
        // the end past noon.
        let outcome = resolver().resolve("meet 11 to 1", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 11, 0)));
        assert_eq!(outcome.end, Some(local(2025, 2, 10, 13, 0)));
    }

    #[test]
    fn test_range_with_minutes_on_both_sides() {
        let outcome = resolver().resolve("between 2:15 pm and 3:45 pm", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 14, 15)));
        assert_eq!(outcome.end, Some(local(2025, 2, 10, 15, 45)));
        assert_eq!(outcome.flag, None);
    }

    #[test]
    fn test_elapsed_range_rolls_forward() {
        let outcome = resolver().resolve("from 7 to 8am", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 11, 7, 0)));
        assert_eq!(outcome.end, Some(local(2025, 2, 11, 8, 0)));
    }

    #[test]
    fn test_between_without_meridiem_asks() {
        let outcome = resolver().resolve("between 3 and 5", base(), now());
        assert_eq!(
            outcome.flag,
            Some(AmbiguityFlag::TimeRangeAmbiguous {
                start_hour: 3,
                end_hour: 5
            })
        );
        assert_eq!(
            outcome.pending,
            Some(PendingClock::Range {
                start_hour: 3,
                start_minute: 0,
                end_hour: 5,
                end_minute: 0
            })
        );
        assert_eq!(outcome.start, None);
    }

    #[test]
    fn test_between_with_one_bare_side_asks() {
        let outcome = resolver().resolve("between 2 and 4pm", base(), now());
        assert!(matches!(
            outcome.flag,
            Some(AmbiguityFlag::TimeRangeAmbiguous {
                start_hour: 2,
                end_hour: 4
            })
        ));
    }

    #[test]
    fn test_bare_hour_asks() {
        let outcome = resolver().resolve("meeting at 6 with finance team", base(), now());
        assert_eq!(outcome.flag, Some(AmbiguityFlag::AmPmAmbiguous { hour: 6 }));
        assert_eq!(outcome.pending, Some(PendingClock::Single { hour: 6, minute: 0 }));
        assert_eq!(outcome.start, None);
    }

    #[test]
    fn test_bare_hour_keeps_minutes_for_the_answer() {
        let outcome = resolver().resolve("at 6:30", base(), now());
        assert_eq!(outcome.flag, Some(AmbiguityFlag::AmPmAmbiguous { hour: 6 }));
        assert_eq!(
            outcome.pending,
            Some(PendingClock::Single { hour: 6, minute: 30 })
        );
    }

    #[test]
    fn test_ordinal_day_is_not_an_hour() {
        let outcome = resolver().resolve("meeting on the 23rd", base(), now());
        assert_eq!(outcome.flag, None);
        assert_eq!(outcome.provenance, Provenance::Default);
    }

    #[test]
    fn test_duration_digits_are_not_hours() {
        let outcome = resolver().resolve("meet john for 30 minutes", base(), now());
        assert_eq!(outcome.flag, None);
        assert_eq!(outcome.provenance, Provenance::Default);
    }

    #[test]
    fn test_day_month_is_stripped_before_matching() {
        let outcome = resolver().resolve("call with bob on 23rd feb", base(), now());
        assert_eq!(outcome.flag, None);
        assert_eq!(outcome.provenance, Provenance::Default);
    }

    #[test]
    fn test_iso_date_is_not_a_clock_range() {
        let outcome = resolver().resolve("review on 2025-03-05", base(), now());
        assert_eq!(outcome.flag, None);
        assert_eq!(outcome.end, None);
    }

    #[test]
    fn test_evening_anchor() {
        let outcome = resolver().resolve("catch up in the evening", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 18, 0)));
        assert_eq!(outcome.provenance, Provenance::Relative);
    }

    #[test]
    fn test_elapsed_anchor_rolls_forward() {
        // 09:00 has passed at 10:00.
        let outcome = resolver().resolve("sometime in the morning", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 11, 9, 0)));
    }

    #[test]
    fn test_early_morning_beats_morning() {
        let outcome = resolver().resolve("early morning jog", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 11, 6, 0)));
    }

    #[test]
    fn test_tonight_anchor() {
        let outcome = resolver().resolve("dinner tonight", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 18, 0)));
    }

    #[test]
    fn test_now_is_never_rolled() {
        let outcome = resolver().resolve("can we meet now", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 10, 0)));
        assert_eq!(outcome.provenance, Provenance::Relative);
    }

    #[test]
    fn test_default_hour_rolls_when_elapsed() {
        let outcome = resolver().resolve("sync with the team", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 11, 9, 0)));
        assert_eq!(outcome.provenance, Provenance::Default);
    }

    #[test]
    fn test_default_hour_respects_today() {
        let outcome = resolver().resolve("meeting with john today", base(), now());
        assert_eq!(outcome.start, Some(local(2025, 2, 10, 9, 0)));
    }

    #[test]
    fn test_relative_phrase_fully_stripped() {
        let outcome = resolver().resolve("schedule 3 days after tomorrow", base(), now());
        assert_eq!(outcome.flag, None);
        assert_eq!(outcome.provenance, Provenance::Default);
    }

    #[test]
    fn test_apply_meridiem_is_defensive() {
        assert_eq!(apply_meridiem(6, "pm"), 18);
        assert_eq!(apply_meridiem(12, "pm"), 12);
        assert_eq!(apply_meridiem(12, "am"), 0);
        // Already on the 24-hour clock.
        assert_eq!(apply_meridiem(14, "pm"), 14);
    }
}
