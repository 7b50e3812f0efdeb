//! Meal-time avoidance.
//!
//! Detects "avoid lunch" phrasing, decides whether a proposed start falls
//! inside a meal window, and shifts it past the window when it does. The
//! clarification options ("Before Lunch (11:30 AM)") carry fixed clocks per
//! meal and side.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, Timelike};
use regex::Regex;

use crate::meeting::Meal;
use crate::resolve::clock_on;

static MEAL_AVOID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bavoid\s+(?:the\s+)?(?:breakfast|lunch|dinner|brunch|snack)\s*(?:time)?\b",
        r"\b(?:no|not|skip)\s+(?:the\s+)?(?:breakfast|lunch|dinner|brunch|snack)\b",
        r"\b(?:during|at)\s+(?:noon|lunchtime|dinnertime|breakfast\s*time)\b",
        r"\boutside\s+(?:of\s+)?(?:breakfast|lunch|dinner)\s*(?:time)?\b",
        r"\b(?:before|after)\s+(?:breakfast|lunch|dinner)\b",
        r"\b(?:not|never)\s+(?:at\s+)?(?:breakfast|lunch|dinner)\b",
        r"\bavoid\s+meal\s*(?:time)?\b",
        r"\bschedule\s+(?:around|outside)\s+(?:the\s+)?meals?\b",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
    .collect()
});

/// Word-bounded meal mentions, so "brunch" does not also read as "lunch".
static MEAL_WORDS: LazyLock<Vec<(Regex, Meal)>> = LazyLock::new(|| {
    [
        (r"\bbreakfast\b", Meal::Breakfast),
        (r"\blunch\b", Meal::Lunch),
        (r"\bdinner\b", Meal::Dinner),
        (r"\bbrunch\b", Meal::Brunch),
        (r"\bsnack\b", Meal::Snack),
    ]
    .into_iter()
    .map(|(pattern, meal)| (Regex::new(pattern).expect("Invalid regex"), meal))
    .collect()
});

/// Which meals the sentence asks to avoid; empty when none.
///
/// A bare "avoid meals" expands to the three main meals.
pub fn detect_avoidance(text: &str) -> Vec<Meal> {
    let lowered = text.to_lowercase();
    if !MEAL_AVOID_PATTERNS.iter().any(|p| p.is_match(&lowered)) {
        return Vec::new();
    }
    let mut meals: Vec<Meal> = MEAL_WORDS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(&lowered))
        .map(|(_, meal)| *meal)
        .collect();
    if meals.is_empty() && lowered.contains("meal") {
        meals = vec![Meal::Breakfast, Meal::Lunch, Meal::Dinner];
    }
    meals
}

/// First meal named in `text`; used to read clarification answers like
/// "Before Lunch (11:30 AM)".
pub fn find_meal(text: &str) -> Option<Meal> {
    let lowered = text.to_lowercase();
    MEAL_WORDS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&lowered))
        .map(|(_, meal)| *meal)
}

/// Window bounds as minutes since midnight, end exclusive.
pub fn window_minutes(meal: Meal) -> (i64, i64) {
    match meal {
        Meal::Breakfast => (7 * 60, 9 * 60),
        Meal::Lunch => (12 * 60, 14 * 60),
        Meal::Dinner => (19 * 60, 21 * 60),
        Meal::Brunch => (10 * 60, 14 * 60),
        Meal::Snack => (15 * 60, 16 * 60),
    }
}

pub fn in_window(instant: DateTime<FixedOffset>, meal: Meal) -> bool {
    let (start, end) = window_minutes(meal);
    let current = i64::from(instant.hour()) * 60 + i64::from(instant.minute());
    start <= current && current < end
}

/// Shift a start out of any avoided meal window it falls in, to 15 minutes
/// past the window's end. The date is preserved.
pub fn adjust(start: DateTime<FixedOffset>, meals: &[Meal]) -> DateTime<FixedOffset> {
    let mut adjusted = start;
    for &meal in meals {
        if in_window(adjusted, meal) {
            let (_, end) = window_minutes(meal);
            let buffered = end + 15;
            adjusted = clock_on(
                adjusted.date_naive(),
                *adjusted.offset(),
                buffered / 60,
                buffered % 60,
            );
        }
    }
    adjusted
}

/// The clock behind a "Before X" / "After X" clarification option.
pub fn option_clock(meal: Meal, before: bool) -> (i64, i64) {
    if before {
        match meal {
            Meal::Breakfast => (7, 0),
            Meal::Lunch => (11, 30),
            Meal::Dinner => (18, 30),
            Meal::Brunch => (9, 30),
            Meal::Snack => (14, 30),
        }
    } else {
        match meal {
            Meal::Breakfast => (9, 0),
            Meal::Lunch => (14, 0),
            Meal::Dinner => (21, 0),
            Meal::Brunch => (14, 0),
            Meal::Snack => (16, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2025, 2, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_detect_single_meal() {
        assert_eq!(detect_avoidance("schedule it but avoid lunch time"), vec![Meal::Lunch]);
        assert_eq!(detect_avoidance("not at dinner please"), vec![Meal::Dinner]);
    }

    #[test]
    fn test_brunch_is_not_lunch() {
        assert_eq!(detect_avoidance("meeting tomorrow, skip brunch"), vec![Meal::Brunch]);
    }

    #[test]
    fn test_bare_meals_expands() {
        assert_eq!(
            detect_avoidance("schedule around meals"),
            vec![Meal::Breakfast, Meal::Lunch, Meal::Dinner]
        );
    }

    #[test]
    fn test_no_avoidance() {
        assert!(detect_avoidance("meeting with John at 3pm").is_empty());
        // A meal word alone is not an avoidance request
        assert!(detect_avoidance("lunch with John tomorrow").is_empty());
    }

    #[test]
    fn test_window_membership() {
        assert!(in_window(at(12, 0), Meal::Lunch));
        assert!(in_window(at(13, 59), Meal::Lunch));
        assert!(!in_window(at(14, 0), Meal::Lunch));
        assert!(!in_window(at(11, 59), Meal::Lunch));
    }

    #[test]
    fn test_adjust_moves_past_window() {
        let adjusted = adjust(at(13, 0), &[Meal::Lunch]);
        assert_eq!((adjusted.hour(), adjusted.minute()), (14, 15));
        assert_eq!(adjusted.date_naive(), at(13, 0).date_naive());
    }

    #[test]
    fn test_adjust_outside_window_is_noop() {
        let start = at(10, 0);
        assert_eq!(adjust(start, &[Meal::Lunch]), start);
    }

    #[test]
    fn test_adjust_checks_meals_in_order() {
        // 8:30 is in the breakfast window; the shifted 9:15 is outside lunch
        let adjusted = adjust(at(8, 30), &[Meal::Breakfast, Meal::Lunch]);
        assert_eq!((adjusted.hour(), adjusted.minute()), (9, 15));
    }

    #[test]
    fn test_option_clocks() {
        assert_eq!(option_clock(Meal::Lunch, true), (11, 30));
        assert_eq!(option_clock(Meal::Lunch, false), (14, 0));
        assert_eq!(option_clock(Meal::Dinner, true), (18, 30));
    }
}
