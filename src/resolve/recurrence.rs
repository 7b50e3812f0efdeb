//! Recurrence phrase detection.
//!
//! Keyword table mapping to calendar RRULE strings; first match wins and an
//! empty result means non-recurring.

use std::sync::LazyLock;

use regex::Regex;

/// Fixed-frequency rules, most specific first.
static RECURRENCE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(?:daily|every\s+day|each\s+day)\b", "RRULE:FREQ=DAILY"),
        (r"\b(?:weekly|every\s+week)\b", "RRULE:FREQ=WEEKLY"),
        (r"\b(?:monthly|every\s+month)\b", "RRULE:FREQ=MONTHLY"),
        (r"\b(?:yearly|every\s+year|annually)\b", "RRULE:FREQ=YEARLY"),
        (
            r"\b(?:every\s+weekday|weekdays)\b",
            "RRULE:FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR",
        ),
    ]
    .into_iter()
    .map(|(pattern, rule)| (Regex::new(pattern).expect("Invalid regex"), rule))
    .collect()
});

static EVERY_WEEKDAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bevery\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("Invalid regex")
});

/// Detect recurrence phrasing and map it to RRULE strings.
pub fn resolve(text: &str) -> Vec<String> {
    let text = text.to_lowercase();

    for (pattern, rule) in RECURRENCE_RULES.iter() {
        if pattern.is_match(&text) {
            return vec![(*rule).to_string()];
        }
    }

    if let Some(caps) = EVERY_WEEKDAY_PATTERN.captures(&text) {
        let day = match &caps[1] {
            "monday" => "MO",
            "tuesday" => "TU",
            "wednesday" => "WE",
            "thursday" => "TH",
            "friday" => "FR",
            "saturday" => "SA",
            _ => "SU",
        };
        return vec![format!("RRULE:FREQ=WEEKLY;BYDAY={day}")];
    }

    Vec::new()
}
