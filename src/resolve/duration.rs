//! Meeting-length extraction.
//!
//! Explicit numeric phrases ("for 45 minutes", "2-hour") always win over
//! qualitative keywords ("quick", "long"); nothing matched falls back to
//! the configured default.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ParserConfig;

/// Numeric durations: (pattern, minutes per captured unit).
///
/// The unit-worded forms come first so "for 45 minutes" reads as minutes
/// and never as the bare "for N" shorthand.
static EXPLICIT_DURATIONS: LazyLock<Vec<(Regex, i64)>> = LazyLock::new(|| {
    [
        (r"\b(\d+)[-\s]*(?:hours?|hrs?)\b", 60),
        (r"\b(\d+)[-\s]*(?:minutes?|mins?)\b", 1),
        (r"\bfor\s+(\d+)\b", 1),
    ]
    .into_iter()
    .map(|(pattern, unit)| (Regex::new(pattern).expect("Invalid regex"), unit))
    .collect()
});

/// Qualitative durations: (pattern, minutes).
static KEYWORD_DURATIONS: LazyLock<Vec<(Regex, i64)>> = LazyLock::new(|| {
    [
        (r"\bhalf\s*hour\b", 30),
        (r"\bquick\b", 15),
        (r"\bbrief\b", 15),
        (r"\bcatch[-\s]?up\b", 15),
        (r"\bshort\b", 15),
        (r"\b(?:medium|med)\b", 30),
        (r"\blong\b", 60),
    ]
    .into_iter()
    .map(|(pattern, minutes)| (Regex::new(pattern).expect("Invalid regex"), minutes))
    .collect()
});

/// Resolves duration phrases to a minute count.
#[derive(Debug, Clone)]
pub struct DurationResolver {
    default_min: i64,
}

impl Default for DurationResolver {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl DurationResolver {
    pub fn new(parser: &ParserConfig) -> Self {
        Self {
            default_min: parser.default_duration_min,
        }
    }

    pub fn resolve(&self, text: &str) -> i64 {
        let text = text.to_lowercase();

        for (pattern, unit) in EXPLICIT_DURATIONS.iter() {
            if let Some(caps) = pattern.captures(&text) {
                let value: i64 = caps[1].parse().unwrap_or(0);
                if value > 0 {
                    return value * unit;
                }
            }
        }

        for (pattern, minutes) in KEYWORD_DURATIONS.iter() {
            if pattern.is_match(&text) {
                return *minutes;
            }
        }

        self.default_min
    }
}
