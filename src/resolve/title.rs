//! Title and description synthesis.
//!
//! Titles combine three extracted facts: the purpose ("about budget"), the
//! resolved attendee list, and a meeting-type keyword. Precedence:
//! purpose + generic type ("Budget Sync") over purpose + attendee list over
//! type + attendee list over attendee list alone, with "Meeting" as the
//! literal fallback. Update, cancel, and list sentences yield an empty
//! title so an existing calendar entry is never clobbered.

use std::sync::LazyLock;

use regex::Regex;

use crate::meeting::{AttendeeRef, MeetingAction};

// ============================================================================
// Meeting types
// ============================================================================

/// A recognized meeting-type keyword.
///
/// Generic types ("sync", "call") merge with a purpose into one phrase;
/// specific types carry their own display form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingType {
    pub display: &'static str,
    pub generic: bool,
}

/// Specific meeting types with canonical display names, first match wins.
static SPECIFIC_TYPES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(?:1:1|one-on-one|one\s+on\s+one)\b", "1:1 Meeting"),
        (r"\b(?:sprint\s*standup|daily\s*standup|standup)\b", "Daily Standup"),
        (r"\b(?:weekly\s*sync|team\s*sync|sync\s*up)\b", "Team Sync"),
        (r"\b(?:status\s*update|update\s*meeting)\b", "Status Update"),
        (r"\bsprint\s+planning\b", "Sprint Planning Session"),
        (r"\b(?:planning\s*session|planning\s*meeting)\b", "Planning Session"),
        (r"\b(?:retro|retrospective)\b", "Retrospective"),
        (r"\b(?:roadmap|road\s*map)\b", "Roadmap Review"),
        (r"\b(?:product\s*demo|demo)\b", "Product Demo"),
        (r"\binterview\b", "Interview"),
        (r"\b(?:project\s*kickoff|kickoff)\b", "Project Kickoff"),
        (r"\b(?:code\s*review|design\s*review|review)\b", "Review Meeting"),
        (r"\bworkshop\b", "Workshop"),
        (r"\btown\s*hall\b", "Town Hall"),
        (r"\ball-hands\b", "All Hands"),
        (r"\blunch\b", "Lunch"),
        (r"\b(?:coffee\s*chat|coffee)\b", "Coffee Chat"),
        (r"\b(?:quick\s*chat|brief\s*chat)\b", "Quick Chat"),
    ]
    .into_iter()
    .map(|(pattern, display)| (Regex::new(pattern).expect("Invalid regex"), display))
    .collect()
});

static GENERIC_TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(meeting|call|chat|discussion|hangout|sync)\b").expect("Invalid regex")
});

/// Detect a meeting-type keyword in lowered text.
pub fn detect_meeting_type(lowered: &str) -> Option<MeetingType> {
    for (pattern, display) in SPECIFIC_TYPES.iter() {
        if pattern.is_match(lowered) {
            return Some(MeetingType {
                display,
                generic: false,
            });
        }
    }
    let caps = GENERIC_TYPE_PATTERN.captures(lowered)?;
    let display = match &caps[1] {
        "meeting" => "Meeting",
        "call" => "Call",
        "chat" => "Chat",
        "discussion" => "Discussion",
        "hangout" => "Hangout",
        _ => "Sync",
    };
    Some(MeetingType {
        display,
        generic: true,
    })
}

// ============================================================================
// Purpose
// ============================================================================

static TOPIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\babout\s+([a-z][a-z\s]*)",
        r"\bregarding\s+([a-z][a-z\s]*)",
        r"\bre:?\s+([a-z][a-z\s]*)",
        r"\bon\s+(?:the\s+)?(?:topic|subject)\s+(?:of\s+)?([a-z][a-z\s]*)",
        r"\bto\s+(?:discuss|talk\s+about|review|plan)\s+([a-z][a-z\s]*)",
        r"\bfor\s+([a-z][a-z\s]{2,})",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
    .collect()
});

/// Date, time, and filler words scrubbed off the tail of a topic.
static TOPIC_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s+(?:at|on|tomorrow|today|with|for|next|this|week|monday|tuesday|wednesday|thursday|friday|saturday|sunday|morning|afternoon|evening|am|pm)\s*$",
    )
    .expect("Invalid regex")
});

static TRAILING_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+\d{1,2}(?::\d{2})?\s*(?:am|pm)?\s*$").expect("Invalid regex")
});

const NON_TOPIC_WORDS: &[&str] = &[
    "me", "everyone", "all", "team", "you", "the", "this", "next", "today", "tomorrow", "morning",
    "evening", "afternoon", "day", "week", "hour", "minute", "monday", "tuesday", "wednesday",
    "thursday", "friday", "saturday", "sunday",
];

/// Extract the meeting purpose ("about budget review" -> "Budget Review").
pub fn extract_purpose(lowered: &str) -> Option<String> {
    for pattern in TOPIC_PATTERNS.iter() {
        let Some(caps) = pattern.captures(lowered) else {
            continue;
        };
        let topic = scrub_tail(caps[1].trim());
        if topic.len() > 2 && !NON_TOPIC_WORDS.contains(&topic.as_str()) {
            return Some(title_case_words(&topic));
        }
    }
    None
}

/// Strip trailing date words and clock fragments until stable.
fn scrub_tail(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let pass = TOPIC_TRAILING.replace(&current, "");
        let pass = TRAILING_CLOCK.replace(&pass, "");
        let next = pass.trim().to_string();
        if next == current {
            return next;
        }
        current = next;
    }
}

// ============================================================================
// Title composition
// ============================================================================

/// Compose a title from the extracted purpose, attendee display names, and
/// meeting type.
pub fn build_title(
    purpose: Option<&str>,
    attendee_names: &[String],
    meeting_type: Option<MeetingType>,
) -> String {
    let list = attendee_list(attendee_names);
    match (purpose, meeting_type) {
        (Some(p), Some(t)) if t.generic => format!("{p} {}", t.display),
        (Some(p), _) => match list {
            Some(l) => format!("{p} {l}"),
            None => p.to_string(),
        },
        (None, Some(t)) => match list {
            Some(l) => format!("{} {l}", t.display),
            None => t.display.to_string(),
        },
        (None, None) => match list {
            Some(l) => format!("Meeting {l}"),
            None => "Meeting".to_string(),
        },
    }
}

/// "with X", "with X & Y", "with X, Y & Z".
fn attendee_list(names: &[String]) -> Option<String> {
    match names {
        [] => None,
        [one] => Some(format!("with {one}")),
        [a, b] => Some(format!("with {a} & {b}")),
        [rest @ .., last] => Some(format!("with {} & {last}", rest.join(", "))),
    }
}

// ============================================================================
// Fallbacks and cleanup
// ============================================================================

static LEADING_WORDS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-z][a-z\s]*?)\s+(?:tomorrow|today|monday|tuesday|wednesday|thursday|friday|saturday|sunday|next\s+week|this\s+week|at\s+\d)",
    )
    .expect("Invalid regex")
});

static LEADING_BEFORE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z][a-z\s]*?)\s+(?:for\s+)?\d").expect("Invalid regex"));

static LEADING_CAPITALIZED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)").expect("Invalid regex"));

/// Words before the first time indicator ("dentist appointment tomorrow 5pm"
/// -> "Dentist Appointment"), then leading capitalized words from the raw
/// sentence.
fn leading_title(raw: &str, lowered: &str) -> Option<String> {
    for pattern in [&*LEADING_WORDS_PATTERN, &*LEADING_BEFORE_NUMBER_PATTERN] {
        if let Some(caps) = pattern.captures(lowered) {
            let lead = caps[1].trim();
            if lead.len() > 3 && !matches!(lead, "meeting" | "call" | "sync") {
                return Some(title_case_words(lead));
            }
        }
    }
    if let Some(caps) = LEADING_CAPITALIZED_PATTERN.captures(raw.trim()) {
        let lead = caps[1].trim();
        if lead.len() > 3 {
            return Some(lead.to_string());
        }
    }
    None
}

const TITLE_DROP_WORDS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "tomorrow",
    "today", "next", "this", "on", "at", "in", "afternoon", "morning", "evening", "noon",
];

static TRAILING_PREPOSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:on|at|in|for|to|with)$").expect("Invalid regex"));

/// Drop stray date words and trailing prepositions from a title.
pub fn clean_title(title: &str) -> String {
    let kept: Vec<&str> = title
        .split_whitespace()
        .filter(|word| !TITLE_DROP_WORDS.contains(&word.to_lowercase().as_str()))
        .collect();
    let cleaned = kept.join(" ");
    TRAILING_PREPOSITION.replace(&cleaned, "").trim().to_string()
}

/// Resolve the title for one sentence.
///
/// Empty for update, cancel, and list requests: those target an existing
/// event whose title must be preserved.
pub fn resolve_title(text: &str, action: MeetingAction, attendees: &[AttendeeRef]) -> String {
    if matches!(
        action,
        MeetingAction::Update | MeetingAction::Cancel | MeetingAction::ListEvents
    ) {
        return String::new();
    }
    let lowered = text.to_lowercase();
    let purpose = extract_purpose(&lowered);
    let meeting_type = detect_meeting_type(&lowered);
    let names: Vec<String> = attendees.iter().map(|a| a.display_name.clone()).collect();

    let mut title = build_title(purpose.as_deref(), &names, meeting_type);
    if title == "Meeting" {
        if let Some(lead) = leading_title(text, &lowered) {
            title = lead;
        }
    }
    clean_title(&title)
}

// ============================================================================
// Description
// ============================================================================

static DESCRIPTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\babout\s+(.{3,})",
        r"\bregarding\s+(.{3,})",
        r"\bre\s+(.{3,})",
        r"\btopic\s+(.{3,})",
        r"\bfor\s+(?:the\s+)?(?:discussion|review|update|plan)\s+(?:of\s+)?(.{3,})",
        r"\bon\s+(?:the\s+)?(?:topic|subject)\s+(?:of\s+)?(.{3,})",
        r"\bto\s+(?:discuss|talk|review|plan)\s+(.{3,})",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
    .collect()
});

static RE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+re:\s*").expect("Invalid regex"));

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Extract a free-text description, empty when the sentence has none.
pub fn resolve_description(text: &str) -> String {
    let lowered = text.to_lowercase();
    for pattern in DESCRIPTION_PATTERNS.iter() {
        let Some(caps) = pattern.captures(&lowered) else {
            continue;
        };
        let desc = scrub_tail(caps[1].trim());
        let desc = RE_MARKER.replace_all(&desc, " ");
        let desc = MULTI_SPACE.replace_all(&desc, " ");
        let desc = desc.trim().trim_matches(|c| ".,;:!?".contains(c)).trim();
        if desc.len() > 2 {
            return capitalize_sentence(desc);
        }
    }
    String::new()
}

fn capitalize_sentence(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

fn title_case_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
