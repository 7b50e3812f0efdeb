//! Keyword sets and ordered pattern tables for action detection.
//!
//! Tables are data, not control flow: each family is an ordered list of
//! `(pattern, tag)` pairs evaluated by a generic matcher, so a table can be
//! tested independently of the classifier that consumes it.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// One ordered family of `(pattern, tag)` pairs.
///
/// `first_match` walks the entries in order and returns the tag of the first
/// pattern that fires, which makes tie-breaks inside a family reproducible.
pub struct PatternTable {
    entries: Vec<(Regex, &'static str)>,
}

impl PatternTable {
    fn build(family: &[(&str, &'static str)]) -> Self {
        let entries = family
            .iter()
            .map(|(pattern, tag)| (Regex::new(pattern).expect("Invalid regex"), *tag))
            .collect();
        Self { entries }
    }

    /// Tag of the first entry that matches, in table order.
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(regex, _)| regex.is_match(text))
            .map(|(_, tag)| *tag)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// Pattern tables (checked in classifier precedence order)
// ============================================================================

/// List-events requests: verb+noun forms, question forms, possessives,
/// reversed noun-verb order.
pub static LIST_TABLE: LazyLock<PatternTable> = LazyLock::new(|| {
    PatternTable::build(&[
        (
            r"(?i)\b(list|show|view|display|get|check|fetch|retrieve|see)\s+(all\s+)?(my\s+)?(upcoming\s+)?(the\s+)?(events|meetings|appointments|schedule|calendar)\b",
            "verb_noun",
        ),
        (
            r"(?i)\bshow\s+me\s+(my\s+)?(upcoming\s+)?(events|meetings)\b",
            "verb_noun",
        ),
        (r"(?i)\bwhat\s+(events|meetings|appointments|schedule)\b", "question"),
        (
            r"(?i)\bdo\s+i\s+(have|get)\s+(any\s+)?(upcoming\s+)?(events|meetings|appointments)\b",
            "question",
        ),
        (r"(?i)\bupcoming\s+(events|meetings|appointments)\b", "upcoming"),
        (r"(?i)\bmy\s+(events|meetings|schedule|calendar)\b", "possessive"),
        (
            r"(?i)\b(events?|meetings?|appointments?)\s+(list|show|view|display)\b",
            "reversed",
        ),
    ])
});

/// Cancel phrasings that are unambiguous on their own.
pub static CANCEL_TABLE: LazyLock<PatternTable> = LazyLock::new(|| {
    PatternTable::build(&[
        (
            r"(?i)\b(cancel(?:ing)?|delete|remove|drop|scrap|abort|void|nullify|terminate|stop)\s+(?:the\s+)?(?:meeting|event|appointment|call|sync|chat|it|this|that)\b",
            "verb_object",
        ),
        (
            r"(?i)\b(?:please|kindly|can\s+you|could\s+you|would\s+you)\s+(?:cancel|delete|remove|drop|scrap|abort|terminate|stop)\s+(?:the\s+)?(?:meeting|event|appointment|call|sync|chat|it|this|that)\b",
            "polite",
        ),
        (
            r"(?i)\b(cancel(?:ing)?|delete|remove|drop|scrap|abort|terminate|stop)\s+all\s+(?:meetings|events|appointments|calls)\b",
            "all_events",
        ),
        (
            r"(?i)\b(?:meeting|event|appointment|call|sync)\s+(?:with\s+)?(?:cancel(?:lation)?|deletion|removal|drop|scrap|abort|termination)\b",
            "reversed",
        ),
        (
            r"(?i)\b(?:meeting|event|appointment|call|sync)\b.*\b(?:cancel(?:led|ling|ed|ing|lation)?|deleted?|removed?|dropped|scrapped|aborted)\b",
            "trailing",
        ),
    ])
});

/// Cancel phrasings that also read as update talk; the classifier only
/// consults this table when no update/reschedule keyword is present.
pub static CANCEL_GENERIC_TABLE: LazyLock<PatternTable> = LazyLock::new(|| {
    PatternTable::build(&[
        (r"(?i)\bto\s+(cancel|delete|remove)\b", "to_verb"),
        (
            r"(?i)\b(?:cancel(?:led|ling|ed|ing|lation)?|deleted?|deletes|remove[ds]?|drop(?:ped|ping)?|scrap(?:ped|ping)?|abort(?:ed|ing)?)\b",
            "bare_keyword",
        ),
    ])
});

/// Reschedule vocabulary that demotes a generic cancel reading; mirrors the
/// guard on the broad cancel phrasings above.
pub static RESCHEDULE_GUARD: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["reschedule", "postpone", "update", "change", "modify", "move", "shift"]
        .into_iter()
        .collect()
});

/// Update/reschedule requests. Reschedule entries come first; they are the
/// stronger signal and the original dispatch checks them first.
pub static UPDATE_TABLE: LazyLock<PatternTable> = LazyLock::new(|| {
    PatternTable::build(&[
        (
            r"(?i)\b(reschedul(?:e|ing)|postpon(?:e|ing)|mov(?:e|ing)|shift(?:ing)?|push(?:ing)?)\b.*\b(meeting|event|appointment|call|sync)\b",
            "reschedule_meeting",
        ),
        (r"(?i)\bbring\s+forward\b", "bring_forward"),
        (r"(?i)\b(postpone|push|move|shift)\s+(it|this|that|back)\b", "reschedule_pronoun"),
        (
            r"(?i)\b(reschedule|move|shift|postpone|push)\s+(a|the|my|our)\b",
            "reschedule_article",
        ),
        (
            r"(?i)\b(postpone|push|move|shift)\b.*\b(?:to|by|from)\s+\d",
            "reschedule_to_time",
        ),
        (
            r"(?i)\b(update|change|modify|edit|revise|alter|adjust|amend|replace)\b.*\b(meeting|event|appointment|call)\b",
            "update_meeting",
        ),
        (
            r"(?i)\bto\s+(update|change|modify|edit|revise|alter|adjust|amend|replace)\b",
            "to_update",
        ),
        (
            r"(?i)\b(meeting|event|appointment)\s+(update|change|modify|edit|revise|alter|adjust|amend|replace)\b",
            "reversed",
        ),
        (
            r"(?i)\bfrom\s+\d+\s*(?:minute|hour|min|hr)s?\s+to\s+\d+\s*(?:minute|hour|min|hr)s?\b",
            "duration_change",
        ),
        (
            r"(?i)\b(change|extend|shorten|increase|decrease)\b.*\b(duration|length|time)\b",
            "duration_change",
        ),
        (
            r"(?i)\breplace\b.*\b(?:google\s+meet|meet\.google|gmeet|zoom|video\s+call|link|location|room)\b",
            "link_change",
        ),
    ])
});

/// Create requests.
pub static CREATE_TABLE: LazyLock<PatternTable> = LazyLock::new(|| {
    PatternTable::build(&[
        (
            r"(?i)\b(create|make|book|schedule|arrange|organize|set\s*up|setup|fix|block|host|plan)\b.*\b(meeting|event|call|appointment|standup|session|sync|chat|hangout)\b",
            "create_meeting",
        ),
        (r"(?i)\b(meeting|call|sync|chat|catch\s*up)\s+with\b", "meeting_with"),
        (r"(?i)\blet'?s\s+(meet|have|do)\b", "lets_meet"),
    ])
});

// ============================================================================
// Keyword sets (token membership, lowercase)
// ============================================================================

pub static CREATE_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "create", "creating", "created", "make", "making", "made", "book", "booking", "booked",
        "schedule", "scheduling", "scheduled", "arrange", "arranging", "arranged", "organize",
        "organizing", "organized", "setup", "set", "setting", "fix", "fixing", "fixed", "block",
        "blocking", "blocked", "have", "having", "had", "host", "hosting", "hosted", "plan",
        "planning", "planned",
    ]
    .into_iter()
    .collect()
});

pub static MEETING_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "meeting", "meetings", "event", "events", "call", "calls", "appointment", "appointments",
        "standup", "standups", "session", "sessions", "sync", "chat", "chats", "hangout", "zoom",
        "meet",
    ]
    .into_iter()
    .collect()
});

/// Keywords that negate a create reading even when create words are present.
pub static NOT_CREATE_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "reschedule", "move", "shift", "push", "postpone", "update", "change", "modify",
        "replace", "switch", "adjust", "amend", "edit", "revise", "alter", "cancel", "delete",
        "remove", "drop", "scrap", "abort", "void", "nullify",
    ]
    .into_iter()
    .collect()
});

pub static CANCEL_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "cancel", "cancelling", "canceling", "cancelled", "canceled", "delete", "deleted",
        "deleting", "remove", "removing", "removed", "drop", "dropping", "dropped", "scrap",
        "scrapping", "scrapped", "abort", "aborting", "aborted", "void", "voiding", "voided",
        "nullify", "nullifying", "nullified", "terminate", "terminating", "terminated", "stop",
        "stopping", "stopped",
    ]
    .into_iter()
    .collect()
});

pub static UPDATE_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "update", "updating", "updated", "change", "changing", "changed", "modify", "modifying",
        "modified", "replace", "replacing", "replaced", "switch", "switching", "switched",
        "adjust", "adjusting", "adjusted", "amend", "amending", "amended", "edit", "editing",
        "edited", "revise", "revising", "revised", "alter", "altering", "altered", "reschedule",
        "rescheduling", "rescheduled", "postpone", "postponing", "postponed", "push", "pushing",
        "pushed", "move", "moving", "moved", "shift", "shifting", "shifted", "bring", "forward",
    ]
    .into_iter()
    .collect()
});

pub static LIST_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "list", "lists", "listed", "listing", "show", "shows", "showing", "showed", "view",
        "views", "viewing", "viewed", "display", "displays", "displaying", "displayed", "get",
        "gets", "getting", "see", "sees", "seeing", "saw", "check", "checks", "checking",
        "checked", "fetch", "fetches", "fetching", "retrieve", "retrieves", "retrieving", "what",
        "what's", "tell", "tells", "telling", "give", "gives", "giving", "load", "loads",
        "loading",
    ]
    .into_iter()
    .collect()
});

pub static EVENT_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "event", "events", "meeting", "meetings", "appointment", "appointments", "calendar",
        "calendars", "schedule", "schedules", "slots", "availability", "busy", "free",
    ]
    .into_iter()
    .collect()
});

/// Lowercased word tokens of a sentence, punctuation trimmed from both ends.
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'').to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// First token of the sentence present in the set, in sentence order.
pub fn first_keyword<'a>(tokens: &'a [String], set: &HashSet<&'static str>) -> Option<&'a str> {
    tokens
        .iter()
        .find(|t| set.contains(t.as_str()))
        .map(|t| t.as_str())
}
