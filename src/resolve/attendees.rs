//! Attendee extraction and directory resolution.
//!
//! Candidates come from the sentence's "with …" clause, split on `+`,
//! "and"/"&", and commas. Each candidate is matched against the directory:
//! exact person name, then email local parts, then team names and aliases
//! (which expand to every member). Literal email addresses anywhere in the
//! sentence are always included, verbatim and first.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Directory, ExclusionWords, ParserConfig};
use crate::meeting::AttendeeRef;

// ============================================================================
// Patterns
// ============================================================================

/// "with X" up to the next scheduling word. The captured clause may span
/// several separated names.
static WITH_CLAUSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bwith\s+(.+?)(?:\s+(?:about|for|at|on|today|tomorrow|next|this|week|evening|morning|afternoon|night|monday|tuesday|wednesday|thursday|friday|saturday|sunday|after|in|by|to|re)\b|$)",
    )
    .expect("Invalid regex")
});

static SEPARATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\+\s*|\s+(?:and|&)\s+|\s*,\s*").expect("Invalid regex"));

static TRAILING_DATE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:tomorrow|today|next|am|pm|at|on|re)\s*$").expect("Invalid regex")
});

static TRAILING_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+\d{1,2}(?::\d{2})?\s*(?:am|pm)?\s*$").expect("Invalid regex")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid regex")
});

static EMAIL_EXACT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex")
});

// ============================================================================
// Resolver
// ============================================================================

/// Resolves attendee mentions against a directory snapshot.
pub struct AttendeeResolver<'a> {
    directory: &'a Directory,
    exclusions: &'a ExclusionWords,
    strict_lookup: bool,
    placeholder_domain: &'a str,
}

impl<'a> AttendeeResolver<'a> {
    pub fn new(
        directory: &'a Directory,
        exclusions: &'a ExclusionWords,
        parser: &'a ParserConfig,
    ) -> Self {
        Self {
            directory,
            exclusions,
            strict_lookup: parser.strict_directory_lookup,
            placeholder_domain: &parser.placeholder_domain,
        }
    }

    /// Resolve every attendee mentioned in one sentence.
    ///
    /// Output order is mention order; duplicates collapse onto the first
    /// occurrence of each email.
    pub fn resolve(&self, text: &str) -> Vec<AttendeeRef> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();

        for email in EMAIL_PATTERN.find_iter(text) {
            push_unique(self.literal_email(email.as_str()), &mut out, &mut seen);
        }

        for candidate in candidates(text) {
            if EMAIL_EXACT_PATTERN.is_match(&candidate) {
                continue;
            }
            for attendee in self.resolve_candidate(&candidate) {
                push_unique(attendee, &mut out, &mut seen);
            }
        }

        out
    }

    fn resolve_candidate(&self, candidate: &str) -> Vec<AttendeeRef> {
        // A verbatim directory hit wins before any cleaning, so team phrases
        // built from excluded words ("finance team") still resolve.
        if let Some(person) = self.directory.find_person(candidate) {
            return vec![person_ref(person)];
        }
        if let Some(found) = self.expand_team(candidate) {
            return found;
        }

        let cleaned = self.exclusions.clean_name(candidate);
        if !self.exclusions.is_valid_name(&cleaned) {
            return Vec::new();
        }
        if let Some(person) = self.directory.find_person(&cleaned) {
            return vec![person_ref(person)];
        }
        if let Some(person) = self.directory.find_by_local_part(&cleaned) {
            return vec![person_ref(person)];
        }
        if let Some(found) = self.expand_team(&cleaned) {
            return found;
        }

        if self.strict_lookup {
            return Vec::new();
        }
        let email = format!(
            "{}@{}",
            cleaned.to_lowercase().replace(' ', "."),
            self.placeholder_domain
        );
        vec![AttendeeRef::unresolved(title_case_words(&cleaned), email)]
    }

    fn expand_team(&self, name: &str) -> Option<Vec<AttendeeRef>> {
        let members = self.directory.team_members(name)?;
        Some(
            members
                .iter()
                .map(|email| AttendeeRef::team_member(self.display_for(email), email.clone()))
                .collect(),
        )
    }

    fn literal_email(&self, email: &str) -> AttendeeRef {
        AttendeeRef::person(self.display_for(email), email)
    }

    /// Directory display name for an email, or the email itself.
    fn display_for(&self, email: &str) -> String {
        self.directory
            .person_for_email(email)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| email.to_string())
    }
}

// ============================================================================
// Candidate extraction
// ============================================================================

fn candidates(text: &str) -> Vec<String> {
    let Some(caps) = WITH_CLAUSE_PATTERN.captures(text) else {
        return Vec::new();
    };
    let clause = caps[1].trim();
    SEPARATOR_PATTERN
        .split(clause)
        .map(scrub_candidate)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Drop trailing date words and clock fragments left inside the clause
/// ("John tomorrow 6pm" -> "John tomorrow" -> cleaned later).
fn scrub_candidate(part: &str) -> String {
    let part = TRAILING_DATE_WORDS.replace(part.trim(), "");
    let part = TRAILING_CLOCK.replace(&part, "");
    part.trim().to_string()
}

fn push_unique(attendee: AttendeeRef, out: &mut Vec<AttendeeRef>, seen: &mut HashSet<String>) {
    if seen.insert(attendee.email.to_lowercase()) {
        out.push(attendee);
    }
}

fn person_ref(person: &crate::config::Person) -> AttendeeRef {
    AttendeeRef::person(person.name.clone(), person.email.clone())
}

fn title_case_words(name: &str) -> String {
    name.split_whitespace()
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
