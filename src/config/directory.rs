//! Attendee directory: person and team lookup tables.

use crate::error::{DirectoryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One directory person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
}

/// One named team with lookup aliases and member emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

/// The read-only lookup table attendee names resolve against.
///
/// Loaded once per process; resolvers borrow it and never mutate it, so
/// concurrent requests can share one snapshot without coordination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Directory {
    pub persons: Vec<Person>,
    pub teams: Vec<Team>,
}

impl Directory {
    /// Load a directory from a JSON or TOML file, picked by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(DirectoryError::ReadFile)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(DirectoryError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }

    /// Parse a directory from JSON.
    ///
    /// Accepts either the full `{persons, teams}` object or the legacy
    /// flat-array person list.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let directory = match serde_json::from_str::<Directory>(content) {
            Ok(d) => d,
            Err(_) => {
                let persons: Vec<Person> =
                    serde_json::from_str(content).map_err(DirectoryError::ParseJson)?;
                Directory {
                    persons,
                    teams: Vec::new(),
                }
            }
        };
        directory.validate()?;
        Ok(directory)
    }

    /// Parse a directory from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let directory: Directory = toml::from_str(content).map_err(DirectoryError::ParseToml)?;
        directory.validate()?;
        Ok(directory)
    }

    fn validate(&self) -> Result<()> {
        for person in &self.persons {
            if person.email.is_empty() {
                return Err(DirectoryError::InvalidEntry(format!(
                    "person '{}' has no email",
                    person.name
                ))
                .into());
            }
        }
        for team in &self.teams {
            if team.name.is_empty() {
                return Err(DirectoryError::InvalidEntry("team with empty name".to_string()).into());
            }
        }
        Ok(())
    }

    /// Exact case-insensitive person-name lookup.
    pub fn find_person(&self, name: &str) -> Option<&Person> {
        let name_lower = name.trim().to_lowercase();
        self.persons.iter().find(|p| p.name.to_lowercase() == name_lower)
    }

    /// Match a name against email local parts, dots treated as spaces.
    ///
    /// "John Doe" matches "john.doe@example.com".
    pub fn find_by_local_part(&self, name: &str) -> Option<&Person> {
        let name_lower = name.trim().to_lowercase();
        if name_lower.is_empty() {
            return None;
        }
        self.persons.iter().find(|p| {
            let local = p.email.split('@').next().unwrap_or("");
            local.to_lowercase().replace('.', " ").contains(&name_lower)
        })
    }

    /// Resolve a team by name or alias to its member emails, in directory order.
    pub fn team_members(&self, name: &str) -> Option<&[String]> {
        let name_lower = name.trim().to_lowercase();
        self.teams
            .iter()
            .find(|t| {
                t.name.to_lowercase() == name_lower
                    || t.aliases.iter().any(|a| a.to_lowercase() == name_lower)
            })
            .map(|t| t.members.as_slice())
    }

    /// Person entry for an exact email, used to recover display names for
    /// team members.
    pub fn person_for_email(&self, email: &str) -> Option<&Person> {
        let email_lower = email.to_lowercase();
        self.persons.iter().find(|p| p.email.to_lowercase() == email_lower)
    }
}

/// Words that are never attendee names: pronouns, question words, scheduling
/// vocabulary, department names, job titles, honorifics.
///
/// Built explicitly per process instead of living in a global cache, so
/// tests and concurrent parsers each hold their own immutable copy.
#[derive(Debug, Clone)]
pub struct ExclusionWords {
    words: HashSet<String>,
}

impl Default for ExclusionWords {
    fn default() -> Self {
        let words = BUILT_IN_EXCLUSIONS
            .iter()
            .map(|w| w.to_string())
            .collect();
        Self { words }
    }
}

impl ExclusionWords {
    /// Built-in set plus configured extras.
    pub fn with_extras(extras: &[String]) -> Self {
        let mut set = Self::default();
        for word in extras {
            set.words.insert(word.to_lowercase());
        }
        set
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_lowercase())
    }

    /// Strip one leading and one trailing exclusion word from a candidate
    /// name ("dr john sir" -> "john").
    pub fn clean_name(&self, name: &str) -> String {
        let mut parts: Vec<&str> = name.split_whitespace().collect();
        if let Some(first) = parts.first() {
            if self.contains(first) {
                parts.remove(0);
            }
        }
        if let Some(last) = parts.last() {
            if self.contains(last) {
                parts.pop();
            }
        }
        parts.join(" ")
    }

    /// A candidate survives when it is longer than one character and is not
    /// an excluded word.
    pub fn is_valid_name(&self, name: &str) -> bool {
        let trimmed = name.trim();
        trimmed.len() > 1 && !self.contains(trimmed)
    }
}

const BUILT_IN_EXCLUSIONS: &[&str] = &[
    // Pronouns
    "me", "myself", "my", "we", "us", "our", "ours", "you", "your", "yours", "him", "her", "his",
    "hers", "them", "their", "theirs", "it", "its",
    // Question words, articles, demonstratives
    "who", "what", "when", "where", "why", "how", "which", "whom", "the", "this", "that", "these",
    "those",
    // Scheduling vocabulary
    "meeting", "call", "chat", "discussion", "hangout", "everyone", "all", "team", "group",
    "anyone", "anybody", "tomorrow", "today", "yesterday", "morning", "afternoon", "evening",
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "next", "last",
    "previous", "current", "email", "text", "message",
    // Departments
    "finance", "legal", "engineering", "sales", "marketing", "hr", "human resources", "support",
    "operations",
    // Job titles
    "ceo", "cto", "cfo", "coo", "vp", "director", "manager", "lead",
    // Honorifics
    "sir", "ma'am", "maam", "madam", "dr", "prof", "mr", "mrs", "miss",
];
