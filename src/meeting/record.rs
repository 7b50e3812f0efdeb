//! Core data model: requests, resolved records, ambiguity flags, and
//! clarification turns.
//!
//! A `MeetingRequest` goes in, and either an actionable `MeetingRecord` or a
//! `ClarificationTurn` comes out. Records carry zero or more `AmbiguityFlag`s;
//! a record with flags is never handed to the executor.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resolve::TimePeriod;

// ============================================================================
// Input
// ============================================================================

/// The parser's input unit: one user turn.
///
/// Immutable once created. `now` is always injected by the caller; nothing in
/// the parser reads the wall clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    /// Raw sentence as typed by the user.
    pub sentence: String,
    /// Reference instant, timezone-aware.
    pub now: DateTime<FixedOffset>,
    /// Session-carried disambiguation answer, if this turn answers a question.
    pub answer: Option<String>,
}

impl MeetingRequest {
    pub fn new(sentence: impl Into<String>, now: DateTime<FixedOffset>) -> Self {
        Self {
            sentence: sentence.into(),
            now,
            answer: None,
        }
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }
}

// ============================================================================
// Resolved values
// ============================================================================

/// Where a resolved value came from, used for tie-break policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Explicit text ("on 23rd feb at 6pm").
    Explicit,
    /// Relative expression ("tomorrow", "next monday").
    Relative,
    /// System default applied in the absence of text.
    Default,
}

/// A timezone-aware instant plus its provenance.
///
/// Never mutated after creation; clarification replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDateTime {
    pub instant: DateTime<FixedOffset>,
    pub provenance: Provenance,
}

impl ResolvedDateTime {
    pub fn new(instant: DateTime<FixedOffset>, provenance: Provenance) -> Self {
        Self { instant, provenance }
    }

    pub fn explicit(instant: DateTime<FixedOffset>) -> Self {
        Self::new(instant, Provenance::Explicit)
    }

    pub fn relative(instant: DateTime<FixedOffset>) -> Self {
        Self::new(instant, Provenance::Relative)
    }

    pub fn fallback(instant: DateTime<FixedOffset>) -> Self {
        Self::new(instant, Provenance::Default)
    }
}

impl std::fmt::Display for ResolvedDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.instant.format("%A, %B %d, %Y at %I:%M %p"))
    }
}

/// How an attendee identity was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Matched a directory person.
    Person,
    /// Expanded from a team entry.
    Team,
    /// No directory match; placeholder identity.
    Unresolved,
}

/// One resolved attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeRef {
    pub display_name: String,
    pub email: String,
    pub source: SourceKind,
}

impl AttendeeRef {
    pub fn person(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            source: SourceKind::Person,
        }
    }

    pub fn team_member(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            source: SourceKind::Team,
        }
    }

    pub fn unresolved(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            source: SourceKind::Unresolved,
        }
    }
}

/// Online vs. physical meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingMode {
    Online,
    Offline,
}

/// Whether the meeting link was supplied or must be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOrigin {
    /// The sentence carried a usable link.
    Provided,
    /// The executor should generate a fresh conference link.
    AutoGenerate,
}

/// Where the meeting happens and how participants join.
///
/// At most one of `meeting_link` / auto-generation is active: a provided link
/// always carries `LinkOrigin::Provided`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSpec {
    pub mode: MeetingMode,
    pub location_text: String,
    pub meeting_link: Option<String>,
    pub link_origin: LinkOrigin,
}

impl Default for LocationSpec {
    fn default() -> Self {
        Self {
            mode: MeetingMode::Online,
            location_text: "Online".to_string(),
            meeting_link: None,
            link_origin: LinkOrigin::AutoGenerate,
        }
    }
}

/// Reminder delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderMethod {
    Popup,
    Email,
}

/// One reminder override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes: u32,
}

/// Reminder settings carried on every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Default for Reminders {
    fn default() -> Self {
        // Fixed deployment default: one popup ten minutes before
        Self {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: ReminderMethod::Popup,
                minutes: 10,
            }],
        }
    }
}

/// What the user wants done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingAction {
    Create,
    Update,
    Cancel,
    ListEvents,
}

impl std::fmt::Display for MeetingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MeetingAction::Create => "create",
            MeetingAction::Update => "update",
            MeetingAction::Cancel => "cancel",
            MeetingAction::ListEvents => "list_events",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Ambiguity
// ============================================================================

/// A meal whose time window scheduling may need to avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Brunch,
    Snack,
}

impl Meal {
    /// Window boundaries for display ("Lunch (12:00 PM - 2:00 PM)").
    pub fn window_label(&self) -> &'static str {
        match self {
            Meal::Breakfast => "Breakfast (7:00 AM - 9:00 AM)",
            Meal::Lunch => "Lunch (12:00 PM - 2:00 PM)",
            Meal::Dinner => "Dinner (7:00 PM - 9:00 PM)",
            Meal::Brunch => "Brunch (10:00 AM - 2:00 PM)",
            Meal::Snack => "Snack time (3:00 PM - 4:00 PM)",
        }
    }

    /// Suggested slot just before the window opens.
    pub fn before_option(&self) -> &'static str {
        match self {
            Meal::Breakfast => "Before Breakfast (7:00 AM)",
            Meal::Lunch => "Before Lunch (11:30 AM)",
            Meal::Dinner => "Before Dinner (6:30 PM)",
            Meal::Brunch => "Before Brunch (9:30 AM)",
            Meal::Snack => "Before Snack (2:30 PM)",
        }
    }

    /// Suggested slot right after the window closes.
    pub fn after_option(&self) -> &'static str {
        match self {
            Meal::Breakfast => "After Breakfast (9:00 AM)",
            Meal::Lunch => "After Lunch (2:00 PM)",
            Meal::Dinner => "After Dinner (9:00 PM)",
            Meal::Brunch => "After Brunch (2:00 PM)",
            Meal::Snack => "After Snack (4:00 PM)",
        }
    }
}

impl std::fmt::Display for Meal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
            Meal::Brunch => "brunch",
            Meal::Snack => "snack",
        };
        write!(f, "{}", name)
    }
}

/// A structured marker for a slot that could not be resolved to a single
/// unambiguous value. A non-empty flag list blocks execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityFlag {
    /// A bare clock hour with no AM/PM marker.
    AmPmAmbiguous { hour: u32 },
    /// A time range where neither side carries AM/PM.
    TimeRangeAmbiguous { start_hour: u32, end_hour: u32 },
    /// The resolved date is strictly before today.
    PastDate { resolved_date: NaiveDate },
    /// Meal-avoidance phrasing without a concrete meeting time.
    MealTimeConflict { meals: Vec<Meal> },
    /// A list request without any time period.
    MissingTimePeriod,
}

impl AmbiguityFlag {
    /// The user-facing question that resolves this flag.
    pub fn question(&self) -> String {
        match self {
            AmbiguityFlag::AmPmAmbiguous { hour } => {
                format!("You mentioned the time {}. Is this AM or PM?", hour)
            }
            AmbiguityFlag::TimeRangeAmbiguous {
                start_hour,
                end_hour,
            } => format!(
                "You mentioned a time range {}-{}. Is this AM or PM?",
                start_hour, end_hour
            ),
            AmbiguityFlag::PastDate { resolved_date } => format!(
                "The date {} is in the past. Please enter a valid future date.",
                resolved_date.format("%A, %B %d, %Y")
            ),
            AmbiguityFlag::MealTimeConflict { meals } => {
                let names: Vec<String> = meals.iter().map(|m| m.to_string()).collect();
                format!(
                    "You mentioned avoiding {} time. Please specify a clear meeting time.",
                    names.join(", ")
                )
            }
            AmbiguityFlag::MissingTimePeriod => {
                "You didn't mention a time period. Which period should I list events for?"
                    .to_string()
            }
        }
    }

    /// Suggested answers to render as quick choices; empty means free text.
    pub fn candidate_answers(&self) -> Vec<String> {
        match self {
            AmbiguityFlag::AmPmAmbiguous { .. } | AmbiguityFlag::TimeRangeAmbiguous { .. } => {
                vec!["AM".to_string(), "PM".to_string()]
            }
            AmbiguityFlag::PastDate { .. } => Vec::new(),
            AmbiguityFlag::MealTimeConflict { meals } => {
                let mut options = Vec::new();
                for meal in meals {
                    options.push(meal.before_option().to_string());
                    options.push(meal.after_option().to_string());
                }
                options
            }
            AmbiguityFlag::MissingTimePeriod => vec![
                "today".to_string(),
                "tomorrow".to_string(),
                "this week".to_string(),
                "next week".to_string(),
            ],
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// The parser's terminal output: one fully-composed meeting action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub action: MeetingAction,
    /// Empty for update requests so the existing entry title survives.
    pub title: String,
    pub description: String,
    /// Order-preserving for display; matching is order-insensitive.
    pub attendees: Vec<AttendeeRef>,
    pub start: Option<ResolvedDateTime>,
    pub end: Option<ResolvedDateTime>,
    pub duration_min: i64,
    pub location: LocationSpec,
    /// RRULE strings; empty means non-recurring.
    pub recurrence: Vec<String>,
    pub reminders: Reminders,
    /// Identifier the executor uses when auto-generating a conference link.
    pub request_id: String,
    /// Present only for list requests.
    pub time_period: Option<TimePeriod>,
    pub flags: Vec<AmbiguityFlag>,
}

impl MeetingRecord {
    pub fn new(action: MeetingAction) -> Self {
        Self {
            action,
            title: String::new(),
            description: String::new(),
            attendees: Vec::new(),
            start: None,
            end: None,
            duration_min: 30,
            location: LocationSpec::default(),
            recurrence: Vec::new(),
            reminders: Reminders::default(),
            request_id: Uuid::new_v4().to_string(),
            time_period: None,
            flags: Vec::new(),
        }
    }

    /// An executor may act on this record only when every ambiguity is
    /// resolved and the interval is well-formed.
    pub fn is_actionable(&self) -> bool {
        if !self.flags.is_empty() {
            return false;
        }
        if self.action == MeetingAction::ListEvents {
            return self.time_period.is_some();
        }
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => end.instant > start.instant,
            _ => false,
        }
    }

    /// Attendee emails in display order, deduplicated.
    pub fn attendee_emails(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.attendees
            .iter()
            .filter(|a| seen.insert(a.email.as_str()))
            .map(|a| a.email.as_str())
            .collect()
    }
}

/// One pending question/answer round trip.
///
/// Created when the orchestrator raises a flag; consumed when the caller
/// supplies an answer that is merged back into the draft record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarificationTurn {
    pub original_sentence: String,
    pub flag: AmbiguityFlag,
    pub question: String,
    pub candidate_answers: Vec<String>,
}

impl ClarificationTurn {
    pub fn new(original_sentence: impl Into<String>, flag: AmbiguityFlag) -> Self {
        let question = flag.question();
        let candidate_answers = flag.candidate_answers();
        Self {
            original_sentence: original_sentence.into(),
            flag,
            question,
            candidate_answers,
        }
    }
}
