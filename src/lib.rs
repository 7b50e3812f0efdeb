//! Confab: deterministic scheduling-language parser
//!
//! Turns free-text scheduling requests ("create a meeting with John
//! tomorrow at 6pm for 30 minutes about budget") into structured meeting
//! records: an action, attendees resolved against a directory,
//! timezone-aware start/end instants, location, recurrence, and a title.
//! Ambiguity is never guessed away; it surfaces as flags that drive a
//! multi-turn clarification session.
//!
//! The parser is rule-based and fully deterministic: the same sentence,
//! clock, and directory always produce the same record.

pub mod config;
pub mod error;
pub mod intent;
pub mod meeting;
pub mod resolve;

pub use config::{
    Config, Directory, DirectoryConfig, ExclusionWords, ParserConfig, PastDatePolicy, Person, Team,
    TimezoneConfig,
};
pub use error::{ConfabError, ConfigError, DirectoryError, Result, SessionError};
pub use intent::{Classification, IntentClassifier};
pub use meeting::{
    AmbiguityFlag, AttendeeRef, ClarificationSession, ClarificationTurn, LinkOrigin, LocationSpec,
    Meal, MeetingAction, MeetingMode, MeetingRecord, MeetingRequest, Orchestrator, ParseOutcome,
    Provenance, ReminderMethod, ReminderOverride, Reminders, ResolvedDateTime, SessionState,
    SourceKind,
};
pub use resolve::{
    AttendeeResolver, DateOutcome, DateResolver, DurationResolver, MeetingType, PendingClock,
    PeriodKind, TimeOutcome, TimePeriod, TimeResolver,
};
