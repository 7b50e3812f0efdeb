//! The meeting domain: records, flags, orchestration, and clarification.
//!
//! This module provides:
//! - The output types: [`MeetingRecord`], [`AttendeeRef`], [`LocationSpec`],
//!   ambiguity flags, and the reminder block
//! - Meal-window detection and avoidance adjustment
//! - The [`Orchestrator`] that composes one record from one sentence
//! - The [`ClarificationSession`] question/answer loop over ambiguity flags

pub mod meals;
pub mod orchestrator;
pub mod record;
pub mod session;

pub use orchestrator::{Orchestrator, ParseOutcome};
pub use record::{
    AmbiguityFlag, AttendeeRef, ClarificationTurn, LinkOrigin, LocationSpec, Meal, MeetingAction,
    MeetingMode, MeetingRecord, MeetingRequest, Provenance, ReminderMethod, ReminderOverride,
    Reminders, ResolvedDateTime, SourceKind,
};
pub use session::{ClarificationSession, SessionState};
