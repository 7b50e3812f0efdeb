//! Slot resolvers: each turns one aspect of a sentence into a typed value.
//!
//! This module provides:
//! - Date resolution (relative phrases, explicit dates, chained offsets)
//! - Clock-time resolution with AM/PM and range ambiguity detection
//! - Attendee extraction against the directory
//! - Location/mode detection and meeting-link extraction
//! - Duration, recurrence, list-period, and title/description resolution
//!
//! Resolvers are pure functions over (sentence, now, directory); the same
//! inputs always produce the same outputs, and no resolver reads the wall
//! clock.

pub mod attendees;
pub mod date;
pub mod duration;
pub mod location;
pub mod period;
pub mod recurrence;
pub mod time;
pub mod title;

pub use attendees::AttendeeResolver;
pub use date::{DateOutcome, DateResolver};
pub use duration::DurationResolver;
pub use period::{PeriodKind, TimePeriod};
pub use time::{apply_meridiem, clock_on, has_past_anchor, PendingClock, TimeOutcome, TimeResolver};
pub use title::MeetingType;
