//! Multi-turn clarification sessions.
//!
//! This module provides:
//! - [`ClarificationSession`]: wraps one parsed sentence and walks its
//!   ambiguity flags question by question, in the order they were raised
//! - [`SessionState`]: whether the session still owes the caller a question
//!
//! Answers merge directly into the draft record instead of being textually
//! substituted back into the sentence and re-parsed, so an answered AM/PM
//! question cannot disturb any other already-resolved slot.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::meeting::orchestrator::merge_provenance;
use crate::meeting::{
    meals, AmbiguityFlag, ClarificationTurn, Meal, MeetingRecord, MeetingRequest, Orchestrator,
    Provenance, ResolvedDateTime,
};
use crate::resolve::{apply_meridiem, clock_on, period, DateResolver, PendingClock, TimeResolver};

static MERIDIEM_ANSWER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(am|pm)\b").expect("Invalid regex"));

static BEFORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbefore\b").expect("Invalid regex"));

static AFTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bafter\b").expect("Invalid regex"));

// ============================================================================
// Session state
// ============================================================================

/// Where a session stands in its question/answer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// At least one flag is unresolved; [`ClarificationSession::turn`]
    /// yields the next question.
    AwaitingAnswer,
    /// Every flag is resolved; the record is final.
    Resolved,
}

// ============================================================================
// Clarification session
// ============================================================================

/// One sentence plus the question/answer loop that completes it.
///
/// The session parses eagerly on construction. Flags resolve strictly in
/// the order the orchestrator raised them; each call to [`answer`] targets
/// the first remaining flag only.
///
/// [`answer`]: ClarificationSession::answer
pub struct ClarificationSession<'a> {
    orchestrator: &'a Orchestrator,
    sentence: String,
    now: DateTime<FixedOffset>,
    record: MeetingRecord,
    pending_clock: Option<PendingClock>,
    base_date: NaiveDate,
    past_anchored: bool,
}

impl<'a> ClarificationSession<'a> {
    pub fn new(
        orchestrator: &'a Orchestrator,
        sentence: &str,
        now: DateTime<FixedOffset>,
    ) -> Self {
        let outcome = orchestrator.parse(sentence, now);
        Self {
            orchestrator,
            sentence: sentence.to_string(),
            now,
            record: outcome.record,
            pending_clock: outcome.pending_clock,
            base_date: outcome.base_date,
            past_anchored: outcome.past_anchored,
        }
    }

    /// Run one request: parse the sentence and, when the request carries a
    /// clarification answer, apply it to the pending question.
    pub fn submit(orchestrator: &'a Orchestrator, request: &MeetingRequest) -> Result<Self> {
        let mut session = Self::new(orchestrator, &request.sentence, request.now);
        if let Some(answer) = &request.answer {
            session.answer(answer)?;
        }
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        if self.record.flags.is_empty() {
            SessionState::Resolved
        } else {
            SessionState::AwaitingAnswer
        }
    }

    /// The next question, or `None` once resolved.
    pub fn turn(&self) -> Option<ClarificationTurn> {
        self.record
            .flags
            .first()
            .map(|flag| ClarificationTurn::new(self.sentence.clone(), flag.clone()))
    }

    /// The draft record: complete when [`state`] is `Resolved`, partial
    /// while flags remain.
    ///
    /// [`state`]: ClarificationSession::state
    pub fn record(&self) -> &MeetingRecord {
        &self.record
    }

    pub fn into_record(self) -> MeetingRecord {
        self.record
    }

    /// Merge one answer into the draft.
    ///
    /// An answer that does not resolve the pending question leaves the
    /// session unchanged and returns [`SessionError::UnrecognizedAnswer`],
    /// so the caller can re-prompt with the same turn.
    pub fn answer(&mut self, answer: &str) -> Result<SessionState> {
        let flag = match self.record.flags.first() {
            Some(flag) => flag.clone(),
            None => return Err(SessionError::AlreadyResolved.into()),
        };

        let merged = match &flag {
            AmbiguityFlag::AmPmAmbiguous { .. } | AmbiguityFlag::TimeRangeAmbiguous { .. } => {
                self.merge_clock_answer(answer)?
            }
            AmbiguityFlag::PastDate { .. } => self.merge_future_date(answer),
            AmbiguityFlag::MealTimeConflict { meals } => self.merge_meal_choice(answer, meals),
            AmbiguityFlag::MissingTimePeriod => self.merge_period(answer),
        };

        if !merged {
            return Err(SessionError::UnrecognizedAnswer {
                answer: answer.to_string(),
                question: flag.question(),
            }
            .into());
        }

        self.record.flags.remove(0);
        debug!(
            remaining = self.record.flags.len(),
            "clarification answer merged"
        );
        Ok(self.state())
    }

    // ========================================================================
    // Per-flag merges
    // ========================================================================

    /// AM/PM answers rebuild the held-back clock; a full replacement clock
    /// in the answer ("6:30 pm") beats the bare meridiem.
    fn merge_clock_answer(&mut self, answer: &str) -> Result<bool> {
        let pending = self
            .pending_clock
            .ok_or(SessionError::NoPendingQuestion)?;

        if answer.chars().any(|c| c.is_ascii_digit()) && self.merge_resolved_time(answer) {
            return Ok(true);
        }

        let Some(meridiem) = extract_meridiem(answer) else {
            return Ok(false);
        };

        let offset = *self.now.offset();
        match pending {
            PendingClock::Single { hour, minute } => {
                let h24 = apply_meridiem(hour, meridiem);
                let mut start =
                    clock_on(self.base_date, offset, i64::from(h24), i64::from(minute));
                if start <= self.now && !self.past_anchored {
                    start += Duration::days(1);
                }
                let end = start + Duration::minutes(self.record.duration_min);
                self.record.start = Some(ResolvedDateTime::explicit(start));
                self.record.end = Some(ResolvedDateTime::explicit(end));
            }
            PendingClock::Range {
                start_hour,
                start_minute,
                end_hour,
                end_minute,
            } => {
                let s24 = apply_meridiem(start_hour, meridiem);
                // One meridiem covers both sides; an end at or before the
                // start means it crossed into the other half.
                let mut e24 = i64::from(apply_meridiem(end_hour, meridiem));
                if e24 <= i64::from(s24) {
                    e24 += 12;
                }
                let mut start =
                    clock_on(self.base_date, offset, i64::from(s24), i64::from(start_minute));
                let mut end = clock_on(self.base_date, offset, e24, i64::from(end_minute));
                if end <= self.now && !self.past_anchored {
                    start += Duration::days(1);
                    end += Duration::days(1);
                }
                self.record.duration_min = (end - start).num_minutes();
                self.record.start = Some(ResolvedDateTime::explicit(start));
                self.record.end = Some(ResolvedDateTime::explicit(end));
            }
        }
        self.pending_clock = None;
        Ok(true)
    }

    /// An unambiguous explicit clock in the answer settles the question
    /// directly.
    fn merge_resolved_time(&mut self, answer: &str) -> bool {
        let parser = &self.orchestrator.config().parser;
        let outcome = TimeResolver::new(parser).resolve(answer, self.base_date, self.now);
        let Some(start) = outcome.start else {
            return false;
        };
        if outcome.flag.is_some() || outcome.provenance != Provenance::Explicit {
            return false;
        }
        let end = match outcome.end {
            Some(end) => {
                self.record.duration_min = (end - start).num_minutes();
                end
            }
            None => start + Duration::minutes(self.record.duration_min),
        };
        self.record.start = Some(ResolvedDateTime::explicit(start));
        self.record.end = Some(ResolvedDateTime::explicit(end));
        self.pending_clock = None;
        true
    }

    /// The answer must name a date that is not in the past; clocks from the
    /// original sentence re-resolve onto it.
    fn merge_future_date(&mut self, answer: &str) -> bool {
        let today = self.now.date_naive();
        let outcome = DateResolver::new().resolve(answer, today);
        let Some(date) = outcome.date else {
            return false;
        };
        if outcome.is_past {
            return false;
        }
        self.base_date = date;

        let parser = &self.orchestrator.config().parser;
        let time = TimeResolver::new(parser).resolve(&self.sentence, date, self.now);
        self.pending_clock = time.pending;
        if let Some(start) = time.start {
            let end = match time.end {
                Some(end) => {
                    self.record.duration_min = (end - start).num_minutes();
                    end
                }
                None => start + Duration::minutes(self.record.duration_min),
            };
            let provenance = merge_provenance(outcome.provenance, time.provenance);
            self.record.start = Some(ResolvedDateTime::new(start, provenance));
            self.record.end = Some(ResolvedDateTime::new(end, provenance));
        }
        true
    }

    /// "Before Lunch (11:30 AM)" style options, or any concrete time.
    fn merge_meal_choice(&mut self, answer: &str, meals_to_avoid: &[Meal]) -> bool {
        let lowered = answer.to_lowercase();
        let named_meal = meals::find_meal(&lowered);
        let has_digits = lowered.chars().any(|c| c.is_ascii_digit());
        let before = BEFORE_PATTERN.is_match(&lowered);
        let after = AFTER_PATTERN.is_match(&lowered);

        // "after 3pm" is a time answer, not an option pick.
        if (before || after) && (named_meal.is_some() || !has_digits) {
            let meal = match named_meal.or_else(|| meals_to_avoid.first().copied()) {
                Some(meal) => meal,
                None => return false,
            };
            let (hour, minute) = meals::option_clock(meal, before);
            let mut start = clock_on(self.base_date, *self.now.offset(), hour, minute);
            if start <= self.now && !self.past_anchored {
                start += Duration::days(1);
            }
            let end = start + Duration::minutes(self.record.duration_min);
            self.record.start = Some(ResolvedDateTime::explicit(start));
            self.record.end = Some(ResolvedDateTime::explicit(end));
            return true;
        }

        if self.merge_resolved_time(answer) {
            // The replacement time still has to clear the avoided windows.
            if let Some(start) = self.record.start {
                let adjusted = meals::adjust(start.instant, meals_to_avoid);
                if adjusted != start.instant {
                    self.record.start = Some(ResolvedDateTime::explicit(adjusted));
                    self.record.end = Some(ResolvedDateTime::explicit(
                        adjusted + Duration::minutes(self.record.duration_min),
                    ));
                }
            }
            return true;
        }
        false
    }

    fn merge_period(&mut self, answer: &str) -> bool {
        match period::resolve(answer, self.now.date_naive()) {
            Some(found) => {
                self.record.time_period = Some(found);
                true
            }
            None => false,
        }
    }
}

/// "PM", "p.m.", "6 pm" all carry a meridiem; bare text does not.
fn extract_meridiem(answer: &str) -> Option<&'static str> {
    let cleaned = answer.to_lowercase().replace('.', "");
    let caps = MERIDIEM_ANSWER_PATTERN.captures(&cleaned)?;
    if &caps[1] == "am" {
        Some("am")
    } else {
        Some("pm")
    }
}
