//! Single-sentence orchestration: classify the intent, run every slot
//! resolver, and compose one [`MeetingRecord`].
//!
//! This module provides:
//! - [`Orchestrator`]: owns the configuration, directory snapshot, and
//!   classifier; `parse` is its one entry point
//! - [`ParseOutcome`]: the record plus the resolution context a
//!   clarification session needs to merge an answer later
//!
//! `parse` never performs I/O. Everything is a pure function of the
//! sentence, the injected `now`, and the loaded directory, so the same
//! request always produces the same record.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use tracing::{debug, info};

use crate::config::{Config, Directory, ExclusionWords, PastDatePolicy};
use crate::intent::IntentClassifier;
use crate::meeting::meals;
use crate::meeting::{AmbiguityFlag, MeetingAction, MeetingRecord, Provenance, ResolvedDateTime};
use crate::resolve::{
    location, period, recurrence, time, title, AttendeeResolver, DateResolver, DurationResolver,
    PendingClock, TimeResolver,
};

// ============================================================================
// Parse outcome
// ============================================================================

/// A parsed sentence plus the context needed to merge a clarification
/// answer without re-parsing from scratch.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub record: MeetingRecord,
    /// Clock digits held back behind an AM/PM or range flag.
    pub pending_clock: Option<PendingClock>,
    /// The date the time resolver anchored clocks to.
    pub base_date: NaiveDate,
    /// The sentence pinned the day ("today", "yesterday"); resolved
    /// answers must not roll forward past `now`.
    pub past_anchored: bool,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Turns one free-text sentence into a structured meeting record.
pub struct Orchestrator {
    config: Config,
    directory: Directory,
    exclusions: ExclusionWords,
    classifier: IntentClassifier,
}

impl Orchestrator {
    pub fn new(config: Config, directory: Directory) -> Self {
        let exclusions = ExclusionWords::with_extras(&config.directory.extra_exclusion_words);
        Self {
            config,
            directory,
            exclusions,
            classifier: IntentClassifier::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Parse `sentence` against the injected clock.
    ///
    /// The returned record carries an [`AmbiguityFlag`] for every question
    /// the sentence left open; callers that want the follow-up loop wrap
    /// this in a `ClarificationSession` instead of calling `parse`
    /// directly.
    pub fn parse(&self, sentence: &str, now: DateTime<FixedOffset>) -> ParseOutcome {
        let classification = self.classifier.classify(sentence);
        let action = classification.action;
        debug!(
            %action,
            confidence = classification.confidence,
            signals = ?classification.signals,
            "classified sentence"
        );

        let today = now.date_naive();
        let mut record = MeetingRecord::new(action);

        if action == MeetingAction::ListEvents {
            return self.parse_list(sentence, today, record);
        }

        // ---------- Date, under the configured past-date policy ----------
        let date_outcome = DateResolver::new().resolve(sentence, today);
        let mut base_date = date_outcome.date.unwrap_or(today);
        let mut auto_corrected = false;
        if date_outcome.is_past {
            match self.config.parser.past_date_policy {
                PastDatePolicy::Ask => {
                    record
                        .flags
                        .push(AmbiguityFlag::PastDate { resolved_date: base_date });
                }
                PastDatePolicy::AutoCorrect => {
                    base_date = today + Duration::days(1);
                    auto_corrected = true;
                    debug!(%base_date, "auto-corrected past date to tomorrow");
                }
            }
        }

        // ---------- Time onto the base date ----------
        let parser = &self.config.parser;
        let time_outcome = TimeResolver::new(parser).resolve(sentence, base_date, now);
        if let Some(flag) = time_outcome.flag.clone() {
            record.flags.push(flag);
        }

        record.duration_min = DurationResolver::new(parser).resolve(sentence);

        // An auto-corrected date is a system guess no matter how the
        // clock was phrased.
        let provenance = if auto_corrected {
            Provenance::Default
        } else {
            merge_provenance(date_outcome.provenance, time_outcome.provenance)
        };

        if let Some(start) = time_outcome.start {
            let end = match time_outcome.end {
                Some(end) => {
                    record.duration_min = (end - start).num_minutes();
                    end
                }
                None => start + Duration::minutes(record.duration_min),
            };
            record.start = Some(ResolvedDateTime::new(start, provenance));
            record.end = Some(ResolvedDateTime::new(end, provenance));
        }

        // ---------- Meal avoidance ----------
        // An explicit unflagged clock gets adjusted silently; anything
        // vaguer becomes a question.
        let avoided = meals::detect_avoidance(sentence);
        if !avoided.is_empty() {
            let concrete =
                time_outcome.flag.is_none() && time_outcome.provenance == Provenance::Explicit;
            if !concrete {
                record
                    .flags
                    .push(AmbiguityFlag::MealTimeConflict { meals: avoided });
            } else if let Some(start) = record.start {
                let adjusted = meals::adjust(start.instant, &avoided);
                if adjusted != start.instant {
                    debug!(%adjusted, "moved start out of an avoided meal window");
                    record.start = Some(ResolvedDateTime::new(adjusted, provenance));
                    record.end = Some(ResolvedDateTime::new(
                        adjusted + Duration::minutes(record.duration_min),
                        provenance,
                    ));
                }
            }
        }

        // ---------- Remaining slots ----------
        let attendee_resolver = AttendeeResolver::new(&self.directory, &self.exclusions, parser);
        record.attendees = attendee_resolver.resolve(sentence);
        record.location = location::resolve(sentence);
        record.recurrence = recurrence::resolve(sentence);
        record.title = title::resolve_title(sentence, action, &record.attendees);
        record.description = title::resolve_description(sentence);

        info!(
            %action,
            attendees = record.attendees.len(),
            flags = record.flags.len(),
            "parsed sentence"
        );

        ParseOutcome {
            record,
            pending_clock: time_outcome.pending,
            base_date,
            past_anchored: time::has_past_anchor(sentence),
        }
    }

    /// List requests resolve a period and nothing else.
    fn parse_list(&self, sentence: &str, today: NaiveDate, mut record: MeetingRecord) -> ParseOutcome {
        match period::resolve(sentence, today) {
            Some(found) => {
                debug!(kind = ?found.kind, "resolved list period");
                record.time_period = Some(found);
            }
            None => record.flags.push(AmbiguityFlag::MissingTimePeriod),
        }
        ParseOutcome {
            record,
            pending_clock: None,
            base_date: today,
            past_anchored: false,
        }
    }
}

/// The more specific source wins when a date and a clock disagree on
/// where the instant came from.
pub(crate) fn merge_provenance(date: Provenance, time: Provenance) -> Provenance {
    fn rank(p: Provenance) -> u8 {
        match p {
            Provenance::Explicit => 2,
            Provenance::Relative => 1,
            Provenance::Default => 0,
        }
    }
    if rank(time) >= rank(date) {
        time
    } else {
        date
    }
}
