//! End-to-end clarification loop tests.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use confab::config::{Config, Directory, PastDatePolicy};
use confab::error::{ConfabError, SessionError};
use confab::meeting::{
    AmbiguityFlag, ClarificationSession, MeetingAction, Orchestrator, SessionState, SourceKind,
};
use confab::resolve::PeriodKind;

fn offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
}

/// Monday 2025-02-10, 10:00 local.
fn monday_morning() -> DateTime<FixedOffset> {
    offset().with_ymd_and_hms(2025, 2, 10, 10, 0, 0).unwrap()
}

/// Wednesday 2025-02-12, 09:00 local.
fn wednesday_morning() -> DateTime<FixedOffset> {
    offset().with_ymd_and_hms(2025, 2, 12, 9, 0, 0).unwrap()
}

fn sample_directory() -> Directory {
    Directory::from_json_str(
        r#"{
            "persons": [
                {"name": "John Doe", "email": "john.doe@example.com"},
                {"name": "Maya Chen", "email": "maya@example.com"},
                {"name": "Omar Diaz", "email": "omar@example.com"}
            ],
            "teams": [
                {
                    "name": "Finance Team",
                    "aliases": ["finance"],
                    "members": ["maya@example.com", "omar@example.com"]
                }
            ]
        }"#,
    )
    .expect("directory fixture")
}

fn orchestrator() -> Orchestrator {
    Orchestrator::new(Config::default(), sample_directory())
}

fn ask_policy_orchestrator() -> Orchestrator {
    let mut config = Config::default();
    config.parser.past_date_policy = PastDatePolicy::Ask;
    Orchestrator::new(config, sample_directory())
}

#[test]
fn test_bare_hour_question_and_pm_answer() {
    let orchestrator = orchestrator();
    let mut session = ClarificationSession::new(
        &orchestrator,
        "meeting at 6 with finance team",
        wednesday_morning(),
    );

    assert_eq!(session.state(), SessionState::AwaitingAnswer);
    let turn = session.turn().expect("turn");
    assert!(matches!(turn.flag, AmbiguityFlag::AmPmAmbiguous { hour: 6 }));
    assert_eq!(turn.candidate_answers, vec!["AM", "PM"]);

    // Attendees resolved up front; the answer only fills the clock in.
    assert_eq!(session.record().attendees.len(), 2);
    assert!(session
        .record()
        .attendees
        .iter()
        .all(|a| a.source == SourceKind::Team));

    let state = session.answer("PM").expect("answer");
    assert_eq!(state, SessionState::Resolved);

    let record = session.record();
    assert!(record.flags.is_empty());
    assert_eq!(
        record.start.expect("start").instant,
        offset().with_ymd_and_hms(2025, 2, 12, 18, 0, 0).unwrap()
    );
    assert!(record.is_actionable());
}

#[test]
fn test_bare_range_question_and_am_answer() {
    let orchestrator = orchestrator();
    let mut session = ClarificationSession::new(
        &orchestrator,
        "block between 9 and 11 tomorrow for interviews",
        monday_morning(),
    );

    let turn = session.turn().expect("turn");
    assert!(matches!(
        turn.flag,
        AmbiguityFlag::TimeRangeAmbiguous {
            start_hour: 9,
            end_hour: 11
        }
    ));

    session.answer("AM").expect("answer");
    let record = session.record();
    assert_eq!(
        record.start.expect("start").instant,
        offset().with_ymd_and_hms(2025, 2, 11, 9, 0, 0).unwrap()
    );
    assert_eq!(
        record.end.expect("end").instant,
        offset().with_ymd_and_hms(2025, 2, 11, 11, 0, 0).unwrap()
    );
    assert_eq!(record.duration_min, 120);
}

#[test]
fn test_past_date_question_accepts_relative_answer() {
    let orchestrator = ask_policy_orchestrator();
    let mut session = ClarificationSession::new(
        &orchestrator,
        "team sync on 3 feb 2025 at 5pm",
        monday_morning(),
    );

    let turn = session.turn().expect("turn");
    assert!(matches!(turn.flag, AmbiguityFlag::PastDate { .. }));
    assert!(turn.question.contains("in the past"));

    let state = session.answer("tomorrow").expect("answer");
    assert_eq!(state, SessionState::Resolved);
    assert_eq!(
        session.record().start.expect("start").instant,
        offset().with_ymd_and_hms(2025, 2, 11, 17, 0, 0).unwrap()
    );
}

#[test]
fn test_meal_conflict_after_option_answer() {
    let orchestrator = orchestrator();
    let mut session = ClarificationSession::new(
        &orchestrator,
        "meet John tomorrow, avoid lunch time",
        monday_morning(),
    );

    let turn = session.turn().expect("turn");
    assert!(matches!(turn.flag, AmbiguityFlag::MealTimeConflict { .. }));
    assert!(turn
        .candidate_answers
        .contains(&"After Lunch (2:00 PM)".to_string()));

    session.answer("After Lunch (2:00 PM)").expect("answer");
    assert_eq!(
        session.record().start.expect("start").instant,
        offset().with_ymd_and_hms(2025, 2, 11, 14, 0, 0).unwrap()
    );
}

#[test]
fn test_missing_period_question_and_answer() {
    let orchestrator = orchestrator();
    let mut session =
        ClarificationSession::new(&orchestrator, "list my meetings", monday_morning());

    let turn = session.turn().expect("turn");
    assert!(matches!(turn.flag, AmbiguityFlag::MissingTimePeriod));

    session.answer("tomorrow").expect("answer");
    let record = session.record();
    assert_eq!(record.action, MeetingAction::ListEvents);
    let period = record.time_period.as_ref().expect("period");
    assert_eq!(period.kind, PeriodKind::Tomorrow);
    assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 2, 11).unwrap());
    assert!(record.is_actionable());
}

#[test]
fn test_two_questions_resolve_in_sequence() {
    let orchestrator = ask_policy_orchestrator();
    let mut session =
        ClarificationSession::new(&orchestrator, "meeting on 3 feb 2025 at 6", monday_morning());

    assert!(matches!(
        session.turn().expect("turn").flag,
        AmbiguityFlag::PastDate { .. }
    ));

    let state = session.answer("on 25th feb").expect("first answer");
    assert_eq!(state, SessionState::AwaitingAnswer);
    assert!(matches!(
        session.turn().expect("turn").flag,
        AmbiguityFlag::AmPmAmbiguous { hour: 6 }
    ));

    let state = session.answer("pm").expect("second answer");
    assert_eq!(state, SessionState::Resolved);

    let record = session.record();
    assert_eq!(
        record.start.expect("start").instant,
        offset().with_ymd_and_hms(2025, 2, 25, 18, 0, 0).unwrap()
    );
    assert!(record.is_actionable());
}

#[test]
fn test_unhelpful_answer_reports_question() {
    let orchestrator = orchestrator();
    let mut session = ClarificationSession::new(
        &orchestrator,
        "meeting at 6 with finance team",
        wednesday_morning(),
    );

    let err = session.answer("whenever works").expect_err("should reject");
    match err {
        ConfabError::Session(SessionError::UnrecognizedAnswer { answer, question }) => {
            assert_eq!(answer, "whenever works");
            assert!(question.contains("AM or PM"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.state(), SessionState::AwaitingAnswer);
}
