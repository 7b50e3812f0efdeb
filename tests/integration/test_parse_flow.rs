//! End-to-end single-shot parse tests.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use confab::config::{Config, Directory};
use confab::meeting::{
    LinkOrigin, MeetingAction, MeetingMode, Orchestrator, Provenance, SourceKind,
};
use confab::resolve::PeriodKind;

fn offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
}

/// Monday 2025-02-10, 10:00 local.
fn monday_morning() -> DateTime<FixedOffset> {
    offset().with_ymd_and_hms(2025, 2, 10, 10, 0, 0).unwrap()
}

fn sample_directory() -> Directory {
    Directory::from_json_str(
        r#"{
            "persons": [
                {"name": "John Doe", "email": "john.doe@example.com"},
                {"name": "Jane Smith", "email": "jane.smith@example.com"},
                {"name": "Priya Patel", "email": "priya@example.com"},
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

#[test]
fn test_create_with_relative_date_and_explicit_time() {
    let outcome = orchestrator().parse(
        "create a meeting with John tomorrow at 6pm",
        monday_morning(),
    );
    let record = outcome.record;

    assert_eq!(record.action, MeetingAction::Create);
    assert!(record.flags.is_empty());

    assert_eq!(record.attendees.len(), 1);
    assert_eq!(record.attendees[0].email, "john.doe@example.com");
    assert_eq!(record.attendees[0].display_name, "John Doe");

    let start = record.start.expect("start");
    let end = record.end.expect("end");
    assert_eq!(
        start.instant,
        offset().with_ymd_and_hms(2025, 2, 11, 18, 0, 0).unwrap()
    );
    assert_eq!(
        end.instant,
        offset().with_ymd_and_hms(2025, 2, 11, 18, 30, 0).unwrap()
    );
    assert_eq!(record.duration_min, 30);
    assert_eq!(record.title, "Meeting with John Doe");
    assert!(record.is_actionable());
}

#[test]
fn test_day_month_is_not_misread_as_bare_day() {
    // Early January: "23rd feb" must land in February, not resolve as a
    // bare day-of-month in January.
    let now = offset().with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
    let outcome = orchestrator().parse("call with Bob on 23rd feb", now);
    let record = outcome.record;

    assert!(record.flags.is_empty());
    let start = record.start.expect("start");
    assert_eq!(
        start.instant.date_naive(),
        NaiveDate::from_ymd_opt(2025, 2, 23).unwrap()
    );
    // No clock in the sentence: default hour, explicit date wins provenance.
    assert_eq!(start.instant.time().format("%H:%M").to_string(), "09:00");
    assert_eq!(start.provenance, Provenance::Explicit);

    assert_eq!(record.attendees.len(), 1);
    assert_eq!(record.attendees[0].email, "bob@example.com");
    assert_eq!(record.attendees[0].source, SourceKind::Unresolved);
}

#[test]
fn test_cancel_suppresses_title_but_keeps_attendees() {
    let outcome = orchestrator().parse("cancel the meeting with John", monday_morning());
    let record = outcome.record;

    assert_eq!(record.action, MeetingAction::Cancel);
    assert_eq!(record.title, "");
    assert_eq!(record.attendees.len(), 1);
    assert_eq!(record.attendees[0].email, "john.doe@example.com");
}

#[test]
fn test_attendee_list_order_and_dedup() {
    let outcome = orchestrator().parse(
        "sync with John, Jane and Bob tomorrow at 10am",
        monday_morning(),
    );
    let emails: Vec<&str> = outcome
        .record
        .attendees
        .iter()
        .map(|a| a.email.as_str())
        .collect();
    assert_eq!(
        emails,
        vec![
            "john.doe@example.com",
            "jane.smith@example.com",
            "bob@example.com"
        ]
    );
}

#[test]
fn test_literal_email_resolves_before_names() {
    let outcome = orchestrator().parse(
        "meeting with priya@example.com and Bob tomorrow at 11am",
        monday_morning(),
    );
    let record = outcome.record;

    assert_eq!(record.attendees.len(), 2);
    assert_eq!(record.attendees[0].email, "priya@example.com");
    assert_eq!(record.attendees[0].display_name, "Priya Patel");
    assert_eq!(record.attendees[0].source, SourceKind::Person);
    assert_eq!(record.attendees[1].email, "bob@example.com");
}

#[test]
fn test_team_phrase_expands_to_members() {
    let outcome = orchestrator().parse(
        "schedule a gmeet with finance team tomorrow at 3pm",
        monday_morning(),
    );
    let record = outcome.record;

    assert_eq!(record.attendees.len(), 2);
    assert!(record
        .attendees
        .iter()
        .all(|a| a.source == SourceKind::Team));
    assert_eq!(record.attendees[0].email, "maya@example.com");
    assert_eq!(record.attendees[0].display_name, "Maya Chen");
    assert_eq!(record.attendees[1].email, "omar@example.com");

    assert_eq!(record.location.mode, MeetingMode::Online);
    assert_eq!(record.location.link_origin, LinkOrigin::AutoGenerate);
}

#[test]
fn test_offline_venue_display_name() {
    let outcome = orchestrator().parse(
        "meet John tomorrow at 5pm in conference room B",
        monday_morning(),
    );
    let location = outcome.record.location;

    assert_eq!(location.mode, MeetingMode::Offline);
    assert_eq!(location.location_text, "Conference Room B");
    assert_eq!(location.meeting_link, None);
    assert_eq!(location.link_origin, LinkOrigin::Provided);
}

#[test]
fn test_provided_meeting_link_survives_verbatim() {
    let outcome = orchestrator().parse(
        "meeting with Jane tomorrow at 2pm on https://meet.google.com/abc-defg-hij",
        monday_morning(),
    );
    let location = outcome.record.location;

    assert_eq!(location.mode, MeetingMode::Online);
    assert_eq!(
        location.meeting_link.as_deref(),
        Some("https://meet.google.com/abc-defg-hij")
    );
    assert_eq!(location.link_origin, LinkOrigin::Provided);
}

#[test]
fn test_recurrence_maps_to_rrule() {
    let outcome = orchestrator().parse(
        "set up a daily standup with the team at 9:30am",
        monday_morning(),
    );
    let record = outcome.record;

    assert_eq!(record.recurrence, vec!["RRULE:FREQ=DAILY"]);
    // "the team" names nobody in the directory and is all exclusion words.
    assert!(record.attendees.is_empty());
}

#[test]
fn test_duration_phrase_sets_interval() {
    let outcome = orchestrator().parse(
        "meet Jane tomorrow at 4pm for 90 minutes",
        monday_morning(),
    );
    let record = outcome.record;

    assert_eq!(record.duration_min, 90);
    let start = record.start.expect("start");
    let end = record.end.expect("end");
    assert_eq!((end.instant - start.instant).num_minutes(), 90);
}

#[test]
fn test_meal_avoidance_shifts_explicit_time() {
    let outcome = orchestrator().parse(
        "book a meeting with John tomorrow at 1pm, avoid lunch",
        monday_morning(),
    );
    let record = outcome.record;

    assert!(record.flags.is_empty());
    assert_eq!(
        record.start.expect("start").instant,
        offset().with_ymd_and_hms(2025, 2, 11, 14, 15, 0).unwrap()
    );
}

#[test]
fn test_meal_avoidance_shifts_half_hour_clock() {
    let outcome = orchestrator().parse(
        "meeting with John tomorrow at 12:30 pm, avoid lunch",
        monday_morning(),
    );
    let record = outcome.record;

    // 12:30 sits inside the lunch window; the slot lands just past it.
    assert!(record.flags.is_empty());
    assert_eq!(
        record.start.expect("start").instant,
        offset().with_ymd_and_hms(2025, 2, 11, 14, 15, 0).unwrap()
    );
    assert_eq!(
        record.end.expect("end").instant,
        offset().with_ymd_and_hms(2025, 2, 11, 14, 45, 0).unwrap()
    );
}

#[test]
fn test_update_keeps_title_slot_empty() {
    let outcome = orchestrator().parse(
        "reschedule my meeting with Jane to 4pm tomorrow",
        monday_morning(),
    );
    let record = outcome.record;

    assert_eq!(record.action, MeetingAction::Update);
    assert_eq!(record.title, "");
    assert_eq!(record.attendees[0].email, "jane.smith@example.com");
    assert_eq!(
        record.start.expect("start").instant,
        offset().with_ymd_and_hms(2025, 2, 11, 16, 0, 0).unwrap()
    );
}

#[test]
fn test_list_request_resolves_next_week_bounds() {
    let outcome = orchestrator().parse("show my meetings for next week", monday_morning());
    let record = outcome.record;

    assert_eq!(record.action, MeetingAction::ListEvents);
    let period = record.time_period.expect("period");
    assert_eq!(period.kind, PeriodKind::NextWeek);
    assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 2, 17).unwrap());
    assert_eq!(period.end, Some(NaiveDate::from_ymd_opt(2025, 2, 23).unwrap()));
}

#[test]
fn test_strict_lookup_drops_unknown_names() {
    let mut config = Config::default();
    config.parser.strict_directory_lookup = true;
    let orchestrator = Orchestrator::new(config, sample_directory());

    let outcome = orchestrator.parse("meeting with Zorro tomorrow at 2pm", monday_morning());
    assert!(outcome.record.attendees.is_empty());
}

#[test]
fn test_config_toml_drives_defaults() {
    let config = Config::from_str(
        r#"
        [timezone]
        utc_offset = "+02:00"

        [parser]
        default_duration_min = 45
        placeholder_domain = "corp.io"
        "#,
    )
    .expect("config");
    let tz = config.timezone();
    let now = tz.with_ymd_and_hms(2025, 2, 10, 10, 0, 0).unwrap();
    let orchestrator = Orchestrator::new(config, Directory::default());

    let outcome = orchestrator.parse("meet Bob tomorrow at 2pm", now);
    let record = outcome.record;

    assert_eq!(record.attendees[0].email, "bob@corp.io");
    let start = record.start.expect("start");
    let end = record.end.expect("end");
    assert_eq!((end.instant - start.instant).num_minutes(), 45);
    assert_eq!(start.instant.offset().local_minus_utc(), 2 * 3600);
}

#[test]
fn test_description_extracted_from_purpose_clause() {
    let outcome = orchestrator().parse(
        "create a meeting with John tomorrow at 6pm to discuss the quarterly roadmap",
        monday_morning(),
    );
    let record = outcome.record;

    assert_eq!(record.description, "The quarterly roadmap");
    assert!(!record.title.is_empty());
}
