//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable
//! text.

use confab::{ClarificationSession, Directory, MeetingMode, SourceKind};

/// Print the session's record, plus the pending question when unresolved.
pub fn print_session(session: &ClarificationSession<'_>, json: bool) {
    if json {
        let body = serde_json::json!({
            "record": session.record(),
            "pending": session.turn(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap());
        return;
    }

    let record = session.record();
    println!("Action: {}", record.action);
    if !record.title.is_empty() {
        println!("Title: {}", record.title);
    }
    if !record.description.is_empty() {
        println!("Description: {}", record.description);
    }
    for attendee in &record.attendees {
        let marker = match attendee.source {
            SourceKind::Person => "",
            SourceKind::Team => " (team)",
            SourceKind::Unresolved => " (unresolved)",
        };
        println!("Attendee: {} <{}>{}", attendee.display_name, attendee.email, marker);
    }
    if let Some(start) = &record.start {
        println!("Start: {}", start);
    }
    if let Some(end) = &record.end {
        println!("End: {}", end);
    }
    println!("Duration: {} min", record.duration_min);
    match record.location.mode {
        MeetingMode::Online => match &record.location.meeting_link {
            Some(link) => println!("Location: Online ({link})"),
            None => println!("Location: Online (link to be generated)"),
        },
        MeetingMode::Offline => println!("Location: {}", record.location.location_text),
    }
    if !record.recurrence.is_empty() {
        println!("Recurrence: {}", record.recurrence.join("; "));
    }
    if let Some(period) = &record.time_period {
        match period.end {
            Some(end) => println!("Period: {} to {}", period.start, end),
            None => println!("Period: {}", period.start),
        }
    }

    if let Some(turn) = session.turn() {
        println!();
        println!("? {}", turn.question);
        if !turn.candidate_answers.is_empty() {
            println!("  Options: {}", turn.candidate_answers.join(", "));
        }
    } else if !record.is_actionable() {
        println!();
        println!("Record is incomplete.");
    }
}

/// Print the loaded attendee directory.
pub fn print_directory(directory: &Directory, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(directory).unwrap());
        return;
    }

    println!("{} persons", directory.persons.len());
    for person in &directory.persons {
        println!("  {} <{}>", person.name, person.email);
    }
    println!("{} teams", directory.teams.len());
    for team in &directory.teams {
        println!("  {} ({} members)", team.name, team.members.len());
    }
}
