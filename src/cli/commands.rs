//! CLI command implementations.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use confab::{ClarificationSession, Config, Directory, Orchestrator, SessionState};

use super::output;

/// Load the directory when a path is configured, otherwise run with an
/// empty one.
fn build_orchestrator(config: Config) -> Result<Orchestrator> {
    let directory = match config.directory_path() {
        Some(path) => Directory::from_file(&path)
            .with_context(|| format!("loading directory {}", path.display()))?,
        None => Directory::default(),
    };
    Ok(Orchestrator::new(config, directory))
}

/// The reference instant: `--now` if given, else the wall clock, always in
/// the configured offset.
fn resolve_now(config: &Config, arg: Option<&str>) -> Result<DateTime<FixedOffset>> {
    let offset = config.timezone();
    let Some(text) = arg else {
        return Ok(Utc::now().with_timezone(&offset));
    };
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&offset));
    }
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            if let Some(instant) = offset.from_local_datetime(&naive).single() {
                return Ok(instant);
            }
        }
    }
    bail!("'{text}' is not an RFC 3339 instant or \"YYYY-MM-DD HH:MM\"");
}

/// Run the parse command, feeding any pre-supplied answers in order.
pub fn run_parse(
    config: Config,
    sentence: &str,
    now_arg: Option<&str>,
    answers: &[String],
    json: bool,
) -> Result<()> {
    let now = resolve_now(&config, now_arg)?;
    let orchestrator = build_orchestrator(config)?;
    let mut session = ClarificationSession::new(&orchestrator, sentence, now);

    for answer in answers {
        if session.state() == SessionState::Resolved {
            bail!("answer '{answer}' supplied but no question is pending");
        }
        session.answer(answer)?;
    }

    output::print_session(&session, json);
    Ok(())
}

/// Run the clarify command: prompt on stdin until the record resolves.
pub fn run_clarify(
    config: Config,
    sentence: &str,
    now_arg: Option<&str>,
    json: bool,
) -> Result<()> {
    let now = resolve_now(&config, now_arg)?;
    let orchestrator = build_orchestrator(config)?;
    let mut session = ClarificationSession::new(&orchestrator, sentence, now);

    while let Some(turn) = session.turn() {
        eprintln!("{}", turn.question);
        if !turn.candidate_answers.is_empty() {
            eprintln!("  [{}]", turn.candidate_answers.join(" / "));
        }
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            bail!("clarification aborted: stdin closed");
        }
        let answer = line.trim();
        if answer.is_empty() {
            continue;
        }
        if let Err(err) = session.answer(answer) {
            eprintln!("{err}");
        }
    }

    output::print_session(&session, json);
    Ok(())
}

/// Run the directory command.
pub fn run_directory(config: Config, json: bool) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    output::print_directory(orchestrator.directory(), json);
    Ok(())
}
