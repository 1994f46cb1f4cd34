//! CLI command handlers.
//!
//! Each handler builds a scheduler from configuration, runs one operation
//! against it and prints the result.

use anyhow::{bail, Context, Result};
use cadence::planner::{Chronotype, UserProfile};
use cadence::schedule::types::Event;
use cadence::{Config, ScheduleOutcome, Scheduler};
use chrono::{DateTime, Utc};

use super::output;
use crate::EventsCommand;

/// Parse an RFC 3339 instant from the command line.
fn parse_instant(raw: &str, what: &str) -> Result<DateTime<Utc>> {
    let instant = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid {} instant: {}", what, raw))?
        .with_timezone(&Utc);
    Ok(instant)
}

fn parse_reference(reference: Option<String>) -> Result<Option<DateTime<Utc>>> {
    reference
        .map(|raw| parse_instant(&raw, "reference"))
        .transpose()
}

/// Run the parse command.
pub async fn run_parse(
    config: Config,
    text: String,
    reference: Option<String>,
    json: bool,
) -> Result<()> {
    let scheduler = Scheduler::new(config)?;
    let parsed = match parse_reference(reference)? {
        Some(instant) => scheduler.parse_at(&text, instant),
        None => scheduler.parse(&text),
    };
    output::print_parsed(&parsed, json);
    Ok(())
}

/// Run the schedule command.
pub async fn run_schedule(
    config: Config,
    text: String,
    reference: Option<String>,
    json: bool,
) -> Result<()> {
    let scheduler = Scheduler::new(config)?;
    let outcome = match parse_reference(reference)? {
        Some(instant) => scheduler.schedule_text_at(&text, instant).await?,
        None => scheduler.schedule_text(&text).await?,
    };

    match outcome {
        ScheduleOutcome::Scheduled(event) => output::print_scheduled(&event, json),
        ScheduleOutcome::Conflicted {
            report,
            suggestions,
            ..
        } => output::print_conflicts(&report.conflicts, &suggestions, json),
    }
    Ok(())
}

/// Run the check command.
pub async fn run_check(
    config: Config,
    text: String,
    reference: Option<String>,
    json: bool,
) -> Result<()> {
    let scheduler = Scheduler::new(config)?;
    let check = match parse_reference(reference)? {
        Some(instant) => scheduler.check_text_at(&text, instant).await?,
        None => scheduler.check_text(&text).await?,
    };
    output::print_check(&check.parsed, &check.report.conflicts, &check.suggestions, json);
    Ok(())
}

/// Run an events subcommand.
pub async fn run_events(config: Config, action: EventsCommand, json: bool) -> Result<()> {
    let scheduler = Scheduler::new(config)?;

    match action {
        EventsCommand::List => {
            let events = scheduler.list_events().await?;
            output::print_events(&events, json);
        }
        EventsCommand::Add {
            summary,
            start,
            end,
            location,
        } => {
            let start = parse_instant(&start, "start")?;
            let end = parse_instant(&end, "end")?;
            let mut event = Event::new(summary, start, end);
            event.location = location;
            let created = scheduler.add_event(event).await?;
            output::print_scheduled(&created, json);
        }
        EventsCommand::Delete { id } => {
            scheduler.delete_event(&id).await?;
            output::print_deleted(&id, json);
        }
    }
    Ok(())
}

/// Run the plan command.
pub async fn run_plan(
    config: Config,
    goal: String,
    chronotype: String,
    json: bool,
) -> Result<()> {
    let chronotype = match chronotype.to_lowercase().as_str() {
        "morning" => Chronotype::Morning,
        "evening" => Chronotype::Evening,
        "neutral" => Chronotype::Neutral,
        other => bail!("Unknown chronotype: {} (expected morning, evening or neutral)", other),
    };

    let scheduler = Scheduler::new(config)?;
    if !scheduler.can_plan() {
        bail!("No plan generator configured; set planner.command in the config file");
    }

    let profile = UserProfile {
        chronotype,
        ..UserProfile::default()
    };
    let response = scheduler.plan(&goal, &profile, None).await?;
    output::print_plan(&response, json);
    Ok(())
}
