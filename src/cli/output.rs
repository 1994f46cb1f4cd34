//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use cadence::planner::PlanResponse;
use cadence::schedule::types::{Conflict, Event, ParsedEvent, Suggestion};
use chrono::{DateTime, Utc};

fn instant(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Print a parse result.
pub fn print_parsed(parsed: &ParsedEvent, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(parsed).unwrap());
    } else {
        println!("Summary:  {}", parsed.summary);
        if let Some(start) = parsed.start {
            println!("Start:    {}", instant(start));
        }
        if let Some(end) = parsed.end {
            println!("End:      {}", instant(end));
        }
        println!("Duration: {} minutes", parsed.duration_minutes);
        if let Some(location) = &parsed.location {
            println!("Location: {}", location);
        }
    }
}

/// Print a persisted event after scheduling.
pub fn print_scheduled(event: &Event, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(event).unwrap());
    } else {
        println!("Scheduled \"{}\"", event.summary);
        println!("  {} -> {}", instant(event.start), instant(event.end));
        println!("  id: {}", event.id);
    }
}

/// Print the conflicts that blocked a schedule request.
pub fn print_conflicts(conflicts: &[Conflict], suggestions: &[Suggestion], json: bool) {
    if json {
        let body = serde_json::json!({
            "hasConflict": true,
            "conflicts": conflicts,
            "suggestions": suggestions,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap());
    } else {
        println!("Conflicts with {} existing event(s):", conflicts.len());
        for conflict in conflicts {
            println!(
                "  [{}] \"{}\" {} -> {}",
                conflict.overlap_type,
                conflict.event.summary,
                instant(conflict.event.start),
                instant(conflict.event.end)
            );
        }
        if !suggestions.is_empty() {
            println!("\nFree windows nearby:");
            for suggestion in suggestions {
                println!(
                    "  {} -> {}  ({})",
                    instant(suggestion.start),
                    instant(suggestion.end),
                    suggestion.reason
                );
            }
        }
    }
}

/// Print a dry-run check result.
pub fn print_check(
    parsed: &ParsedEvent,
    conflicts: &[Conflict],
    suggestions: &[Suggestion],
    json: bool,
) {
    if json {
        let body = serde_json::json!({
            "parsed": parsed,
            "hasConflict": !conflicts.is_empty(),
            "conflicts": conflicts,
            "suggestions": suggestions,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap());
    } else {
        print_parsed(parsed, false);
        println!();
        if conflicts.is_empty() {
            println!("No conflicts.");
        } else {
            print_conflicts(conflicts, suggestions, false);
        }
    }
}

/// Print the stored events as a table.
pub fn print_events(events: &[Event], json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(events).unwrap());
        return;
    }

    if events.is_empty() {
        println!("No events stored.");
        return;
    }

    println!("{:<38} {:<18} {:<18} SUMMARY", "ID", "START", "END");
    println!("{}", "-".repeat(100));
    for event in events {
        println!(
            "{:<38} {:<18} {:<18} {}",
            event.id,
            instant(event.start),
            instant(event.end),
            event.summary
        );
    }
    println!("\nTotal: {} events", events.len());
}

/// Print a delete confirmation.
pub fn print_deleted(event_id: &str, json: bool) {
    if json {
        let body = serde_json::json!({
            "success": true,
            "message": format!("Event {} deleted", event_id),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap());
    } else {
        println!("Deleted event {}", event_id);
    }
}

/// Print a plan pipeline result.
pub fn print_plan(response: &PlanResponse, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(response).unwrap());
        return;
    }

    let plan = match &response.output {
        Some(plan) => plan,
        None => {
            println!(
                "Plan generation failed: {}",
                response.error.as_deref().unwrap_or("unknown error")
            );
            return;
        }
    };

    println!("{:<5} {:<7} {:<9} TASK", "DAY", "START", "MINUTES");
    println!("{}", "-".repeat(60));
    for item in &plan.weekly_plan {
        println!(
            "{:<5} {:<7} {:<9} {}",
            item.day,
            item.start_time,
            item.duration_minutes.unwrap_or(60),
            item.task_name
        );
    }

    if !plan.milestones.is_empty() {
        println!("\nMilestones:");
        for milestone in &plan.milestones {
            match &milestone.date {
                Some(date) => println!("  {} - {}", date, milestone.goal),
                None => println!("  {}", milestone.goal),
            }
        }
    }

    if let (Some(before), Some(after)) = (
        response.metadata.conflicts_before,
        response.metadata.conflicts_after,
    ) {
        if before > 0 {
            println!(
                "\nResolved {} of {} busy-time conflicts",
                before - after,
                before
            );
        }
    }
    println!("\nModel: {}", response.metadata.model_used);
}
