//! Plain-text rendering of backend records for the terminal.

use console::style;
use serde_json::Value;

use super::icons::{CLOCK, DONE, EMPTY, EXPIRED, LINKED, WORKING};
use super::progress::completion_bar;
use crate::models::{Call, CallStatus, MassProduction, Record};
use crate::progress::{SlotStatus, StageReport, completion_percentage};
use crate::timing::format_time;

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => "-",
    }
}

/// Render a scalar JSON value compactly; nested values as JSON text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One line per project: id, number, status, completion.
pub fn project_line(mp: &MassProduction) -> String {
    format!(
        "{:<26} {:<14} {:<12} {}",
        or_dash(mp.id.as_deref()),
        or_dash(mp.project_n.as_deref()),
        or_dash(mp.status.as_deref()),
        completion_bar(completion_percentage(mp))
    )
}

pub fn print_projects(projects: &[MassProduction], total: Option<u64>) {
    if projects.is_empty() {
        println!("No mass production projects found.");
        return;
    }
    println!(
        "{}",
        style(format!(
            "{:<26} {:<14} {:<12} {}",
            "ID", "PROJECT", "STATUS", "COMPLETION"
        ))
        .bold()
    );
    for mp in projects {
        println!("{}", project_line(mp));
    }
    println!();
    match total {
        Some(total) => println!("{} of {} project(s)", projects.len(), total),
        None => println!("{} project(s)", projects.len()),
    }
}

fn slot_icon(status: SlotStatus) -> String {
    match status {
        SlotStatus::Complete => DONE.to_string(),
        SlotStatus::InProgress => WORKING.to_string(),
        SlotStatus::Referenced => LINKED.to_string(),
        SlotStatus::Missing => EMPTY.to_string(),
    }
}

pub fn print_project(mp: &MassProduction) {
    let report = StageReport::for_project(mp);
    println!();
    println!(
        "{} {}",
        style("Project").bold().cyan(),
        or_dash(mp.project_n.as_deref())
    );
    println!("  id:              {}", or_dash(mp.id.as_deref()));
    println!("  status:          {}", or_dash(mp.status.as_deref()));
    println!(
        "  customer:        {}",
        mp.customer_id().as_deref().unwrap_or("-")
    );
    println!("  initial request: {}", or_dash(mp.initial_request.as_deref()));
    println!("  next review:     {}", or_dash(mp.next_review.as_deref()));
    println!("  closure date:    {}", or_dash(mp.closure_date.as_deref()));
    println!();
    println!("{}", style("Stages").bold());
    for slot in &report.slots {
        let detail = match (slot.status, slot.checklist) {
            (SlotStatus::InProgress, Some(pct)) => format!(" ({}% of checklist)", pct),
            (SlotStatus::Referenced, _) => format!(" (ref {})", or_dash(slot.id.as_deref())),
            _ => String::new(),
        };
        println!(
            "  {}{:<28} {}{}",
            slot_icon(slot.status),
            slot.label,
            style(slot.status.as_str()).dim(),
            detail
        );
    }
    println!();
    println!(
        "  {} {}/{} stages complete",
        completion_bar(report.percentage),
        report.completed,
        report.total
    );
    println!();
}

/// Countdown column: `M:SS` while pending, status text otherwise.
pub fn call_countdown(call: &Call) -> String {
    match &call.status {
        CallStatus::Pending => format!(
            "{}{} ({:.0}%)",
            CLOCK,
            format_time(Some(call.remaining_time as f64)),
            call.progress()
        ),
        CallStatus::Expired => format!("{}expired", EXPIRED),
        other => or_dash(Some(other.as_str())).to_string(),
    }
}

pub fn print_calls(calls: &[Call]) {
    if calls.is_empty() {
        println!("No calls found.");
        return;
    }
    println!(
        "{}",
        style(format!(
            "{:<26} {:<11} {:<26} {}",
            "ID", "STATUS", "CALL TIME", "REMAINING"
        ))
        .bold()
    );
    for call in calls {
        println!(
            "{:<26} {:<11} {:<26} {}",
            or_dash(call.id.as_deref()),
            or_dash(Some(call.status.as_str())),
            or_dash(call.call_time.as_deref()),
            call_countdown(call)
        );
    }
    println!();
    println!("{} call(s)", calls.len());
}

/// Generic record listing: id plus the first few scalar fields.
pub fn record_line(record: &Record) -> String {
    let summary: Vec<String> = record
        .as_map()
        .iter()
        .filter(|(key, value)| {
            !matches!(key.as_str(), "id" | "_id" | "__v")
                && !value.is_object()
                && !value.is_array()
        })
        .take(4)
        .map(|(key, value)| format!("{}={}", key, value_text(value)))
        .collect();
    format!(
        "{:<26} {}",
        record.id().as_deref().unwrap_or("-"),
        summary.join("  ")
    )
}

pub fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }
    for record in records {
        println!("{}", record_line(record));
    }
    println!();
    println!("{} record(s)", records.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(null)), "-");
        assert_eq!(value_text(&json!("MP-1")), "MP-1");
        assert_eq!(value_text(&json!(3)), "3");
        assert_eq!(value_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_project_line_includes_percentage() {
        let mp: MassProduction = serde_json::from_value(json!({
            "id": "mp1",
            "project_n": "P-100",
            "design": {"check": true}
        }))
        .unwrap();
        let line = project_line(&mp);
        assert!(line.starts_with("mp1"));
        assert!(line.contains("P-100"));
        assert!(line.ends_with(" 11%"));
    }

    #[test]
    fn test_call_countdown_by_status() {
        let mut call: Call = serde_json::from_value(json!({"status": "Pendiente"})).unwrap();
        call.remaining_time = 125;
        assert!(call_countdown(&call).contains("2:05"));

        call.status = CallStatus::Completed;
        assert_eq!(call_countdown(&call), "Realizada");
    }

    #[test]
    fn test_record_line_skips_nested_and_ids() {
        let record = Record::from_json(json!({
            "_id": "k9",
            "name": "Kick-off",
            "task": {"check": true},
            "tags": ["a"]
        }))
        .unwrap();
        let line = record_line(&record);
        assert!(line.starts_with("k9"));
        assert!(line.contains("name=Kick-off"));
        assert!(!line.contains("task"));
        assert!(!line.contains("tags"));
    }
}
