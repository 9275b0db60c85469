use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::Result;
use crate::model::{OptimizedRoster, UnassignedReason};
use crate::schedule::{SlotCoverage, SlotModel};

fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

/// Formats a date with its weekday, e.g. `2024-03-05 (火)`
pub fn format_date(date: NaiveDate) -> String {
    format!("{} ({})", date, weekday_label(date))
}

/// Joins slot labels for display; an empty list shows as `-`
pub fn format_slot_list(slots: &[String]) -> String {
    if slots.is_empty() {
        "-".to_string()
    } else {
        slots.join(", ")
    }
}

/// Prints where each slot may move when it is full, in configured order
pub fn print_substitutions(slots: &SlotModel) {
    let map = slots.substitution_map();
    println!("\n=== Substitutions ===");
    for slot in &slots.order {
        let alternatives = map.get(slot).map(Vec::as_slice).unwrap_or(&[]);
        println!("  {:<6} -> {}", slot, format_slot_list(alternatives));
    }
}

/// Prints the roster date by date, followed by dropped requests
pub fn print_roster(roster: &OptimizedRoster) {
    println!("\n=== Roster ===");
    println!("Dates scheduled: {}", roster.days.len());

    for (date, day) in &roster.days {
        println!("\n{}", format_date(*date));
        for (staff, slots) in day {
            println!("  {:<12} {}", staff, format_slot_list(slots));
        }
        if let Some(custom) = roster.custom.get(date) {
            for (staff, labels) in custom {
                println!("  {:<12} {} (custom)", staff, format_slot_list(labels));
            }
        }
    }

    if !roster.unassigned.is_empty() {
        println!("\nUnassigned requests ({}):", roster.unassigned.len());
        for request in &roster.unassigned {
            let slot = request.slot.as_deref().unwrap_or("all");
            match &request.reason {
                UnassignedReason::SingleAssignmentTaken { selected } => println!(
                    "  - {} {} [{}]: {} already scheduled",
                    request.date, request.staff, slot, selected
                ),
                UnassignedReason::NoCapacity => println!(
                    "  - {} {} [{}]: no slot with room",
                    request.date, request.staff, slot
                ),
            }
        }
    }
}

/// Prints one date's coverage report, one line per slot and role
pub fn print_coverage(date: NaiveDate, report: &[SlotCoverage]) {
    println!("\n=== Coverage {} ===", format_date(date));
    for slot in report {
        for (role, coverage) in &slot.roles {
            let mark = if coverage.satisfied { "ok" } else { "SHORT" };
            println!(
                "  {:<6} {:<10} {}/{} {}",
                slot.slot, role, coverage.assigned, coverage.required, mark
            );
        }
    }
}

/// Writes the roster as pretty-printed JSON
pub fn write_roster_json<P: AsRef<Path>>(roster: &OptimizedRoster, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, roster)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
