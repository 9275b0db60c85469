use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use tracing::warn;

use crate::error::{Result, RosterError};
use crate::model::{Availability, AvailabilityEntry};

/// Splits a comma-separated cell into labels, keeping the first occurrence
/// of each and dropping blanks.
fn parse_slot_list(cell: &str) -> Vec<String> {
    let mut slots: Vec<String> = Vec::new();
    for part in cell.split(',') {
        let trimmed = part.trim();
        if !trimmed.is_empty() && !slots.iter().any(|s| s == trimmed) {
            slots.push(trimmed.to_string());
        }
    }
    slots
}

fn parse_date(value: &str, line: u64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| RosterError::InvalidDate {
        value: value.to_string(),
        line,
    })
}

/// Reads availability submissions from CSV.
///
/// Expected columns (located by header name, any order):
/// * `date` - `YYYY-MM-DD`
/// * `name` - staff name
/// * `slots` - comma-separated configured slot labels, e.g. `"10-15, 19-23"`
/// * `custom` - optional, comma-separated free-text labels
///
/// A later row for the same date and name is a resubmission and replaces the
/// earlier one.
pub fn read_availability<R: Read>(input: R) -> Result<Availability> {
    let mut reader = Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let date_col = column("date").ok_or(RosterError::MissingColumn("date"))?;
    let name_col = column("name").ok_or(RosterError::MissingColumn("name"))?;
    let slots_col = column("slots").ok_or(RosterError::MissingColumn("slots"))?;
    let custom_col = column("custom");

    let mut availability = Availability::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let name = record.get(name_col).unwrap_or("").trim();
        if name.is_empty() {
            warn!(line, "skipping availability row without a name");
            continue;
        }
        let date = parse_date(record.get(date_col).unwrap_or(""), line)?;

        let entry = AvailabilityEntry {
            staff: name.to_string(),
            slots: parse_slot_list(record.get(slots_col).unwrap_or("")),
            custom: custom_col
                .and_then(|col| record.get(col))
                .map(parse_slot_list)
                .unwrap_or_default(),
        };
        availability.submit(date, entry);
    }

    Ok(availability)
}

/// Loads availability submissions from a CSV file
pub fn load_availability<P: AsRef<Path>>(csv_path: P) -> Result<Availability> {
    let file = std::fs::File::open(csv_path)?;
    read_availability(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn reads_slots_in_request_order() {
        let csv = "date,name,slots\n2024-03-05,佐藤,\"19-23, 10-15\"\n2024-03-05,田中,10-15\n";
        let availability = read_availability(csv.as_bytes()).unwrap();
        let entries = availability.entries(date("2024-03-05"));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].staff, "佐藤");
        assert_eq!(entries[0].slots, vec!["19-23", "10-15"]);
        assert_eq!(entries[1].slots, vec!["10-15"]);
    }

    #[test]
    fn columns_are_found_by_header() {
        let csv = "Name,Custom,Slots,Date\n鈴木,16-22 (相談),18-23,2024-03-08\n";
        let availability = read_availability(csv.as_bytes()).unwrap();
        let entry = &availability.entries(date("2024-03-08"))[0];
        assert_eq!(entry.slots, vec!["18-23"]);
        assert_eq!(entry.custom, vec!["16-22 (相談)"]);
    }

    #[test]
    fn resubmission_replaces_in_place() {
        let csv = "date,name,slots\n\
                   2024-03-05,佐藤,19-23\n\
                   2024-03-05,鈴木,18-23\n\
                   2024-03-05,佐藤,\"10-15,10-15\"\n";
        let availability = read_availability(csv.as_bytes()).unwrap();
        let entries = availability.entries(date("2024-03-05"));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].staff, "佐藤");
        assert_eq!(entries[0].slots, vec!["10-15"]);
    }

    #[test]
    fn rows_without_name_are_skipped() {
        let csv = "date,name,slots\n2024-03-05,,19-23\n2024-03-05,佐藤,\n";
        let availability = read_availability(csv.as_bytes()).unwrap();
        let entries = availability.entries(date("2024-03-05"));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].slots.is_empty());
    }

    #[test]
    fn bad_date_is_an_error() {
        let csv = "date,name,slots\n2024/03/05,佐藤,19-23\n";
        match read_availability(csv.as_bytes()) {
            Err(RosterError::InvalidDate { value, line }) => {
                assert_eq!(value, "2024/03/05");
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn missing_slots_column_is_an_error() {
        let csv = "date,name\n2024-03-05,佐藤\n";
        assert!(matches!(
            read_availability(csv.as_bytes()),
            Err(RosterError::MissingColumn("slots"))
        ));
    }
}
