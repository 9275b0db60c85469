//! Boundary checks run before the optimizer.
//!
//! The optimizer trusts its input: every requested slot is configured and the
//! slot relations only point at configured slots. Anything else is rejected
//! here with the first defect found.

use std::collections::HashSet;

use tracing::warn;

use crate::config::ScheduleConfig;
use crate::error::{Result, RosterError};
use crate::model::Availability;
use crate::schedule::requirements::RequirementConfig;
use crate::schedule::slots::{CoveragePolicy, SubstitutionPolicy};

/// Checks the internal consistency of a schedule configuration.
pub fn validate_config(config: &ScheduleConfig) -> Result<()> {
    let slots = &config.slots;
    if slots.order.is_empty() {
        return Err(RosterError::config("slot order is empty"));
    }

    let mut seen = HashSet::new();
    for slot in &slots.order {
        if !seen.insert(slot.as_str()) {
            return Err(RosterError::config(format!("slot `{slot}` is listed twice")));
        }
    }

    let known = |slot: &str, context: &str| -> Result<()> {
        if slots.contains(slot) {
            Ok(())
        } else {
            Err(RosterError::config(format!("{context} names unknown slot `{slot}`")))
        }
    };

    if let CoveragePolicy::Table { table } = &slots.coverage {
        for (slot, covered) in table {
            known(slot.as_str(), "coverage table")?;
            if !covered.contains(slot) {
                return Err(RosterError::config(format!(
                    "coverage of `{slot}` does not include `{slot}` itself"
                )));
            }
            for target in covered {
                known(target.as_str(), &format!("coverage of `{slot}`"))?;
            }
        }
    }

    if let SubstitutionPolicy::Table { table } = &slots.substitution {
        for (slot, alternatives) in table {
            known(slot.as_str(), "substitution table")?;
            let from = slots.position(slot).unwrap_or(0);
            for alt in alternatives {
                known(alt.as_str(), &format!("substitution of `{slot}`"))?;
                if slots.position(alt).unwrap_or(0) <= from {
                    return Err(RosterError::config(format!(
                        "substitution of `{slot}` points back to `{alt}`"
                    )));
                }
            }
        }
    }

    if let Some(pair) = &slots.full_day {
        known(pair.opening.as_str(), "full-day pair")?;
        known(pair.evening.as_str(), "full-day pair")?;
    }

    if let RequirementConfig::PerWeekday(days) = &config.requirements {
        if let Some(day) = days.keys().find(|day| **day > 6) {
            return Err(RosterError::config(format!("weekday index {day} is out of range 0..=6")));
        }
    }

    // dead entries, not an error
    for table in config.requirements.tables() {
        for slot in table.keys().filter(|slot| !slots.contains(slot)) {
            warn!(slot = %slot, "requirement entry names an unconfigured slot");
        }
    }

    Ok(())
}

/// Rejects any submitted slot label that is not configured or that one
/// entry lists twice.
///
/// Free-text `custom` labels are not checked; they never reach the optimizer.
pub fn validate_availability(availability: &Availability, config: &ScheduleConfig) -> Result<()> {
    for (date, entries) in availability.iter() {
        for entry in entries {
            if let Some(slot) = entry.slots.iter().find(|s| !config.slots.contains(s)) {
                return Err(RosterError::UnknownSlot {
                    date,
                    staff: entry.staff.clone(),
                    slot: slot.clone(),
                });
            }
            let mut seen = HashSet::new();
            if let Some(slot) = entry.slots.iter().find(|s| !seen.insert(s.as_str())) {
                return Err(RosterError::DuplicateSlot {
                    date,
                    staff: entry.staff.clone(),
                    slot: slot.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ScheduleConfig::default()).is_ok());
    }

    #[test]
    fn rejects_duplicate_slots() {
        let mut config = ScheduleConfig::default();
        config.slots.order.push("18-23".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn rejects_backward_substitution() {
        let mut config = ScheduleConfig::default();
        config.slots.substitution = SubstitutionPolicy::Table {
            table: BTreeMap::from([("19-23".to_string(), vec!["17-23".to_string()])]),
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("points back"));
    }

    #[test]
    fn rejects_coverage_of_unknown_slot() {
        let mut config = ScheduleConfig::default();
        if let CoveragePolicy::Table { table } = &mut config.slots.coverage {
            table.insert("19-23".to_string(), vec!["19-24".to_string()]);
        }
        assert!(matches!(validate_config(&config), Err(RosterError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_coverage_that_skips_its_own_slot() {
        let mut config = ScheduleConfig::default();
        if let CoveragePolicy::Table { table } = &mut config.slots.coverage {
            table.insert("19-23".to_string(), Vec::new());
        }
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("does not include `19-23`"));

        if let CoveragePolicy::Table { table } = &mut config.slots.coverage {
            table.insert("18-23".to_string(), vec!["19-23".to_string()]);
            table.insert("19-23".to_string(), vec!["19-23".to_string()]);
        }
        assert!(matches!(validate_config(&config), Err(RosterError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_out_of_range_weekday() {
        let mut config = ScheduleConfig::default();
        config.requirements = RequirementConfig::PerWeekday(BTreeMap::from([(7, BTreeMap::new())]));
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_requested_slot_fails_fast() {
        let config = ScheduleConfig::default();
        let availability = Availability::new()
            .with_entry(date(), "佐藤", &["19-23"])
            .with_entry(date(), "鈴木", &["20-23"]);
        match validate_availability(&availability, &config) {
            Err(RosterError::UnknownSlot { staff, slot, .. }) => {
                assert_eq!(staff, "鈴木");
                assert_eq!(slot, "20-23");
            }
            other => panic!("expected UnknownSlot, got {other:?}"),
        }
    }

    #[test]
    fn repeated_slot_in_one_entry_fails_fast() {
        let config = ScheduleConfig::default();
        let availability = Availability::new()
            .with_entry(date(), "佐藤", &["19-23", "19-23"])
            .with_entry(date(), "鈴木", &["19-23"]);
        match validate_availability(&availability, &config) {
            Err(RosterError::DuplicateSlot { staff, slot, .. }) => {
                assert_eq!(staff, "佐藤");
                assert_eq!(slot, "19-23");
            }
            other => panic!("expected DuplicateSlot, got {other:?}"),
        }
    }

    #[test]
    fn custom_labels_are_not_validated() {
        let config = ScheduleConfig::default();
        let mut entry = crate::model::AvailabilityEntry::new("佐藤", &["19-23"]);
        entry.custom.push("16-22 (相談)".to_string());
        let mut availability = Availability::new();
        availability.submit(date(), entry);
        assert!(validate_availability(&availability, &config).is_ok());
    }
}
