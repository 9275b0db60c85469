use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::model::{OptimizedRoster, Role, StaffDirectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCoverage {
    pub required: u32,
    pub assigned: u32,
    pub satisfied: bool,
}

/// Staffing status of one slot on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCoverage {
    pub slot: String,
    pub roles: BTreeMap<Role, RoleCoverage>,
}

impl SlotCoverage {
    pub fn is_satisfied(&self) -> bool {
        self.roles.values().all(|r| r.satisfied)
    }

    pub fn role(&self, role: &str) -> Option<&RoleCoverage> {
        self.roles.get(&Role::new(role))
    }
}

/// Roles the checker reports on: the directory's, the requirement tables',
/// and the default role given to unregistered staff.
pub fn known_roles(staff: &StaffDirectory, config: &ScheduleConfig) -> BTreeSet<Role> {
    staff
        .roles()
        .chain(config.requirements.roles())
        .chain(std::iter::once(&config.default_role))
        .cloned()
        .collect()
}

/// Per-slot coverage report for `date`. Read-only; a date absent from the
/// roster reports zero assigned everywhere.
pub fn check_date(
    date: NaiveDate,
    roster: &OptimizedRoster,
    staff: &StaffDirectory,
    config: &ScheduleConfig,
) -> Vec<SlotCoverage> {
    let roles = known_roles(staff, config);

    // Coverage of each staff member's whole day, computed once
    let covered: Vec<(&Role, Vec<&str>)> = roster
        .day(date)
        .into_iter()
        .flatten()
        .map(|(name, slots)| (config.role_for(staff, name), config.slots.covered_slots(slots)))
        .collect();

    config
        .slots
        .order
        .iter()
        .map(|slot| {
            let per_role = roles
                .iter()
                .map(|role| {
                    let required = config.requirements.required_headcount(date, slot, role);
                    let assigned = covered
                        .iter()
                        .filter(|(r, slots)| *r == role && slots.contains(&slot.as_str()))
                        .count() as u32;
                    let coverage = RoleCoverage {
                        required,
                        assigned,
                        satisfied: assigned >= required,
                    };
                    (role.clone(), coverage)
                })
                .collect();
            SlotCoverage {
                slot: slot.clone(),
                roles: per_role,
            }
        })
        .collect()
}

/// Runs [`check_date`] for every date in the roster.
pub fn check_roster(
    roster: &OptimizedRoster,
    staff: &StaffDirectory,
    config: &ScheduleConfig,
) -> BTreeMap<NaiveDate, Vec<SlotCoverage>> {
    roster
        .dates()
        .map(|date| (date, check_date(date, roster, staff, config)))
        .collect()
}
