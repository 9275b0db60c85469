use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Role, StaffDirectory};
use crate::schedule::requirements::{RequirementConfig, RequirementTable};
use crate::schedule::slots::{CoveragePolicy, FullDayPair, SlotModel, SubstitutionPolicy};

pub const FULL_TIME: &str = "社員";
pub const PART_TIME: &str = "アルバイト";

/// Order in which non-single-assignment staff are placed on a date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffOrder {
    /// As submitted
    #[default]
    Submission,
    /// Name ascending
    Name,
    /// Priority descending, unset priorities last, then name ascending
    Priority,
}

/// Everything the optimizer needs besides the submissions themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub slots: SlotModel,
    pub requirements: RequirementConfig,
    #[serde(default = "default_single_assignment_roles")]
    pub single_assignment_roles: Vec<Role>,
    #[serde(default = "default_role")]
    pub default_role: Role,
    #[serde(default)]
    pub staff_order: StaffOrder,
}

fn default_single_assignment_roles() -> Vec<Role> {
    vec![Role::new(FULL_TIME)]
}

fn default_role() -> Role {
    Role::new(PART_TIME)
}

fn labels(slots: &[&str]) -> Vec<String> {
    slots.iter().map(|s| s.to_string()).collect()
}

impl Default for ScheduleConfig {
    /// The restaurant layout: a lunch slot and three nested evening slots.
    fn default() -> Self {
        let order = labels(&["10-15", "17-23", "18-23", "19-23"]);

        let coverage = BTreeMap::from([
            ("10-15".to_string(), labels(&["10-15"])),
            ("17-23".to_string(), labels(&["17-23", "18-23", "19-23"])),
            ("18-23".to_string(), labels(&["18-23", "19-23"])),
            ("19-23".to_string(), labels(&["19-23"])),
        ]);
        let substitution = BTreeMap::from([
            ("17-23".to_string(), labels(&["18-23", "19-23"])),
            ("18-23".to_string(), labels(&["19-23"])),
        ]);

        // (slot, part-time weekday, part-time weekend)
        let part_time = [("10-15", 1, 1), ("17-23", 0, 1), ("18-23", 1, 2), ("19-23", 2, 3)];
        let mut weekday = RequirementTable::new();
        let mut weekend = RequirementTable::new();
        for (slot, on_weekday, on_weekend) in part_time {
            for (table, count) in [(&mut weekday, on_weekday), (&mut weekend, on_weekend)] {
                let roles = table.entry(slot.to_string()).or_default();
                roles.insert(Role::new(FULL_TIME), 1);
                roles.insert(Role::new(PART_TIME), count);
            }
        }

        Self {
            slots: SlotModel {
                order,
                coverage: CoveragePolicy::Table { table: coverage },
                substitution: SubstitutionPolicy::Table {
                    table: substitution,
                },
                full_day: Some(FullDayPair {
                    opening: "10-15".to_string(),
                    evening: "17-23".to_string(),
                }),
            },
            requirements: RequirementConfig::WeekdayWeekend { weekday, weekend },
            single_assignment_roles: default_single_assignment_roles(),
            default_role: default_role(),
            staff_order: StaffOrder::default(),
        }
    }
}

impl ScheduleConfig {
    pub fn is_single_assignment(&self, role: &Role) -> bool {
        self.single_assignment_roles.contains(role)
    }

    /// Role of a submitting staff member; unregistered names get the default role.
    pub fn role_for<'a>(&'a self, staff: &'a StaffDirectory, name: &str) -> &'a Role {
        staff.role_of(name).unwrap_or(&self.default_role)
    }
}

/// Contents of a setup file: configuration plus the staff directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSetup {
    #[serde(default)]
    pub config: ScheduleConfig,
    #[serde(default)]
    pub staff: StaffDirectory,
}

/// Loads a JSON setup file. A missing `config` section means the defaults.
pub fn load_setup<P: AsRef<Path>>(path: P) -> Result<RosterSetup> {
    let raw = std::fs::read_to_string(path)?;
    parse_setup(&raw)
}

pub fn parse_setup(raw: &str) -> Result<RosterSetup> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_restaurant_layout() {
        let config = ScheduleConfig::default();
        assert_eq!(config.slots.order, labels(&["10-15", "17-23", "18-23", "19-23"]));
        assert!(config.is_single_assignment(&Role::new(FULL_TIME)));
        assert!(!config.is_single_assignment(&Role::new(PART_TIME)));
        assert_eq!(config.staff_order, StaffOrder::Submission);
    }

    #[test]
    fn setup_without_config_uses_defaults() {
        let setup = parse_setup(
            r#"{ "staff": { "田中": { "role": "社員" }, "佐藤": { "role": "アルバイト", "priority": 3 } } }"#,
        )
        .unwrap();
        assert_eq!(setup.config, ScheduleConfig::default());
        assert_eq!(setup.staff.len(), 2);
        assert_eq!(setup.staff.priority_of("佐藤"), Some(3));
    }

    #[test]
    fn unregistered_staff_get_default_role() {
        let config = ScheduleConfig::default();
        let staff = StaffDirectory::new().with_member("田中", FULL_TIME);
        assert_eq!(config.role_for(&staff, "田中").as_str(), FULL_TIME);
        assert_eq!(config.role_for(&staff, "新人").as_str(), PART_TIME);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ScheduleConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ScheduleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn parses_order_derived_setup() {
        let setup = parse_setup(
            r#"{
                "config": {
                    "slots": {
                        "order": ["open", "mid", "close"],
                        "coverage": { "kind": "nested" },
                        "substitution": { "kind": "later_slots" }
                    },
                    "requirements": { "per_weekday": {} },
                    "single_assignment_roles": ["manager"],
                    "default_role": "crew",
                    "staff_order": "name"
                }
            }"#,
        )
        .unwrap();
        let config = setup.config;
        assert_eq!(config.slots.substitutes("open"), vec!["mid", "close"]);
        assert_eq!(config.default_role, Role::new("crew"));
        assert_eq!(config.staff_order, StaffOrder::Name);
        assert!(config.slots.full_day.is_none());
    }
}
