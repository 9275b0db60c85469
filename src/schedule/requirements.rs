use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::Role;

/// slot -> role -> required headcount
pub type RequirementTable = BTreeMap<String, BTreeMap<Role, u32>>;

/// Staffing requirements, in one of two bucket layouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementConfig {
    /// Friday and Saturday use `weekend`, every other day `weekday`
    WeekdayWeekend {
        #[serde(default)]
        weekday: RequirementTable,
        #[serde(default)]
        weekend: RequirementTable,
    },
    /// One table per weekday, keyed 0 (Sunday) through 6 (Saturday)
    PerWeekday(BTreeMap<u8, RequirementTable>),
}

/// Weekday classification used to pick a requirement table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBucket {
    Weekday,
    Weekend,
    Day(Weekday),
}

impl DayBucket {
    /// Index into the per-weekday tables: Sunday = 0 ... Saturday = 6.
    pub fn weekday_index(day: Weekday) -> u8 {
        day.num_days_from_sunday() as u8
    }
}

impl RequirementConfig {
    pub fn bucket(&self, date: NaiveDate) -> DayBucket {
        let day = date.weekday();
        match self {
            Self::WeekdayWeekend { .. } => match day {
                Weekday::Fri | Weekday::Sat => DayBucket::Weekend,
                _ => DayBucket::Weekday,
            },
            Self::PerWeekday(_) => DayBucket::Day(day),
        }
    }

    /// The table that applies to `date`, if one is configured.
    pub fn table_for(&self, date: NaiveDate) -> Option<&RequirementTable> {
        match (self, self.bucket(date)) {
            (Self::WeekdayWeekend { weekend, .. }, DayBucket::Weekend) => Some(weekend),
            (Self::WeekdayWeekend { weekday, .. }, _) => Some(weekday),
            (Self::PerWeekday(days), DayBucket::Day(day)) => {
                days.get(&DayBucket::weekday_index(day))
            }
            (Self::PerWeekday(_), _) => None,
        }
    }

    /// Headcount of `role` needed in `slot` on `date`. Anything not
    /// configured resolves to 0.
    pub fn required_headcount(&self, date: NaiveDate, slot: &str, role: &Role) -> u32 {
        self.table_for(date)
            .and_then(|table| table.get(slot))
            .and_then(|roles| roles.get(role))
            .copied()
            .unwrap_or(0)
    }

    pub fn tables(&self) -> Vec<&RequirementTable> {
        match self {
            Self::WeekdayWeekend { weekday, weekend } => vec![weekday, weekend],
            Self::PerWeekday(days) => days.values().collect(),
        }
    }

    /// Every role named anywhere in the requirement tables.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.tables()
            .into_iter()
            .flat_map(|table| table.values())
            .flat_map(|roles| roles.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn table(entries: &[(&str, &str, u32)]) -> RequirementTable {
        let mut table = RequirementTable::new();
        for (slot, role, count) in entries {
            table
                .entry(slot.to_string())
                .or_default()
                .insert(Role::new(*role), *count);
        }
        table
    }

    fn weekday_weekend() -> RequirementConfig {
        RequirementConfig::WeekdayWeekend {
            weekday: table(&[("10-15", "社員", 1), ("10-15", "アルバイト", 1), ("17-23", "アルバイト", 0)]),
            weekend: table(&[("10-15", "社員", 2), ("10-15", "アルバイト", 2), ("17-23", "アルバイト", 1)]),
        }
    }

    #[test]
    fn friday_and_saturday_are_weekend() {
        let config = weekday_weekend();
        assert_eq!(config.bucket(date("2024-03-08")), DayBucket::Weekend); // Fri
        assert_eq!(config.bucket(date("2024-03-09")), DayBucket::Weekend); // Sat
        assert_eq!(config.bucket(date("2024-03-10")), DayBucket::Weekday); // Sun
        assert_eq!(config.bucket(date("2024-03-04")), DayBucket::Weekday); // Mon
    }

    #[test]
    fn weekday_weekend_lookup() {
        let config = weekday_weekend();
        let staff = Role::new("社員");
        let part = Role::new("アルバイト");
        assert_eq!(config.required_headcount(date("2024-03-04"), "10-15", &staff), 1);
        assert_eq!(config.required_headcount(date("2024-03-04"), "10-15", &part), 1);
        assert_eq!(config.required_headcount(date("2024-03-09"), "10-15", &staff), 2);
        assert_eq!(config.required_headcount(date("2024-03-09"), "17-23", &part), 1);
    }

    #[test]
    fn per_weekday_uses_sunday_based_index() {
        let days = (0u8..7)
            .map(|i| (i, table(&[("10-15", "アルバイト", u32::from(i) + 1)])))
            .collect();
        let config = RequirementConfig::PerWeekday(days);
        let part = Role::new("アルバイト");

        // 2024-03-03 is a Sunday
        for offset in 0..7u32 {
            let day = date("2024-03-03") + chrono::Duration::days(i64::from(offset));
            assert_eq!(config.required_headcount(day, "10-15", &part), offset + 1);
        }
    }

    #[test]
    fn missing_entries_resolve_to_zero() {
        let config = weekday_weekend();
        let part = Role::new("アルバイト");
        assert_eq!(config.required_headcount(date("2024-03-04"), "19-23", &part), 0);
        assert_eq!(config.required_headcount(date("2024-03-04"), "10-15", &Role::new("キッチン")), 0);

        let sparse =
            RequirementConfig::PerWeekday(BTreeMap::from([(1, table(&[("10-15", "アルバイト", 2)]))]));
        assert_eq!(sparse.required_headcount(date("2024-03-04"), "10-15", &part), 2);
        assert_eq!(sparse.required_headcount(date("2024-03-05"), "10-15", &part), 0);
    }

    #[test]
    fn deserializes_both_modes() {
        let json = r#"{ "per_weekday": { "0": { "10-15": { "アルバイト": 3 } } } }"#;
        let config: RequirementConfig = serde_json::from_str(json).unwrap();
        let part = Role::new("アルバイト");
        assert_eq!(config.required_headcount(date("2024-03-03"), "10-15", &part), 3);

        let json = r#"{ "weekday_weekend": { "weekend": { "19-23": { "アルバイト": 3 } } } }"#;
        let config: RequirementConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.required_headcount(date("2024-03-08"), "19-23", &part), 3);
        assert_eq!(config.required_headcount(date("2024-03-07"), "19-23", &part), 0);
    }
}
