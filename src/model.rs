use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Staff category label, e.g. "社員" (full-time) or "アルバイト" (part-time)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A registered staff member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    pub name: String,
    pub role: Role,
    pub priority: Option<i32>, // tie-break hint only
}

/// Directory entry as stored under the staff member's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Name -> profile mapping of every registered staff member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffDirectory {
    members: BTreeMap<String, StaffProfile>,
}

impl StaffDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a member; names are unique keys.
    pub fn insert(&mut self, member: StaffMember) {
        self.members.insert(
            member.name,
            StaffProfile {
                role: member.role,
                priority: member.priority,
            },
        );
    }

    pub fn with_member(mut self, name: &str, role: &str) -> Self {
        self.insert(StaffMember {
            name: name.to_string(),
            role: Role::new(role),
            priority: None,
        });
        self
    }

    pub fn role_of(&self, name: &str) -> Option<&Role> {
        self.members.get(name).map(|p| &p.role)
    }

    pub fn priority_of(&self, name: &str) -> Option<i32> {
        self.members.get(name).and_then(|p| p.priority)
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.members.values().map(|p| &p.role)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// One staff member's submission for one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub staff: String,
    pub slots: Vec<String>, // configured slot labels, in request order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<String>, // free-text labels, passed through untouched
}

impl AvailabilityEntry {
    pub fn new(staff: &str, slots: &[&str]) -> Self {
        Self {
            staff: staff.to_string(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
            custom: Vec::new(),
        }
    }
}

/// Submitted availability: date -> entries in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability {
    dates: BTreeMap<NaiveDate, Vec<AvailabilityEntry>>,
}

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a submission. A resubmission for the same (date, staff)
    /// replaces the earlier entry but keeps its place in submission order.
    pub fn submit(&mut self, date: NaiveDate, entry: AvailabilityEntry) {
        let entries = self.dates.entry(date).or_default();
        if let Some(existing) = entries.iter_mut().find(|e| e.staff == entry.staff) {
            *existing = entry;
        } else {
            entries.push(entry);
        }
    }

    pub fn with_entry(mut self, date: NaiveDate, staff: &str, slots: &[&str]) -> Self {
        self.submit(date, AvailabilityEntry::new(staff, slots));
        self
    }

    pub fn entries(&self, date: NaiveDate) -> &[AvailabilityEntry] {
        self.dates.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[AvailabilityEntry])> {
        self.dates.iter().map(|(d, e)| (*d, e.as_slice()))
    }
}

/// Why a submitted request did not make it into the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnassignedReason {
    /// Another member of a single-assignment role was selected for the date
    SingleAssignmentTaken { selected: String },
    /// Neither the requested slot nor any substitute had room
    NoCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedRequest {
    pub date: NaiveDate,
    pub staff: String,
    pub slot: Option<String>, // None when the whole submission was rejected
    pub reason: UnassignedReason,
}

/// Final assignment: date -> staff -> slots actually worked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedRoster {
    pub days: BTreeMap<NaiveDate, BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<NaiveDate, BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unassigned: Vec<UnassignedRequest>,
}

impl OptimizedRoster {
    pub fn day(&self, date: NaiveDate) -> Option<&BTreeMap<String, Vec<String>>> {
        self.days.get(&date)
    }

    pub fn slots_for(&self, date: NaiveDate, staff: &str) -> Option<&[String]> {
        self.days
            .get(&date)
            .and_then(|day| day.get(staff))
            .map(Vec::as_slice)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }
}
