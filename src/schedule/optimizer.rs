use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::{ScheduleConfig, StaffOrder};
use crate::error::Result;
use crate::model::{
    Availability, AvailabilityEntry, OptimizedRoster, Role, StaffDirectory, UnassignedReason,
    UnassignedRequest,
};
use crate::validation::{validate_availability, validate_config};

use super::slots::SlotModel;

/// Result of placing one date's submissions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayOutcome {
    pub assignments: BTreeMap<String, Vec<String>>, // staff -> committed slots
    pub unassigned: Vec<UnassignedRequest>,
}

#[derive(Debug, Default)]
struct SlotNeed {
    required: u32,
    assigned: Vec<String>,
}

impl SlotNeed {
    fn is_full(&self) -> bool {
        self.assigned.len() >= self.required as usize
    }
}

/// Required vs. assigned headcount for every (role, slot) on one date
struct DayNeeds {
    needs: HashMap<Role, HashMap<String, SlotNeed>>,
}

impl DayNeeds {
    fn new<'a>(date: NaiveDate, config: &ScheduleConfig, roles: impl Iterator<Item = &'a Role>) -> Self {
        let needs = roles
            .map(|role| {
                let per_slot = config
                    .slots
                    .order
                    .iter()
                    .map(|slot| {
                        let required = config.requirements.required_headcount(date, slot, role);
                        (slot.clone(), SlotNeed { required, assigned: Vec::new() })
                    })
                    .collect();
                (role.clone(), per_slot)
            })
            .collect();
        Self { needs }
    }

    /// True when every covered slot still has room for one more of `role`.
    fn has_room(&self, covered: &[&str], role: &Role) -> bool {
        let Some(per_slot) = self.needs.get(role) else {
            return false;
        };
        covered
            .iter()
            .all(|slot| per_slot.get(*slot).is_some_and(|need| !need.is_full()))
    }

    fn record(&mut self, covered: &[&str], role: &Role, staff: &str) {
        if let Some(per_slot) = self.needs.get_mut(role) {
            for slot in covered {
                if let Some(need) = per_slot.get_mut(*slot) {
                    need.assigned.push(staff.to_string());
                }
            }
        }
    }
}

/// Tries `slot` first, then each substitute in configured order. First fit wins.
fn find_placement<'a>(
    slots: &'a SlotModel,
    needs: &DayNeeds,
    slot: &'a str,
    role: &Role,
) -> Option<&'a str> {
    if needs.has_room(&slots.covered_slots(&[slot]), role) {
        return Some(slot);
    }
    slots
        .substitutes(slot)
        .into_iter()
        .find(|alt| needs.has_room(&slots.covered_slots(&[*alt]), role))
}

fn order_staff(remaining: &mut [(&AvailabilityEntry, &Role)], order: StaffOrder, staff: &StaffDirectory) {
    match order {
        StaffOrder::Submission => {}
        StaffOrder::Name => remaining.sort_by(|a, b| a.0.staff.cmp(&b.0.staff)),
        StaffOrder::Priority => remaining.sort_by(|a, b| {
            let pa = staff.priority_of(&a.0.staff);
            let pb = staff.priority_of(&b.0.staff);
            // None sorts below Some, so reversing puts unset priorities last
            pb.cmp(&pa).then_with(|| a.0.staff.cmp(&b.0.staff))
        }),
    }
}

/// Places one date's submissions. Input is assumed validated.
pub fn optimize_date(
    date: NaiveDate,
    entries: &[AvailabilityEntry],
    staff: &StaffDirectory,
    config: &ScheduleConfig,
) -> DayOutcome {
    let mut outcome = DayOutcome::default();

    // Partition by role
    let mut single: BTreeMap<&Role, Vec<&AvailabilityEntry>> = BTreeMap::new();
    let mut remaining: Vec<(&AvailabilityEntry, &Role)> = Vec::new();
    for entry in entries {
        let role = config.role_for(staff, &entry.staff);
        if config.is_single_assignment(role) {
            if !entry.slots.is_empty() {
                single.entry(role).or_default().push(entry);
            }
        } else {
            remaining.push((entry, role));
        }
    }

    // One person per single-assignment role: most slots, then smallest name
    for (role, mut candidates) in single {
        candidates.sort_by(|a, b| {
            b.slots
                .len()
                .cmp(&a.slots.len())
                .then_with(|| a.staff.cmp(&b.staff))
        });
        let Some((selected, rest)) = candidates.split_first() else {
            continue;
        };
        debug!(%date, %role, staff = %selected.staff, slots = ?selected.slots, "single-assignment role filled");
        outcome
            .assignments
            .insert(selected.staff.clone(), selected.slots.clone());
        for other in rest {
            outcome.unassigned.push(UnassignedRequest {
                date,
                staff: other.staff.clone(),
                slot: None,
                reason: UnassignedReason::SingleAssignmentTaken {
                    selected: selected.staff.clone(),
                },
            });
        }
    }

    let roles: BTreeSet<&Role> = remaining.iter().map(|(_, role)| *role).collect();
    let mut needs = DayNeeds::new(date, config, roles.into_iter());

    order_staff(&mut remaining, config.staff_order, staff);

    for (entry, role) in remaining {
        for slot in &entry.slots {
            match find_placement(&config.slots, &needs, slot, role) {
                Some(committed) => {
                    if committed != slot.as_str() {
                        debug!(%date, staff = %entry.staff, requested = %slot, assigned = %committed, "slot substituted");
                    }
                    needs.record(&config.slots.covered_slots(&[committed]), role, &entry.staff);
                    outcome
                        .assignments
                        .entry(entry.staff.clone())
                        .or_default()
                        .push(committed.to_string());
                }
                None => {
                    debug!(%date, staff = %entry.staff, requested = %slot, "no room, request dropped");
                    outcome.unassigned.push(UnassignedRequest {
                        date,
                        staff: entry.staff.clone(),
                        slot: Some(slot.clone()),
                        reason: UnassignedReason::NoCapacity,
                    });
                }
            }
        }
    }

    outcome
}

/// Builds the roster for every submitted date.
///
/// Fails only on malformed input (see [`crate::validation`]); shortfalls are
/// left for the coverage checker to report. Dates with nobody assigned are
/// left out of `days`.
pub fn optimize(
    availability: &Availability,
    staff: &StaffDirectory,
    config: &ScheduleConfig,
) -> Result<OptimizedRoster> {
    validate_config(config)?;
    validate_availability(availability, config)?;

    let mut roster = OptimizedRoster::default();
    for (date, entries) in availability.iter() {
        let outcome = optimize_date(date, entries, staff, config);
        if !outcome.assignments.is_empty() {
            roster.days.insert(date, outcome.assignments);
        }
        roster.unassigned.extend(outcome.unassigned);

        let custom: BTreeMap<String, Vec<String>> = entries
            .iter()
            .filter(|e| !e.custom.is_empty())
            .map(|e| (e.staff.clone(), e.custom.clone()))
            .collect();
        if !custom.is_empty() {
            roster.custom.insert(date, custom);
        }
    }

    info!(
        dates = roster.days.len(),
        unassigned = roster.unassigned.len(),
        "roster optimized"
    );
    Ok(roster)
}
