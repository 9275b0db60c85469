use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How one slot assignment also satisfies demand in other slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoveragePolicy {
    /// Explicit coverage sets; a slot without an entry covers only itself
    Table { table: BTreeMap<String, Vec<String>> },
    /// Slot i covers itself and every slot after it
    Nested,
}

/// Where a full slot may be moved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubstitutionPolicy {
    Table { table: BTreeMap<String, Vec<String>> },
    /// Every later slot in configured order
    LaterSlots,
}

/// Two wide bookings that together mean "the whole day"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDayPair {
    pub opening: String,
    pub evening: String,
}

/// Ordered slot list plus the coverage and substitution relations over it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotModel {
    pub order: Vec<String>,
    pub coverage: CoveragePolicy,
    pub substitution: SubstitutionPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_day: Option<FullDayPair>,
}

impl SlotModel {
    pub fn position(&self, slot: &str) -> Option<usize> {
        self.order.iter().position(|s| s == slot)
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.position(slot).is_some()
    }

    /// Slots covered by a booking of `requested`, in configured order.
    ///
    /// A booking holding both halves of the full-day pair covers every
    /// configured slot. Labels that are not configured contribute nothing.
    pub fn covered_slots<S: AsRef<str>>(&self, requested: &[S]) -> Vec<&str> {
        if let Some(pair) = &self.full_day {
            let has = |label: &str| requested.iter().any(|s| s.as_ref() == label);
            if has(&pair.opening) && has(&pair.evening) {
                return self.order.iter().map(String::as_str).collect();
            }
        }

        let mut covered = vec![false; self.order.len()];
        for slot in requested {
            let slot = slot.as_ref();
            let Some(index) = self.position(slot) else {
                continue;
            };
            match &self.coverage {
                CoveragePolicy::Table { table } => match table.get(slot) {
                    Some(targets) => {
                        for target in targets {
                            if let Some(i) = self.position(target) {
                                covered[i] = true;
                            }
                        }
                    }
                    None => covered[index] = true,
                },
                CoveragePolicy::Nested => {
                    for flag in &mut covered[index..] {
                        *flag = true;
                    }
                }
            }
        }

        self.order
            .iter()
            .zip(covered)
            .filter(|(_, hit)| *hit)
            .map(|(slot, _)| slot.as_str())
            .collect()
    }

    /// Substitution candidates for `slot`, ascending in configured order.
    pub fn substitutes(&self, slot: &str) -> Vec<&str> {
        match &self.substitution {
            SubstitutionPolicy::LaterSlots => match self.position(slot) {
                Some(index) => self.order[index + 1..].iter().map(String::as_str).collect(),
                None => Vec::new(),
            },
            SubstitutionPolicy::Table { table } => {
                let mut candidates: Vec<(usize, &str)> = table
                    .get(slot)
                    .into_iter()
                    .flatten()
                    .filter_map(|alt| self.position(alt).map(|i| (i, self.order[i].as_str())))
                    .collect();
                candidates.sort_by_key(|(i, _)| *i);
                candidates.dedup_by_key(|(i, _)| *i);
                candidates.into_iter().map(|(_, s)| s).collect()
            }
        }
    }

    /// The effective substitution map for every configured slot.
    pub fn substitution_map(&self) -> BTreeMap<String, Vec<String>> {
        match &self.substitution {
            SubstitutionPolicy::LaterSlots => build_substitution_map(&self.order),
            SubstitutionPolicy::Table { .. } => self
                .order
                .iter()
                .map(|slot| {
                    let alts: Vec<String> =
                        self.substitutes(slot).into_iter().map(str::to_string).collect();
                    (slot.clone(), alts)
                })
                .collect(),
        }
    }
}

/// Builds the order-derived substitution map: each slot maps to every slot
/// after it, in order.
pub fn build_substitution_map(ordered_slots: &[String]) -> BTreeMap<String, Vec<String>> {
    ordered_slots
        .iter()
        .enumerate()
        .map(|(i, slot)| (slot.clone(), ordered_slots[i + 1..].to_vec()))
        .collect()
}
