//! Aggregation of raw category counts into classes and population totals.
//!
//! The raw data attaches counts to fine-grained categories (e.g. income
//! deciles). Analyses usually run on coarser classes (e.g. low/middle/high
//! income), so the first pipeline step regroups the distribution according
//! to a [`ClassDefinition`]. When no definition is given the categories are
//! used as classes directly.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::{ClassDefinition, ClassId, Distribution, Totals};

/// Distinct category identifiers appearing anywhere in the distribution.
///
/// These are the default classes when the caller supplies no
/// [`ClassDefinition`].
pub fn categories(distribution: &Distribution) -> BTreeSet<ClassId> {
    distribution
        .values()
        .flat_map(|counts| counts.keys().cloned())
        .collect()
}

/// Regroup a raw distribution into classes.
///
/// Each unit's count for a class is the sum of its counts over the class's
/// category set; categories missing from a unit contribute zero. Every class
/// of the definition appears in every output unit, so downstream loops never
/// hit a missing key.
pub fn regroup_per_class(distribution: &Distribution, classes: &ClassDefinition) -> Distribution {
    distribution
        .iter()
        .map(|(unit, counts)| {
            let grouped: BTreeMap<ClassId, u64> = classes
                .iter()
                .map(|(class, members)| {
                    let total = members
                        .iter()
                        .filter_map(|category| counts.get(category))
                        .sum();
                    (class.clone(), total)
                })
                .collect();
            (unit.clone(), grouped)
        })
        .collect()
}

/// Compute per-unit totals, per-class totals and the grand total.
pub fn compute_totals(distribution: &Distribution) -> Totals {
    let mut per_unit = BTreeMap::new();
    let mut per_class: BTreeMap<ClassId, f64> = BTreeMap::new();
    let mut grand = 0.0;

    for (unit, counts) in distribution {
        let mut unit_total = 0.0;
        for (class, &count) in counts {
            let count = count as f64;
            unit_total += count;
            *per_class.entry(class.clone()).or_insert(0.0) += count;
        }
        per_unit.insert(unit.clone(), unit_total);
        grand += unit_total;
    }

    Totals {
        per_unit,
        per_class,
        grand,
    }
}
