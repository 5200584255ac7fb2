//! Representation of classes in areal units.
//!
//! The representation of class `α` in unit `u` is the ratio of the class's
//! local share to its global share:
//!
//! ```text
//! r_α(u) = (n_α(u) / n(u)) / (N_α / N)
//! ```
//!
//! where `n_α(u)` is the class population of the unit, `n(u)` the unit
//! population, `N_α` the class total and `N` the grand total. A value of 1
//! means the unit mirrors the city-wide composition.
//!
//! The variance attached to each ratio is computed on the null model, where
//! each of the `n(u)` residents belongs to class `α` independently with
//! probability `N_α / N`:
//!
//! ```text
//! σ²_α(u) = (N / (n(u) · N_α)) · (1 − N_α / N)
//! ```

use crate::aggregation::{categories, compute_totals, regroup_per_class};
use crate::core::errors::{Error, Result};
use crate::core::types::{ClassDefinition, Distribution, Representation, RepresentationEntry};

/// Compute the representation of every class in every areal unit.
///
/// If `classes` is given, the distribution is first regrouped; otherwise the
/// raw categories are taken as classes.
///
/// # Errors
///
/// Returns [`Error::DegenerateInput`] when the grand total, a unit total or
/// a class total is zero: every one of these appears as a denominator.
pub fn representation(
    distribution: &Distribution,
    classes: Option<&ClassDefinition>,
) -> Result<Representation> {
    let grouped;
    let distribution = match classes {
        Some(definition) => {
            grouped = regroup_per_class(distribution, definition);
            &grouped
        }
        None => distribution,
    };

    let class_ids = categories(distribution);
    let totals = compute_totals(distribution);
    if totals.grand == 0.0 {
        return Err(Error::degenerate("total population is zero"));
    }

    log::debug!(
        "computing representation for {} classes over {} units",
        class_ids.len(),
        distribution.len()
    );

    let mut rep = Representation::new();
    for (unit, counts) in distribution {
        let unit_total = totals.per_unit[unit];
        if unit_total == 0.0 {
            return Err(Error::degenerate(format!(
                "unit {unit} has zero population"
            )));
        }

        let mut per_class = std::collections::BTreeMap::new();
        for class in &class_ids {
            let class_total = totals.per_class.get(class).copied().unwrap_or(0.0);
            if class_total == 0.0 {
                return Err(Error::degenerate(format!(
                    "class {class} has zero population"
                )));
            }

            let count = counts.get(class).copied().unwrap_or(0) as f64;
            let ratio = (count / unit_total) / (class_total / totals.grand);
            let variance =
                (totals.grand / (unit_total * class_total)) * (1.0 - class_total / totals.grand);
            per_class.insert(class.clone(), RepresentationEntry { ratio, variance });
        }
        rep.insert(unit.clone(), per_class);
    }

    Ok(rep)
}
