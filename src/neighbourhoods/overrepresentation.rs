//! Detection of areal units where a class is overrepresented.
//!
//! A class `α` is overrepresented in unit `u` when its representation clears
//! the null-model noise floor:
//!
//! ```text
//! r_α(u) > 1 + z · σ_α(u)
//! ```
//!
//! with `z` the configured significance threshold (2.57 ≈ 99% two-sided
//! confidence by default).

use std::collections::BTreeSet;

use crate::config::DetectionConfig;
use crate::core::errors::{Error, Result};
use crate::core::types::{
    ClassDefinition, ClassId, Distribution, OverrepresentedUnits, Representation,
};
use crate::representation::representation;

/// Flag overrepresented units from an already-computed representation table.
///
/// Every class in `classes` gets an entry in the result, possibly empty.
///
/// # Errors
///
/// [`Error::InvalidRepresentation`] when an entry carries a negative or
/// non-finite ratio or variance.
pub fn overrepresented_units_from(
    rep: &Representation,
    classes: &BTreeSet<ClassId>,
    z_score: f64,
) -> Result<OverrepresentedUnits> {
    let mut flagged = OverrepresentedUnits::new();
    for class in classes {
        flagged.insert(class.clone(), BTreeSet::new());
    }

    for (unit, per_class) in rep {
        for class in classes {
            let Some(entry) = per_class.get(class) else {
                continue;
            };
            if !entry.ratio.is_finite() || entry.ratio < 0.0 {
                return Err(Error::invalid_representation(
                    unit,
                    class,
                    format!("ratio {} is not a non-negative finite number", entry.ratio),
                ));
            }
            if !entry.variance.is_finite() || entry.variance < 0.0 {
                return Err(Error::invalid_representation(
                    unit,
                    class,
                    format!(
                        "variance {} is not a non-negative finite number",
                        entry.variance
                    ),
                ));
            }

            if entry.ratio > 1.0 + z_score * entry.variance.sqrt() {
                if let Some(units) = flagged.get_mut(class) {
                    units.insert(unit.clone());
                }
            }
        }
    }

    log::debug!(
        "flagged units per class: {:?}",
        flagged
            .iter()
            .map(|(class, units)| (class.as_str(), units.len()))
            .collect::<Vec<_>>()
    );
    Ok(flagged)
}

/// Find the areal units in which each class is overrepresented.
///
/// High-level wrapper: computes the representation from the raw distribution
/// (regrouping into `classes` when given) and applies the detector with the
/// configured threshold.
pub fn overrepresented_units(
    distribution: &Distribution,
    classes: Option<&ClassDefinition>,
    config: &DetectionConfig,
) -> Result<OverrepresentedUnits> {
    let rep = representation(distribution, classes)?;
    let class_ids = match classes {
        Some(definition) => definition.keys().cloned().collect(),
        None => crate::aggregation::categories(distribution),
    };
    overrepresented_units_from(&rep, &class_ids, config.z_score)
}
