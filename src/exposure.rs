//! Exposure matrix between population classes.
//!
//! The exposure of class `α` to class `β` is the population-weighted average
//! over areal units of the product of their representations:
//!
//! ```text
//! E_αβ = (1/N) · Σ_u n(u) · r_α(u) · r_β(u)
//! ```
//!
//! The diagonal entry `E_αα` is the isolation of class `α`. Each entry is
//! paired with the variance it would exhibit under the null model, i.e. when
//! people scatter across units independently of class; comparing the measured
//! exposure against that baseline tells segregation apart from sampling
//! noise.

use rayon::prelude::*;

use crate::aggregation::{categories, compute_totals, regroup_per_class};
use crate::core::errors::{Error, Result};
use crate::core::types::{
    ClassDefinition, ClassId, ClassPair, Distribution, ExposureEntry, ExposureMatrix,
    Representation, Totals,
};
use crate::representation::representation;

/// Compute the exposure matrix between classes, with null-model variances.
///
/// If `classes` is given, raw categories are aggregated first; otherwise the
/// categories found in the distribution are the classes. One entry is
/// produced per unordered pair of classes, diagonal included, so the matrix
/// is symmetric by construction.
///
/// # Errors
///
/// [`Error::DegenerateInput`] when the grand total or a class total in a
/// computed pair is zero; [`Error::UnknownClass`] when a class id is missing
/// from the totals table.
pub fn exposure(
    distribution: &Distribution,
    classes: Option<&ClassDefinition>,
) -> Result<ExposureMatrix> {
    let grouped;
    let distribution = match classes {
        Some(definition) => {
            grouped = regroup_per_class(distribution, definition);
            &grouped
        }
        None => distribution,
    };

    let class_ids: Vec<ClassId> = categories(distribution).into_iter().collect();
    let totals = compute_totals(distribution);
    if totals.grand == 0.0 {
        return Err(Error::degenerate("total population is zero"));
    }

    let rep = representation(distribution, None)?;

    // Unordered pairs with the diagonal: i <= j over the sorted class list.
    let mut pairs = Vec::with_capacity(class_ids.len() * (class_ids.len() + 1) / 2);
    for (i, alpha) in class_ids.iter().enumerate() {
        for beta in &class_ids[i..] {
            pairs.push(ClassPair::new(alpha.clone(), beta.clone()));
        }
    }
    log::debug!(
        "computing exposure for {} class pairs over {} units",
        pairs.len(),
        distribution.len()
    );

    let entries: Vec<(ClassPair, ExposureEntry)> = pairs
        .into_par_iter()
        .map(|pair| {
            let entry = pair_entry(&rep, &totals, pair.first(), pair.second())?;
            Ok((pair, entry))
        })
        .collect::<Result<_>>()?;

    let mut matrix = ExposureMatrix::new();
    for (pair, entry) in entries {
        matrix.insert(pair, entry);
    }
    Ok(matrix)
}

/// Exposure and null-model variance for one class pair.
fn pair_entry(
    rep: &Representation,
    totals: &Totals,
    alpha: &str,
    beta: &str,
) -> Result<ExposureEntry> {
    let n_alpha = class_total(totals, alpha)?;
    let n_beta = class_total(totals, beta)?;

    Ok(ExposureEntry {
        exposure: pair_exposure(rep, totals, alpha, beta)?,
        null_variance: pair_variance(totals, n_alpha, n_beta),
    })
}

fn class_total(totals: &Totals, class: &str) -> Result<f64> {
    let total = totals
        .per_class
        .get(class)
        .copied()
        .ok_or_else(|| Error::unknown_class(class))?;
    if total == 0.0 {
        return Err(Error::degenerate(format!(
            "class {class} has zero population"
        )));
    }
    Ok(total)
}

/// `E_αβ = (1/N) Σ_u n(u) r_α(u) r_β(u)`.
fn pair_exposure(rep: &Representation, totals: &Totals, alpha: &str, beta: &str) -> Result<f64> {
    let mut weighted = 0.0;
    for (unit, per_class) in rep {
        let r_alpha = per_class
            .get(alpha)
            .ok_or_else(|| Error::unknown_class(alpha))?;
        let r_beta = per_class
            .get(beta)
            .ok_or_else(|| Error::unknown_class(beta))?;
        weighted += totals.per_unit[unit] * r_alpha.ratio * r_beta.ratio;
    }
    Ok(weighted / totals.grand)
}

/// Null-model variance of the per-unit exposure term.
fn unit_variance(n_tot: f64, n_unit: f64, n_alpha: f64, n_beta: f64) -> f64 {
    let excess = n_tot / n_unit - 1.0;
    excess * excess / (n_alpha * n_beta) + excess / n_alpha + excess / n_beta
}

/// Null-model covariance between the exposure terms of two distinct units.
///
/// Taken as given from the underlying statistical derivation; it depends on
/// the class totals only, not on which units are involved.
fn units_covariance(n_alpha: f64, n_beta: f64) -> f64 {
    (1.0 - 1.0 / n_alpha) + (1.0 - 1.0 / n_beta) - 1.0
}

/// Aggregate null-model variance of `E_αβ`.
///
/// `Var0 = (1/N²)·[Σ_u n(u)²·Var_u + 2·Σ_{u0<u1} n(u0)·n(u1)·Cov]`. The
/// covariance is constant across unit pairs, and
/// `Σ_{u0<u1} n(u0)·n(u1) = ((Σn)² − Σn²)/2`, so the pair sum collapses to a
/// closed form.
fn pair_variance(totals: &Totals, n_alpha: f64, n_beta: f64) -> f64 {
    let n_tot = totals.grand;

    let mut weighted_unit_var = 0.0;
    let mut sum_sq = 0.0;
    for &n_unit in totals.per_unit.values() {
        weighted_unit_var += n_unit * n_unit * unit_variance(n_tot, n_unit, n_alpha, n_beta);
        sum_sq += n_unit * n_unit;
    }

    let pair_weight = (n_tot * n_tot - sum_sq) / 2.0;
    let covariance_term = 2.0 * pair_weight * units_covariance(n_alpha, n_beta);

    (weighted_unit_var + covariance_term) / (n_tot * n_tot)
}
