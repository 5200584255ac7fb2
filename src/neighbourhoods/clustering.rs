//! Clustering index: how concentrated a class's neighbourhoods are.
//!
//! With `Nu` overrepresented units grouped into `Nc` neighbourhoods, the
//! index is
//!
//! ```text
//! clustering = 1 − ((Nc/Nu − 1/Nu) / (1 − 1/Nu))
//! ```
//!
//! which is 0 when every unit stands alone (`Nc = Nu`, a checkerboard) and 1
//! when all units form a single contiguous neighbourhood (`Nc = 1`).

use crate::core::errors::{Error, Result};
use crate::core::types::{ClusteringIndex, ClusteringScore, Neighbourhoods, OverrepresentedUnits};

/// Score the clustering of every class from its unit and neighbourhood
/// counts.
///
/// A class with no overrepresented units gets
/// [`ClusteringScore::Undefined`]; a single flagged unit is trivially one
/// cluster and scores 1.
///
/// # Errors
///
/// [`Error::InconsistentCount`] when a class has more neighbourhoods than
/// overrepresented units.
pub fn score_clustering(
    overrepresented: &OverrepresentedUnits,
    neighbourhoods: &Neighbourhoods,
) -> Result<ClusteringIndex> {
    let mut index = ClusteringIndex::new();
    for (class, flagged) in overrepresented {
        let unit_count = flagged.len();
        let neighbourhood_count = neighbourhoods.get(class).map_or(0, Vec::len);
        if neighbourhood_count > unit_count {
            return Err(Error::InconsistentCount {
                class: class.clone(),
                neighbourhoods: neighbourhood_count,
                units: unit_count,
            });
        }
        index.insert(class.clone(), single_clustering(unit_count, neighbourhood_count));
    }
    Ok(index)
}

/// Clustering score for one class.
fn single_clustering(unit_count: usize, neighbourhood_count: usize) -> ClusteringScore {
    match unit_count {
        0 => ClusteringScore::Undefined,
        1 => ClusteringScore::Defined(1.0),
        _ => {
            let nu = unit_count as f64;
            let nc = neighbourhood_count as f64;
            ClusteringScore::Defined(1.0 - ((nc / nu - 1.0 / nu) / (1.0 - 1.0 / nu)))
        }
    }
}
