//! Neighbourhood detection: where classes concentrate, and how tightly.
//!
//! The pipeline chains four steps: flag the units where a class is
//! overrepresented, build the touches-adjacency graph from the unit
//! geometries, extract connected components of flagged units as
//! neighbourhoods, and reduce each class's component count to a clustering
//! score. Each step is usable on its own; the functions at this level wire
//! them together from raw inputs.

pub mod adjacency;
pub mod clustering;
pub mod extraction;
pub mod overrepresentation;

pub use adjacency::{build_adjacency, build_adjacency_with};
pub use clustering::score_clustering;
pub use extraction::extract_neighbourhoods;
pub use overrepresentation::{overrepresented_units, overrepresented_units_from};

use crate::config::DetectionConfig;
use crate::core::errors::Result;
use crate::core::types::{
    ClassDefinition, ClusteringIndex, Distribution, GeometryTable, Neighbourhoods,
};

/// Find the neighbourhoods where each class gathers.
///
/// Unit identifiers in `geometries` must cover every unit of the
/// distribution; a flagged unit missing from the geometry table surfaces as
/// [`crate::Error::UnknownUnit`].
pub fn neighbourhoods(
    distribution: &Distribution,
    geometries: &GeometryTable,
    classes: Option<&ClassDefinition>,
    config: &DetectionConfig,
) -> Result<Neighbourhoods> {
    let flagged = overrepresented_units(distribution, classes, config)?;
    let graph = build_adjacency(geometries);
    extract_neighbourhoods(&flagged, &graph)
}

/// Compute the clustering index of every class.
pub fn clustering(
    distribution: &Distribution,
    geometries: &GeometryTable,
    classes: Option<&ClassDefinition>,
    config: &DetectionConfig,
) -> Result<ClusteringIndex> {
    let flagged = overrepresented_units(distribution, classes, config)?;
    let graph = build_adjacency(geometries);
    let extracted = extract_neighbourhoods(&flagged, &graph)?;
    score_clustering(&flagged, &extracted)
}
