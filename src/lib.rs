//! stratmap: residential segregation analysis from areal population counts.
//!
//! Given a population distribution (people per category, per areal unit)
//! and the unit geometries, this crate computes:
//!
//! - the **exposure matrix** between population classes, including each
//!   class's isolation, together with the variance the matrix would exhibit
//!   under a spatially-random null model ([`exposure`]);
//! - the **neighbourhoods** where each class is statistically
//!   overrepresented ([`neighbourhoods`]) and a per-class **clustering
//!   index** in `[0, 1]` summarizing how contiguous those neighbourhoods
//!   are ([`clustering`]).
//!
//! All operations are pure functions over in-memory tables; the caller owns
//! all I/O.

// Export modules for library usage
pub mod aggregation;
pub mod config;
pub mod core;
pub mod exposure;
pub mod neighbourhoods;
pub mod representation;

// Re-export commonly used types
pub use crate::core::{
    AdjacencyGraph, ClassDefinition, ClassId, ClassPair, ClusteringIndex, ClusteringScore,
    Distribution, Error, ExposureEntry, ExposureMatrix, GeometryTable, Neighbourhoods,
    OverrepresentedUnits, Representation, RepresentationEntry, Result, Totals, UnitId,
};

pub use crate::aggregation::{categories, compute_totals, regroup_per_class};
pub use crate::config::{DetectionConfig, ParallelConfig};
pub use crate::exposure::exposure;
pub use crate::neighbourhoods::{
    build_adjacency, build_adjacency_with, clustering, extract_neighbourhoods, neighbourhoods,
    overrepresented_units, overrepresented_units_from, score_clustering,
};
pub use crate::representation::representation;
