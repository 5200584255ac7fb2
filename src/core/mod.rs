//! Core data model and shared error types.

pub mod errors;
pub mod types;

pub use errors::{Error, Result};
pub use types::{
    AdjacencyGraph, ClassDefinition, ClassId, ClassPair, ClusteringIndex, ClusteringScore,
    Distribution, ExposureEntry, ExposureMatrix, GeometryTable, Neighbourhoods,
    OverrepresentedUnits, Representation, RepresentationEntry, Totals, UnitId,
};
