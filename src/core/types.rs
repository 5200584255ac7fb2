//! Core data model for segregation analysis.
//!
//! Everything here is an in-memory contract between pipeline stages: the
//! caller supplies a [`Distribution`] (people per category per areal unit)
//! and a [`GeometryTable`] (unit polygons), and gets back exposure matrices,
//! neighbourhood lists and clustering scores. Ordered maps are used
//! throughout so that iteration order, and therefore output order, is
//! deterministic.

use geo::Polygon;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::errors::{Error, Result};

/// Identifier of an areal unit (e.g. a census tract GEOID).
pub type UnitId = String;

/// Identifier of a population class or raw category.
pub type ClassId = String;

/// Number of people per category, per areal unit, as given in the raw data.
pub type Distribution = BTreeMap<UnitId, BTreeMap<ClassId, u64>>;

/// Aggregation of raw categories into classes: class name to the set of
/// category identifiers it covers. The sets must partition the category
/// space; that is the caller's responsibility.
pub type ClassDefinition = BTreeMap<ClassId, BTreeSet<ClassId>>;

/// Unit polygons keyed by unit id. Exterior ring is the unit's boundary.
pub type GeometryTable = BTreeMap<UnitId, Polygon<f64>>;

/// Units where each class is overrepresented, keyed by class.
pub type OverrepresentedUnits = BTreeMap<ClassId, BTreeSet<UnitId>>;

/// Neighbourhoods per class: each inner set is one maximal connected group
/// of overrepresented units, listed in a stable order (smallest member id
/// first).
pub type Neighbourhoods = BTreeMap<ClassId, Vec<BTreeSet<UnitId>>>;

/// Population totals derived from a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Total population per areal unit.
    pub per_unit: BTreeMap<UnitId, f64>,
    /// Total population per class.
    pub per_class: BTreeMap<ClassId, f64>,
    /// Grand total over the whole system.
    pub grand: f64,
}

/// Representation of one class in one unit: the local-to-global
/// concentration ratio (1.0 = exactly proportional) and its sampling
/// variance under the null model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepresentationEntry {
    pub ratio: f64,
    pub variance: f64,
}

/// Representation entries per unit, per class.
pub type Representation = BTreeMap<UnitId, BTreeMap<ClassId, RepresentationEntry>>;

/// An unordered pair of class ids, normalized so the lexicographically
/// smaller id comes first. `(α, β)` and `(β, α)` construct the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassPair {
    first: ClassId,
    second: ClassId,
}

impl ClassPair {
    pub fn new(a: impl Into<ClassId>, b: impl Into<ClassId>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &ClassId {
        &self.first
    }

    pub fn second(&self) -> &ClassId {
        &self.second
    }

    /// Whether this is a class paired with itself (isolation).
    pub fn is_isolation(&self) -> bool {
        self.first == self.second
    }
}

/// Exposure between two classes and the variance that exposure would have
/// under the spatially-random null model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureEntry {
    pub exposure: f64,
    pub null_variance: f64,
}

/// Matrix of exposures between classes, keyed by unordered pair. Symmetric
/// by construction: only one entry exists per pair, and [`ExposureMatrix::get`]
/// accepts the classes in either order. The diagonal entries are isolation
/// indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureMatrix {
    entries: BTreeMap<ClassPair, ExposureEntry>,
}

impl ExposureMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: ClassPair, entry: ExposureEntry) {
        self.entries.insert(pair, entry);
    }

    /// Look up the exposure between two classes, in either argument order.
    pub fn get(&self, a: &str, b: &str) -> Option<&ExposureEntry> {
        self.entries.get(&ClassPair::new(a, b))
    }

    /// Isolation of a class (its exposure to itself).
    pub fn isolation(&self, class: &str) -> Option<&ExposureEntry> {
        self.get(class, class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassPair, &ExposureEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Symmetric adjacency relation between areal units. The only way to add an
/// edge records both directions, so the graph cannot become asymmetric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyGraph {
    neighbours: BTreeMap<UnitId, BTreeSet<UnitId>>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit with no neighbours yet.
    pub fn add_unit(&mut self, unit: impl Into<UnitId>) {
        self.neighbours.entry(unit.into()).or_default();
    }

    /// Record that two units touch. Inserts both directions.
    pub fn add_edge(&mut self, a: impl Into<UnitId>, b: impl Into<UnitId>) {
        let (a, b) = (a.into(), b.into());
        if a == b {
            return;
        }
        self.neighbours.entry(a.clone()).or_default().insert(b.clone());
        self.neighbours.entry(b).or_default().insert(a);
    }

    /// Neighbours of a unit. Unknown unit ids are an error, not an empty set.
    pub fn neighbours(&self, unit: &str) -> Result<&BTreeSet<UnitId>> {
        self.neighbours
            .get(unit)
            .ok_or_else(|| Error::unknown_unit(unit))
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.neighbours.contains_key(unit)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitId> {
        self.neighbours.keys()
    }

    pub fn unit_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbours.values().map(BTreeSet::len).sum::<usize>() / 2
    }
}

/// Clustering score of a class: a value in `[0, 1]`, or undefined when the
/// class has no overrepresented units at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClusteringScore {
    /// 0 = maximally dispersed (every unit its own neighbourhood),
    /// 1 = a single contiguous neighbourhood.
    Defined(f64),
    /// No overrepresented units, so clustering is meaningless.
    Undefined,
}

impl ClusteringScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined => None,
        }
    }
}

/// Clustering score per class.
pub type ClusteringIndex = BTreeMap<ClassId, ClusteringScore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_pair_is_order_insensitive() {
        assert_eq!(ClassPair::new("b", "a"), ClassPair::new("a", "b"));
        assert_eq!(ClassPair::new("a", "b").first(), "a");
        assert_eq!(ClassPair::new("a", "b").second(), "b");
    }

    #[test]
    fn class_pair_detects_isolation() {
        assert!(ClassPair::new("x", "x").is_isolation());
        assert!(!ClassPair::new("x", "y").is_isolation());
    }

    #[test]
    fn exposure_matrix_lookup_is_symmetric() {
        let mut matrix = ExposureMatrix::new();
        matrix.insert(
            ClassPair::new("x", "y"),
            ExposureEntry {
                exposure: 0.5,
                null_variance: 0.1,
            },
        );
        assert_eq!(matrix.get("x", "y"), matrix.get("y", "x"));
        assert!(matrix.get("x", "z").is_none());
    }

    #[test]
    fn adjacency_edges_are_recorded_both_ways() {
        let mut graph = AdjacencyGraph::new();
        graph.add_edge("a", "b");
        assert!(graph.neighbours("a").unwrap().contains("b"));
        assert!(graph.neighbours("b").unwrap().contains("a"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn adjacency_rejects_self_loops() {
        let mut graph = AdjacencyGraph::new();
        graph.add_edge("a", "a");
        assert!(!graph.contains("a"));
    }

    #[test]
    fn adjacency_unknown_unit_is_an_error() {
        let graph = AdjacencyGraph::new();
        assert_eq!(
            graph.neighbours("missing"),
            Err(Error::unknown_unit("missing"))
        );
    }
}
