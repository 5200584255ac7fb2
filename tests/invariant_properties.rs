//! Property-based tests for the pipeline invariants.
//!
//! These verify properties that should hold for all inputs:
//! - The exposure matrix is symmetric and its null variances non-negative
//! - The adjacency graph is symmetric, and parallel and sequential builds
//!   agree
//! - Neighbourhood extraction partitions the flagged units and ignores
//!   input ordering
//! - Clustering scores stay in `[0, 1]` and hit the documented endpoints

use geo::{LineString, Polygon};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use stratmap::{
    build_adjacency_with, exposure, extract_neighbourhoods, score_clustering, AdjacencyGraph,
    ClassId, ClusteringScore, Distribution, Neighbourhoods, OverrepresentedUnits, ParallelConfig,
    UnitId,
};

const CLASS_POOL: &[&str] = &["a", "b", "c"];

/// Distribution over 2..=4 units and 2..=3 classes with strictly positive
/// counts, so no totals are degenerate.
fn arb_distribution() -> impl Strategy<Value = Distribution> {
    (2usize..=4, 2usize..=3).prop_flat_map(|(unit_count, class_count)| {
        proptest::collection::vec(
            proptest::collection::vec(1u64..=100, class_count),
            unit_count,
        )
        .prop_map(move |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, counts)| {
                    let per_class: BTreeMap<ClassId, u64> = counts
                        .into_iter()
                        .enumerate()
                        .map(|(j, count)| (CLASS_POOL[j].to_string(), count))
                        .collect();
                    (format!("u{i}"), per_class)
                })
                .collect()
        })
    })
}

/// Unit square with lower-left corner at `(x, y)`.
fn square(x: f64, y: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x, y),
            (x + 1.0, y),
            (x + 1.0, y + 1.0),
            (x, y + 1.0),
            (x, y),
        ]),
        vec![],
    )
}

proptest! {
    /// Property: one entry per unordered class pair, readable in either
    /// order, with a non-negative null variance.
    #[test]
    fn prop_exposure_matrix_symmetric_with_nonnegative_variance(
        dist in arb_distribution()
    ) {
        let matrix = exposure(&dist, None).unwrap();

        let classes: Vec<ClassId> = dist
            .values()
            .next()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        for a in &classes {
            for b in &classes {
                prop_assert_eq!(matrix.get(a, b), matrix.get(b, a));
                prop_assert!(matrix.get(a, b).is_some());
            }
        }
        for (_, entry) in matrix.iter() {
            prop_assert!(entry.exposure.is_finite());
            prop_assert!(entry.null_variance >= 0.0);
        }
    }

    /// Property: the touches relation is recorded in both directions for
    /// every pair, and parallel evaluation changes nothing.
    #[test]
    fn prop_adjacency_is_symmetric(cells in proptest::collection::btree_set((0u8..4, 0u8..4), 1..8)) {
        let geometries = cells
            .iter()
            .map(|&(x, y)| {
                (format!("u{x}_{y}"), square(f64::from(x), f64::from(y)))
            })
            .collect();

        let graph = build_adjacency_with(&geometries, &ParallelConfig { enabled: true });
        let sequential = build_adjacency_with(&geometries, &ParallelConfig { enabled: false });
        prop_assert_eq!(&graph, &sequential);

        for a in graph.units() {
            for b in graph.neighbours(a).unwrap() {
                prop_assert!(graph.neighbours(b).unwrap().contains(a));
            }
        }
    }

    /// Property: neighbourhoods partition the flagged units (every flagged
    /// unit lands in exactly one component) and the result does not depend
    /// on the order flags arrive in.
    #[test]
    fn prop_extraction_partitions_flagged_units(
        edges in proptest::collection::btree_set((0u8..6, 0u8..6), 0..10),
        flag_mask in proptest::collection::vec(any::<bool>(), 6)
    ) {
        let mut graph = AdjacencyGraph::new();
        for i in 0..6u8 {
            graph.add_unit(format!("u{i}"));
        }
        for &(a, b) in &edges {
            if a != b {
                graph.add_edge(format!("u{a}"), format!("u{b}"));
            }
        }

        let flagged_units: BTreeSet<UnitId> = flag_mask
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| format!("u{i}"))
            .collect();
        let mut flagged = OverrepresentedUnits::new();
        flagged.insert("x".to_string(), flagged_units.clone());

        let extracted = extract_neighbourhoods(&flagged, &graph).unwrap();
        let again = extract_neighbourhoods(&flagged, &graph).unwrap();
        prop_assert_eq!(&extracted, &again);

        let components = &extracted["x"];
        let mut seen = BTreeSet::new();
        for component in components {
            prop_assert!(!component.is_empty());
            for unit in component {
                prop_assert!(seen.insert(unit.clone()), "unit in two components");
            }
        }
        prop_assert_eq!(seen, flagged_units);
    }

    /// Property: clustering is in `[0, 1]` whenever there are flagged units,
    /// exactly 0 for a checkerboard and exactly 1 for a single component.
    #[test]
    fn prop_clustering_stays_in_unit_interval(
        unit_count in 1usize..10,
        extra_components in 0usize..9
    ) {
        let component_count = (1 + extra_components).min(unit_count);

        let all_units: Vec<UnitId> = (0..unit_count).map(|i| format!("u{i}")).collect();
        let mut flagged = OverrepresentedUnits::new();
        flagged.insert("x".to_string(), all_units.iter().cloned().collect());

        // First `component_count - 1` units stand alone, the rest form one
        // component.
        let mut components: Vec<BTreeSet<UnitId>> = all_units[..component_count - 1]
            .iter()
            .map(|unit| std::iter::once(unit.clone()).collect())
            .collect();
        components.push(all_units[component_count - 1..].iter().cloned().collect());
        let mut neigh = Neighbourhoods::new();
        neigh.insert("x".to_string(), components);

        let index = score_clustering(&flagged, &neigh).unwrap();
        prop_assert!(index["x"] != ClusteringScore::Undefined);
        let score = index["x"].value().unwrap();

        prop_assert!((0.0..=1.0).contains(&score));
        if component_count == 1 {
            prop_assert_eq!(score, 1.0);
        }
        if unit_count > 1 && component_count == unit_count {
            prop_assert_eq!(score, 0.0);
        }
    }
}
