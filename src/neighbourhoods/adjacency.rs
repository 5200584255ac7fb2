//! Adjacency graph construction from areal unit geometries.
//!
//! Two units are adjacent when their polygons touch: boundaries intersect,
//! interiors do not (the DE-9IM "touches" relation). The predicate is
//! evaluated once per unordered pair and, when it holds, both directions are
//! recorded, so the resulting graph is symmetric no matter how the
//! underlying geometry library behaves.
//!
//! The pairwise test is the `O(n²)` hot spot of the whole pipeline. A
//! bounding-box pre-filter discards pairs that cannot touch, and the
//! surviving candidates are tested on rayon's thread pool; neither changes
//! the result.

use geo::{BoundingRect, Intersects, Polygon, Rect, Relate};
use rayon::prelude::*;

use crate::config::ParallelConfig;
use crate::core::types::{AdjacencyGraph, GeometryTable, UnitId};

/// Build the symmetric touches-adjacency graph over all units in the table.
///
/// Every unit of the table appears in the graph, isolated units included.
pub fn build_adjacency(geometries: &GeometryTable) -> AdjacencyGraph {
    build_adjacency_with(geometries, &ParallelConfig::default())
}

/// [`build_adjacency`] with explicit parallelism configuration.
pub fn build_adjacency_with(geometries: &GeometryTable, config: &ParallelConfig) -> AdjacencyGraph {
    let units: Vec<(&UnitId, &Polygon<f64>)> = geometries.iter().collect();
    let boxes: Vec<Option<Rect<f64>>> = units
        .iter()
        .map(|(_, polygon)| polygon.bounding_rect())
        .collect();

    let mut candidate_pairs = Vec::new();
    for i in 0..units.len() {
        for j in (i + 1)..units.len() {
            if boxes_may_touch(&boxes[i], &boxes[j]) {
                candidate_pairs.push((i, j));
            }
        }
    }
    log::debug!(
        "adjacency: {} units, {} candidate pairs after bounding-box filter",
        units.len(),
        candidate_pairs.len()
    );

    let touching: Vec<(usize, usize)> = if config.enabled {
        candidate_pairs
            .into_par_iter()
            .filter(|&(i, j)| units[i].1.relate(units[j].1).is_touches())
            .collect()
    } else {
        candidate_pairs
            .into_iter()
            .filter(|&(i, j)| units[i].1.relate(units[j].1).is_touches())
            .collect()
    };

    let mut graph = AdjacencyGraph::new();
    for (unit, _) in &units {
        graph.add_unit((*unit).clone());
    }
    for (i, j) in touching {
        graph.add_edge(units[i].0.clone(), units[j].0.clone());
    }
    log::debug!("adjacency: {} edges", graph.edge_count());
    graph
}

/// Bounding-box pre-filter. Conservative: unknown boxes pass through to the
/// exact predicate.
fn boxes_may_touch(a: &Option<Rect<f64>>, b: &Option<Rect<f64>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.intersects(b),
        _ => true,
    }
}
