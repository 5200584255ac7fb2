//! Extraction of neighbourhoods as connected components.
//!
//! For each class, the adjacency graph is restricted to the units where the
//! class is overrepresented; every connected component of that induced
//! subgraph is one neighbourhood. A flagged unit with no flagged neighbour
//! forms a singleton neighbourhood.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use crate::core::errors::Result;
use crate::core::types::{AdjacencyGraph, Neighbourhoods, OverrepresentedUnits, UnitId};

/// Extract the neighbourhoods of every class.
///
/// Component membership does not depend on any iteration order; the list of
/// neighbourhoods per class is sorted by each component's smallest unit id.
///
/// # Errors
///
/// [`crate::Error::UnknownUnit`] when a flagged unit is absent from the
/// adjacency graph.
pub fn extract_neighbourhoods(
    overrepresented: &OverrepresentedUnits,
    adjacency: &AdjacencyGraph,
) -> Result<Neighbourhoods> {
    let mut neighbourhoods = Neighbourhoods::new();
    for (class, flagged) in overrepresented {
        let components = induced_components(flagged, adjacency)?;
        log::debug!(
            "class {class}: {} overrepresented units in {} neighbourhoods",
            flagged.len(),
            components.len()
        );
        neighbourhoods.insert(class.clone(), components);
    }
    Ok(neighbourhoods)
}

/// Connected components of the adjacency subgraph induced by `flagged`.
fn induced_components(
    flagged: &BTreeSet<UnitId>,
    adjacency: &AdjacencyGraph,
) -> Result<Vec<BTreeSet<UnitId>>> {
    let mut graph: UnGraph<&UnitId, ()> = UnGraph::default();
    let mut index_of = BTreeMap::new();
    for unit in flagged {
        index_of.insert(unit, graph.add_node(unit));
    }

    for unit in flagged {
        for neighbour in adjacency.neighbours(unit)? {
            // One edge per unordered pair; the relation is symmetric.
            if unit < neighbour {
                if let Some(&target) = index_of.get(neighbour) {
                    graph.add_edge(index_of[unit], target, ());
                }
            }
        }
    }

    let mut sets: UnionFind<usize> = UnionFind::new(graph.node_count());
    for edge in graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut by_root: BTreeMap<usize, BTreeSet<UnitId>> = BTreeMap::new();
    for (unit, node) in &index_of {
        by_root
            .entry(sets.find(node.index()))
            .or_default()
            .insert((*unit).clone());
    }

    let mut components: Vec<BTreeSet<UnitId>> = by_root.into_values().collect();
    components.sort_by(|a, b| a.iter().next().cmp(&b.iter().next()));
    Ok(components)
}
