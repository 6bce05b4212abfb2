//! Anchor resolution for every edge of a map.
//!
//! Anchoring is pure per edge, so a map's edges are resolved in parallel.
//! Output keeps the map's edge order.

use crate::geometry::{AnchorResult, Point, resolve_anchors};
use crate::model::{LifeMap, MapEdge, MapNode};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRoute {
    pub edge_id: String,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub anchors: AnchorResult,
    /// Middle of the straight segment, where a label would sit.
    pub midpoint: Point,
}

/// Route a single edge. `None` when either endpoint is missing from the map.
pub fn route_edge(map: &LifeMap, edge: &MapEdge) -> Option<EdgeRoute> {
    let source = map.node(&edge.source)?;
    let target = map.node(&edge.target)?;
    Some(route_between(edge, source, target))
}

/// Route all edges of the map, skipping (and logging) dangling ones.
pub fn route_edges(map: &LifeMap) -> Vec<EdgeRoute> {
    // First node wins on duplicate ids, same as `LifeMap::node`.
    let mut index: IndexMap<&str, &MapNode> = IndexMap::with_capacity(map.nodes.len());
    for node in &map.nodes {
        index.entry(node.id.as_str()).or_insert(node);
    }

    map.edges
        .par_iter()
        .filter_map(|edge| {
            let source = index.get(edge.source.as_str());
            let target = index.get(edge.target.as_str());
            match (source, target) {
                (Some(s), Some(t)) => Some(route_between(edge, s, t)),
                _ => {
                    tracing::warn!(
                        edge = %edge.id,
                        source = %edge.source,
                        target = %edge.target,
                        "skipping edge with a missing endpoint"
                    );
                    None
                }
            }
        })
        .collect()
}

fn route_between(edge: &MapEdge, source: &MapNode, target: &MapNode) -> EdgeRoute {
    let anchors = resolve_anchors(&source.shape(), &target.shape());
    EdgeRoute {
        edge_id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        midpoint: anchors.source_point.midpoint(anchors.target_point),
        anchors,
    }
}
