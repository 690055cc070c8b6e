/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Adapter layer between the workbench `Graph` and petgraph.
//!
//! Produces a directed `StableGraph` where every undirected edge is expanded
//! into two arcs, so petgraph's directed algorithms see exactly the
//! neighbor relation the traversal engine uses. Dangling edges are dropped.

use super::{Graph, VertexId};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use std::collections::HashMap;

/// Mapping between workbench and petgraph representations
pub struct PetgraphAdapter {
    /// The petgraph representation; node weights are vertex ids, edge weights are edge weights
    pub graph: StableGraph<VertexId, f64>,

    index_of: HashMap<VertexId, NodeIndex>,
}

impl PetgraphAdapter {
    /// Convert a workbench Graph to a petgraph StableGraph
    pub fn from_graph(graph: &Graph) -> Self {
        let mut petgraph = StableGraph::new();
        let mut index_of = HashMap::new();

        for vertex in graph.vertices() {
            let idx = petgraph.add_node(vertex.id.clone());
            index_of.insert(vertex.id.clone(), idx);
        }

        for edge in graph.edges() {
            if let (Some(&from_idx), Some(&to_idx)) =
                (index_of.get(&edge.from), index_of.get(&edge.to))
            {
                petgraph.add_edge(from_idx, to_idx, edge.weight);
                if !edge.directed && from_idx != to_idx {
                    petgraph.add_edge(to_idx, from_idx, edge.weight);
                }
            }
        }

        Self {
            graph: petgraph,
            index_of,
        }
    }

    /// Get NodeIndex from a vertex id
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index_of.get(id).copied()
    }

    /// Get the vertex id stored at a NodeIndex
    pub fn vertex_id(&self, idx: NodeIndex) -> Option<&VertexId> {
        self.graph.node_weight(idx)
    }
}
