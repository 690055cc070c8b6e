/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Structural analysis: connected components, cut vertices and bridges.
//!
//! Everything here works on the underlying undirected structure: an edge
//! joins its endpoints regardless of its directed flag. Dangling edges are
//! ignored.

use std::collections::VecDeque;

use log::info;
use thiserror::Error;

use crate::graph::{EdgeIndex, Graph, VertexId};

/// Colours given to components, reused cyclically
pub const COMPONENT_PALETTE: [&str; 10] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6", "#bcf60c",
    "#fabebe", "#008080",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("the graph has no vertices")]
    EmptyGraph,
}

/// An edge whose removal disconnects its endpoints.
///
/// `from` is the endpoint the depth-first search reached first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bridge {
    pub edge: EdgeIndex,
    pub from: VertexId,
    pub to: VertexId,
}

/// Cut vertices and bridges found by one low-link pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Articulation {
    /// In vertex enumeration order
    pub cut_vertices: Vec<VertexId>,

    /// In edge-list order
    pub bridges: Vec<Bridge>,
}

/// Direction-agnostic adjacency by enumeration position: `(neighbor, edge)`
/// pairs in edge-list order.
fn adjacency(graph: &Graph) -> Vec<Vec<(usize, EdgeIndex)>> {
    let mut adjacency = vec![Vec::new(); graph.vertex_count()];
    for (index, edge) in graph.edges().iter().enumerate() {
        let (Some(from), Some(to)) = (graph.vertex_index(&edge.from), graph.vertex_index(&edge.to))
        else {
            continue;
        };
        adjacency[from].push((to, index));
        if from != to {
            adjacency[to].push((from, index));
        }
    }
    adjacency
}

fn ensure_not_empty(graph: &Graph) -> Result<(), AnalysisError> {
    if graph.is_empty() {
        Err(AnalysisError::EmptyGraph)
    } else {
        Ok(())
    }
}

/// Connected components in discovery order. Each component lists its
/// vertices in breadth-first order from its first enumerated vertex.
pub fn connected_components(graph: &Graph) -> Result<Vec<Vec<VertexId>>, AnalysisError> {
    ensure_not_empty(graph)?;

    let ids: Vec<&VertexId> = graph.vertex_ids().collect();
    let adjacency = adjacency(graph);
    let mut seen = vec![false; ids.len()];
    let mut components = Vec::new();

    for start in 0..ids.len() {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        let mut component = Vec::new();

        while let Some(at) = queue.pop_front() {
            component.push(ids[at].clone());
            for &(to, _) in &adjacency[at] {
                if !seen[to] {
                    seen[to] = true;
                    queue.push_back(to);
                }
            }
        }
        components.push(component);
    }

    Ok(components)
}

/// One depth-first search frame
struct Frame {
    vertex: usize,
    /// Edge used to enter `vertex`; `None` for a tree root
    parent_edge: Option<EdgeIndex>,
    cursor: usize,
    children: usize,
}

/// Tarjan's low-link pass with an explicit stack.
///
/// Only the exact edge used to enter a vertex is skipped when looking back at
/// the parent, so a second edge to the parent counts as a back edge.
pub fn articulation(graph: &Graph) -> Result<Articulation, AnalysisError> {
    ensure_not_empty(graph)?;

    let ids: Vec<&VertexId> = graph.vertex_ids().collect();
    let adjacency = adjacency(graph);
    let n = ids.len();

    let mut disc: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0usize; n];
    let mut is_cut = vec![false; n];
    let mut bridges: Vec<Bridge> = Vec::new();
    let mut time = 0usize;
    let mut stack: Vec<Frame> = Vec::new();

    for root in 0..n {
        if disc[root].is_some() {
            continue;
        }
        disc[root] = Some(time);
        low[root] = time;
        time += 1;
        stack.push(Frame {
            vertex: root,
            parent_edge: None,
            cursor: 0,
            children: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let at = frame.vertex;

            if let Some(&(to, edge)) = adjacency[at].get(frame.cursor) {
                frame.cursor += 1;
                if frame.parent_edge == Some(edge) {
                    continue;
                }
                match disc[to] {
                    Some(seen_at) => low[at] = low[at].min(seen_at),
                    None => {
                        frame.children += 1;
                        disc[to] = Some(time);
                        low[to] = time;
                        time += 1;
                        stack.push(Frame {
                            vertex: to,
                            parent_edge: Some(edge),
                            cursor: 0,
                            children: 0,
                        });
                    },
                }
                continue;
            }

            // Every neighbor of `at` explored: report to the parent frame
            let children = frame.children;
            let entered_by = frame.parent_edge;
            stack.pop();

            match (stack.last(), entered_by) {
                (Some(parent), Some(edge)) => {
                    let up = parent.vertex;
                    low[up] = low[up].min(low[at]);
                    let up_disc = disc[up].unwrap_or_default();
                    if low[at] > up_disc {
                        bridges.push(Bridge {
                            edge,
                            from: ids[up].clone(),
                            to: ids[at].clone(),
                        });
                    }
                    if parent.parent_edge.is_some() && low[at] >= up_disc {
                        is_cut[up] = true;
                    }
                },
                _ => {
                    if children > 1 {
                        is_cut[at] = true;
                    }
                },
            }
        }
    }

    bridges.sort_by_key(|bridge| bridge.edge);
    let cut_vertices = ids
        .iter()
        .zip(&is_cut)
        .filter(|(_, cut)| **cut)
        .map(|(id, _)| (*id).clone())
        .collect();

    Ok(Articulation {
        cut_vertices,
        bridges,
    })
}

/// Vertices whose removal disconnects part of the graph
pub fn cut_vertices(graph: &Graph) -> Result<Vec<VertexId>, AnalysisError> {
    Ok(articulation(graph)?.cut_vertices)
}

pub fn bridges(graph: &Graph) -> Result<Vec<Bridge>, AnalysisError> {
    Ok(articulation(graph)?.bridges)
}

/// Edge indices of all bridges, for highlighting
pub fn bridge_edge_indices(graph: &Graph) -> Result<Vec<EdgeIndex>, AnalysisError> {
    Ok(bridges(graph)?.into_iter().map(|bridge| bridge.edge).collect())
}

/// Colour every component with its own palette entry. Returns the number of
/// components.
pub fn colour_components(graph: &mut Graph) -> Result<usize, AnalysisError> {
    let components = connected_components(graph)?;
    for (index, component) in components.iter().enumerate() {
        let colour = COMPONENT_PALETTE[index % COMPONENT_PALETTE.len()];
        for id in component {
            if let Some(vertex) = graph.vertex_mut(id) {
                vertex.style.color = colour.to_string();
            }
        }
    }
    info!("Coloured {} components", components.len());
    Ok(components.len())
}
