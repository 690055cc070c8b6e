/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph data structures for the algorithm workbench.
//!
//! Core structures:
//! - `Graph`: vertex map (insertion ordered) plus an ordered edge list
//! - `Vertex`: identified vertex with a label, position and cosmetic style
//! - `Edge`: weighted connection whose directedness is a per-edge flag
//!
//! Edges have no identity beyond their position in the edge list. Removing an
//! edge (directly or through `remove_vertex`) shifts every later index, so any
//! stored `EdgeIndex` must be reacquired after a removal.

use euclid::default::Point2D;
use indexmap::IndexMap;
use log::warn;
use thiserror::Error;

use crate::persistence::types::{GraphSnapshot, PersistedEdge, PersistedVertex};

pub mod petgraph_adapter;

/// Vertex identifier. Unique within a graph and never reused while the vertex lives.
pub type VertexId = String;

/// Position of an edge in the graph's edge list.
pub type EdgeIndex = usize;

pub const DEFAULT_VERTEX_COLOR: &str = "#208141";
pub const DEFAULT_VERTEX_RADIUS: f32 = 25.0;
pub const DEFAULT_EDGE_COLOR: &str = "#626c7c";
pub const DEFAULT_EDGE_WIDTH: f32 = 2.0;
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Cosmetic vertex attributes. Never read by algorithms.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexStyle {
    pub color: String,
    pub radius: f32,
}

impl Default for VertexStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_VERTEX_COLOR.to_string(),
            radius: DEFAULT_VERTEX_RADIUS,
        }
    }
}

/// Cosmetic edge attributes. Never read by algorithms.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub color: String,
    pub width: f32,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_EDGE_COLOR.to_string(),
            width: DEFAULT_EDGE_WIDTH,
        }
    }
}

/// A vertex in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Stable identifier
    pub id: VertexId,

    /// Display label (not required to be unique)
    pub label: String,

    /// Position in graph space, owned by the layout engine
    pub position: Point2D<f32>,

    pub style: VertexStyle,
}

/// A weighted edge between two vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,

    /// Used by Dijkstra; defaults to 1
    pub weight: f64,

    pub label: String,

    pub style: EdgeStyle,

    /// Whether this particular edge only runs `from -> to`
    pub directed: bool,
}

impl Edge {
    /// Traversal neighbor of `vertex` through this edge.
    ///
    /// `vertex` reaches `to` when it is the `from` endpoint, and reaches `from`
    /// when it is the `to` endpoint of an undirected edge. A directed edge only
    /// ever contributes a neighbor in its declared direction.
    pub fn neighbor_of(&self, vertex: &str) -> Option<&VertexId> {
        if self.from == vertex {
            Some(&self.to)
        } else if !self.directed && self.to == vertex {
            Some(&self.from)
        } else {
            None
        }
    }

    /// Neighbor of `vertex` in the underlying undirected structure, ignoring
    /// the directed flag.
    pub fn undirected_neighbor_of(&self, vertex: &str) -> Option<&VertexId> {
        if self.from == vertex {
            Some(&self.to)
        } else if self.to == vertex {
            Some(&self.from)
        } else {
            None
        }
    }

    /// Whether either endpoint is `vertex`
    pub fn touches(&self, vertex: &str) -> bool {
        self.from == vertex || self.to == vertex
    }
}

/// Errors from graph mutations
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("a vertex with id `{0}` already exists")]
    DuplicateId(VertexId),

    #[error("edge index {index} is out of range (graph has {len} edges)")]
    EdgeIndexOutOfRange { index: EdgeIndex, len: usize },

    #[error("the graph cannot be edited while an algorithm run is active")]
    RunInProgress,
}

/// Main graph structure: insertion-ordered vertex map plus an ordered edge list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    vertices: IndexMap<VertexId, Vertex>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new vertex.
    ///
    /// Fails if `id` is already taken. A label shared with an existing vertex
    /// is accepted and logged.
    pub fn add_vertex(
        &mut self,
        id: impl Into<VertexId>,
        label: impl Into<String>,
        position: Point2D<f32>,
        style: VertexStyle,
    ) -> Result<&Vertex, GraphError> {
        let id = id.into();
        if self.vertices.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }

        let label = label.into();
        if self.vertices.values().any(|v| v.label == label) {
            warn!("Vertex `{id}` reuses the label `{label}`");
        }

        let entry = self.vertices.entry(id.clone()).or_insert(Vertex {
            id,
            label,
            position,
            style,
        });
        Ok(&*entry)
    }

    /// Append an edge and return its index.
    ///
    /// Endpoints are not validated; traversal code skips dangling endpoints.
    pub fn add_edge(
        &mut self,
        from: impl Into<VertexId>,
        to: impl Into<VertexId>,
        weight: f64,
        label: impl Into<String>,
        style: EdgeStyle,
        directed: bool,
    ) -> EdgeIndex {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            weight,
            label: label.into(),
            style,
            directed,
        });
        self.edges.len() - 1
    }

    /// Remove a vertex together with every edge that touches it
    pub fn remove_vertex(&mut self, id: &str) -> Option<Vertex> {
        let vertex = self.vertices.shift_remove(id)?;
        self.edges.retain(|e| !e.touches(id));
        Some(vertex)
    }

    /// Remove the edge at `index`, shifting later edges down by one
    pub fn remove_edge(&mut self, index: EdgeIndex) -> Result<Edge, GraphError> {
        if index >= self.edges.len() {
            return Err(GraphError::EdgeIndexOutOfRange {
                index,
                len: self.edges.len(),
            });
        }
        Ok(self.edges.remove(index))
    }

    /// Remove every vertex and edge
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }

    /// Get a vertex by id
    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Get a mutable vertex by id
    pub fn vertex_mut(&mut self, id: &str) -> Option<&mut Vertex> {
        self.vertices.get_mut(id)
    }

    /// Mutable position of a vertex, for dragging and layouts
    pub fn position_mut(&mut self, id: &str) -> Option<&mut Point2D<f32>> {
        self.vertices.get_mut(id).map(|v| &mut v.position)
    }

    pub fn contains_vertex(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// Enumeration position of a vertex
    pub fn vertex_index(&self, id: &str) -> Option<usize> {
        self.vertices.get_index_of(id)
    }

    /// Iterate over vertices in enumeration (insertion) order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Iterate mutably over vertices in enumeration order
    pub fn vertices_mut(&mut self) -> impl Iterator<Item = &mut Vertex> {
        self.vertices.values_mut()
    }

    /// Vertex ids in enumeration order
    pub fn vertex_ids(&self) -> impl Iterator<Item = &VertexId> {
        self.vertices.keys()
    }

    /// Edges in list order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn edge_mut(&mut self, index: EdgeIndex) -> Option<&mut Edge> {
        self.edges.get_mut(index)
    }

    /// Traversal neighbors of `vertex`, in edge-list order.
    ///
    /// Uses [`Edge::neighbor_of`] and skips endpoints that are not in the graph.
    pub fn neighbors<'a>(&'a self, vertex: &'a str) -> impl Iterator<Item = &'a VertexId> + 'a {
        self.edges
            .iter()
            .filter_map(move |e| e.neighbor_of(vertex))
            .filter(move |n| self.vertices.contains_key(n.as_str()))
    }

    /// Direction-agnostic neighbors of `vertex`, in edge-list order
    pub fn undirected_neighbors<'a>(
        &'a self,
        vertex: &'a str,
    ) -> impl Iterator<Item = &'a VertexId> + 'a {
        self.edges
            .iter()
            .filter_map(move |e| e.undirected_neighbor_of(vertex))
            .filter(move |n| self.vertices.contains_key(n.as_str()))
    }

    /// Ids of vertices carrying `label`
    pub fn vertices_with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a VertexId> {
        self.vertices
            .values()
            .filter(move |v| v.label == label)
            .map(|v| &v.id)
    }

    /// First free id derived from `label`: `label`, then `label1`, `label2`, ...
    pub fn next_free_id(&self, label: &str) -> VertexId {
        let mut id = label.to_string();
        let mut counter = 1;
        while self.vertices.contains_key(&id) {
            id = format!("{label}{counter}");
            counter += 1;
        }
        id
    }

    /// Count of vertices in the graph
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Count of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Serialize the graph to an order-preserving snapshot
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let vertices = self
            .vertices()
            .map(|v| PersistedVertex {
                id: v.id.clone(),
                label: Some(v.label.clone()),
                x: v.position.x,
                y: v.position.y,
                color: Some(v.style.color.clone()),
                radius: Some(v.style.radius),
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|e| PersistedEdge {
                from: e.from.clone(),
                to: e.to.clone(),
                weight: Some(e.weight),
                label: Some(e.label.clone()),
                color: Some(e.style.color.clone()),
                width: Some(e.style.width),
                is_directed: Some(e.directed),
            })
            .collect();

        GraphSnapshot { vertices, edges }
    }

    /// Rebuild a graph from a snapshot, defaulting any omitted optional field.
    ///
    /// A vertex id repeated inside the snapshot keeps its first occurrence.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        let mut graph = Graph::new();

        for pvertex in &snapshot.vertices {
            let label = pvertex.label.clone().unwrap_or_else(|| pvertex.id.clone());
            let style = VertexStyle {
                color: pvertex
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VERTEX_COLOR.to_string()),
                radius: pvertex.radius.unwrap_or(DEFAULT_VERTEX_RADIUS),
            };
            if let Err(e) = graph.add_vertex(
                pvertex.id.clone(),
                label,
                Point2D::new(pvertex.x, pvertex.y),
                style,
            ) {
                warn!("Skipping snapshot vertex: {e}");
            }
        }

        for pedge in &snapshot.edges {
            let style = EdgeStyle {
                color: pedge
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_EDGE_COLOR.to_string()),
                width: pedge.width.unwrap_or(DEFAULT_EDGE_WIDTH),
            };
            graph.add_edge(
                pedge.from.clone(),
                pedge.to.clone(),
                pedge.weight.unwrap_or(DEFAULT_EDGE_WEIGHT),
                pedge.label.clone().unwrap_or_default(),
                style,
                pedge.is_directed.unwrap_or(false),
            );
        }

        graph
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Add an undirected unit-weight edge
    pub(crate) fn link(graph: &mut Graph, from: &str, to: &str) -> EdgeIndex {
        graph.add_edge(from, to, 1.0, "", EdgeStyle::default(), false)
    }

    /// Build a graph from vertex ids and undirected unit edges
    pub(crate) fn build(ids: &[&str], edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new();
        for id in ids {
            graph
                .add_vertex(*id, *id, Point2D::origin(), VertexStyle::default())
                .unwrap();
        }
        for (from, to) in edges {
            link(&mut graph, from, to);
        }
        graph
    }

    #[test]
    fn test_graph_new() {
        let graph = Graph::new();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_add_vertex() {
        let mut graph = Graph::new();
        let vertex = graph
            .add_vertex("a", "Alpha", Point2D::new(100.0, 200.0), VertexStyle::default())
            .unwrap();

        assert_eq!(vertex.id, "a");
        assert_eq!(vertex.label, "Alpha");
        assert_eq!(vertex.position.x, 100.0);
        assert_eq!(vertex.position.y, 200.0);
        assert_eq!(vertex.style.color, DEFAULT_VERTEX_COLOR);
        assert_eq!(vertex.style.radius, DEFAULT_VERTEX_RADIUS);
    }

    #[test]
    fn test_add_vertex_duplicate_id() {
        let mut graph = build(&["a"], &[]);
        let err = graph
            .add_vertex("a", "other", Point2D::origin(), VertexStyle::default())
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateId("a".to_string()));
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.vertex("a").unwrap().label, "a");
    }

    #[test]
    fn test_duplicate_label_is_accepted() {
        let mut graph = Graph::new();
        graph
            .add_vertex("1", "same", Point2D::origin(), VertexStyle::default())
            .unwrap();
        graph
            .add_vertex("2", "same", Point2D::origin(), VertexStyle::default())
            .unwrap();

        let ids: Vec<_> = graph.vertices_with_label("same").cloned().collect();
        assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_add_edge_does_not_validate_endpoints() {
        let mut graph = build(&["a"], &[]);
        let index = link(&mut graph, "a", "ghost");
        assert_eq!(index, 0);
        assert_eq!(graph.edge_count(), 1);
        // Dangling endpoints are never reported as neighbors
        assert_eq!(graph.neighbors("a").count(), 0);
    }

    #[test]
    fn test_remove_vertex_removes_incident_edges() {
        let mut graph = build(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("b", "b")],
        );

        let removed = graph.remove_vertex("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(graph.vertex_count(), 3);
        assert!(graph.edges().iter().all(|e| e.from != "b" && e.to != "b"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_remove_every_vertex_leaves_no_incident_edges() {
        let ids = ["a", "b", "c", "d"];
        let edges = [("a", "b"), ("b", "c"), ("c", "d"), ("d", "a"), ("a", "c")];
        for id in ids {
            let mut graph = build(&ids, &edges);
            graph.remove_vertex(id);
            assert!(!graph.edges().iter().any(|e| e.touches(id)));
        }
    }

    #[test]
    fn test_remove_nonexistent_vertex() {
        let mut graph = build(&["a", "b"], &[("a", "b")]);
        assert!(graph.remove_vertex("zzz").is_none());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_remove_vertex_keeps_enumeration_order() {
        let mut graph = build(&["a", "b", "c", "d"], &[]);
        graph.remove_vertex("b");
        let ids: Vec<_> = graph.vertex_ids().cloned().collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_edge_shifts_indices() {
        let mut graph = build(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let removed = graph.remove_edge(0).unwrap();
        assert_eq!((removed.from.as_str(), removed.to.as_str()), ("a", "b"));
        let first = graph.edge(0).unwrap();
        assert_eq!((first.from.as_str(), first.to.as_str()), ("b", "c"));
    }

    #[test]
    fn test_remove_edge_out_of_range() {
        let mut graph = build(&["a", "b"], &[("a", "b")]);
        assert_eq!(
            graph.remove_edge(3),
            Err(GraphError::EdgeIndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut graph = build(&["a", "b"], &[("a", "b")]);
        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_neighbor_resolution_respects_edge_direction() {
        let mut graph = build(&["a", "b", "c"], &[("a", "b")]);
        graph.add_edge("c", "a", 1.0, "", EdgeStyle::default(), true);

        let from_a: Vec<_> = graph.neighbors("a").cloned().collect();
        assert_eq!(from_a, vec!["b"]);

        let from_b: Vec<_> = graph.neighbors("b").cloned().collect();
        assert_eq!(from_b, vec!["a"]);

        let from_c: Vec<_> = graph.neighbors("c").cloned().collect();
        assert_eq!(from_c, vec!["a"]);

        let undirected_a: Vec<_> = graph.undirected_neighbors("a").cloned().collect();
        assert_eq!(undirected_a, vec!["b", "c"]);
    }

    #[test]
    fn test_self_loop_yields_one_neighbor() {
        let graph = build(&["a"], &[("a", "a")]);
        assert_eq!(graph.neighbors("a").count(), 1);
        assert_eq!(graph.undirected_neighbors("a").count(), 1);
    }

    #[test]
    fn test_next_free_id() {
        let graph = build(&["A", "A1"], &[]);
        assert_eq!(graph.next_free_id("A"), "A2");
        assert_eq!(graph.next_free_id("B"), "B");
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut graph = Graph::new();
        graph
            .add_vertex(
                "a",
                "Site A",
                Point2D::new(10.5, -20.25),
                VertexStyle {
                    color: "#ff0000".into(),
                    radius: 30.0,
                },
            )
            .unwrap();
        graph
            .add_vertex("b", "B", Point2D::new(30.0, 40.0), VertexStyle::default())
            .unwrap();
        graph.add_edge(
            "a",
            "b",
            2.5,
            "ab",
            EdgeStyle {
                color: "#000000".into(),
                width: 4.0,
            },
            true,
        );
        link(&mut graph, "b", "b");

        let restored = Graph::from_snapshot(&graph.to_snapshot());
        assert_eq!(restored, graph);
    }

    #[test]
    fn test_snapshot_empty_graph() {
        let graph = Graph::new();
        let restored = Graph::from_snapshot(&graph.to_snapshot());
        assert!(restored.is_empty());
        assert_eq!(restored.edge_count(), 0);
    }

    #[test]
    fn test_from_snapshot_defaults_missing_fields() {
        let snapshot = GraphSnapshot {
            vertices: vec![PersistedVertex {
                id: "v".into(),
                label: None,
                x: 0.0,
                y: 0.0,
                color: None,
                radius: None,
            }],
            edges: vec![PersistedEdge {
                from: "v".into(),
                to: "v".into(),
                weight: None,
                label: None,
                color: None,
                width: None,
                is_directed: None,
            }],
        };

        let graph = Graph::from_snapshot(&snapshot);
        let vertex = graph.vertex("v").unwrap();
        assert_eq!(vertex.label, "v");
        assert_eq!(vertex.style, VertexStyle::default());

        let edge = graph.edge(0).unwrap();
        assert_eq!(edge.weight, DEFAULT_EDGE_WEIGHT);
        assert_eq!(edge.label, "");
        assert_eq!(edge.style, EdgeStyle::default());
        assert!(!edge.directed);
    }
}
