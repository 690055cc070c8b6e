/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Layouts that reposition vertices.
//!
//! Each layout only writes vertex positions, in enumeration order, centred on
//! the origin. None of them look at run state.

pub mod force;

use std::collections::{HashSet, VecDeque};
use std::f32::consts::TAU;

use euclid::default::Point2D;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{Graph, VertexId};

pub use force::{ForceConfig, force_directed};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("tree root `{0}` is not in the graph")]
    UnknownRoot(VertexId),
}

/// Layout constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Smallest circle radius
    pub circle_min_radius: f32,

    /// Circle radius added per vertex once above the minimum
    pub circle_radius_per_vertex: f32,

    pub grid_spacing: f32,

    /// Vertical distance between tree levels
    pub tree_level_height: f32,

    /// Horizontal distance between vertices on one tree level
    pub tree_spacing: f32,

    pub force: ForceConfig,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            circle_min_radius: 200.0,
            circle_radius_per_vertex: 30.0,
            grid_spacing: 150.0,
            tree_level_height: 150.0,
            tree_spacing: 120.0,
            force: ForceConfig::default(),
        }
    }
}

/// Layout to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutKind {
    Force,
    Circular,
    Grid,
    Tree { root: VertexId },
}

/// Apply a layout to `graph`
pub fn apply(graph: &mut Graph, kind: &LayoutKind, settings: &LayoutSettings) -> Result<(), LayoutError> {
    match kind {
        LayoutKind::Force => force_directed(graph, &settings.force),
        LayoutKind::Circular => circular(graph, settings),
        LayoutKind::Grid => grid(graph, settings),
        LayoutKind::Tree { root } => tree(graph, root, settings)?,
    }
    info!("Applied {kind:?} layout to {} vertices", graph.vertex_count());
    Ok(())
}

/// Place vertices on a circle, starting on the positive x axis
pub fn circular(graph: &mut Graph, settings: &LayoutSettings) {
    let count = graph.vertex_count();
    let radius = settings
        .circle_min_radius
        .max(count as f32 * settings.circle_radius_per_vertex);

    for (i, vertex) in graph.vertices_mut().enumerate() {
        let angle = i as f32 / count as f32 * TAU;
        vertex.position = Point2D::new(angle.cos() * radius, angle.sin() * radius);
    }
}

/// Place vertices row by row on a `ceil(sqrt(n))`-column grid
pub fn grid(graph: &mut Graph, settings: &LayoutSettings) {
    let count = graph.vertex_count();
    let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
    let half = cols as f32 / 2.0;
    let spacing = settings.grid_spacing;

    for (i, vertex) in graph.vertices_mut().enumerate() {
        let column = (i % cols) as f32;
        let row = (i / cols) as f32;
        vertex.position = Point2D::new((column - half) * spacing, (row - half) * spacing);
    }
}

/// Place vertices by breadth-first level from `root`, one row per level.
///
/// Direction is ignored when finding levels. Vertices unreachable from the
/// root share one extra row below the deepest level.
pub fn tree(graph: &mut Graph, root: &str, settings: &LayoutSettings) -> Result<(), LayoutError> {
    if !graph.contains_vertex(root) {
        return Err(LayoutError::UnknownRoot(root.to_string()));
    }

    let mut levels: Vec<Vec<VertexId>> = Vec::new();
    let mut seen: HashSet<VertexId> = HashSet::from([root.to_string()]);
    let mut queue = VecDeque::from([(root.to_string(), 0usize)]);

    while let Some((at, depth)) = queue.pop_front() {
        for neighbor in graph.undirected_neighbors(&at) {
            if seen.insert(neighbor.clone()) {
                queue.push_back((neighbor.clone(), depth + 1));
            }
        }
        if levels.len() <= depth {
            levels.push(Vec::new());
        }
        levels[depth].push(at);
    }

    let unreached: Vec<VertexId> = graph
        .vertex_ids()
        .filter(|id| !seen.contains(*id))
        .cloned()
        .collect();
    if !unreached.is_empty() {
        levels.push(unreached);
    }

    for (depth, level) in levels.iter().enumerate() {
        let y = depth as f32 * settings.tree_level_height;
        let width = (level.len() - 1) as f32 * settings.tree_spacing;
        for (slot, id) in level.iter().enumerate() {
            if let Some(position) = graph.position_mut(id) {
                *position = Point2D::new(slot as f32 * settings.tree_spacing - width / 2.0, y);
            }
        }
    }
    Ok(())
}
