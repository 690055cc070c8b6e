/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Force-directed layout.
//!
//! Uses:
//! - Coulomb-like repulsion `k² / d` between every vertex pair
//! - Attraction `d² / k` along every edge
//! - Forces recomputed from scratch each iteration and applied together
//! - Per-iteration displacement capped at `max_step`, scaled by `damping`
//!
//! No randomness: the same positions and edges always produce the same result.

use euclid::default::{Point2D, Vector2D};
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// Offset added to every distance so coincident vertices stay finite
const DISTANCE_EPSILON: f32 = 0.1;

/// Force layout configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Number of simulation iterations
    pub iterations: usize,

    /// Ideal edge length constant `k`
    pub k: f32,

    /// Fraction of the capped force applied per iteration
    pub damping: f32,

    /// Largest force magnitude taken into account per iteration
    pub max_step: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            k: 100.0,
            damping: 0.1,
            max_step: 50.0,
        }
    }
}

/// Force simulation over a snapshot of positions
pub struct ForceLayout {
    pub config: ForceConfig,
    positions: Vec<Point2D<f32>>,
    /// Edge endpoints by enumeration position; dangling edges are left out
    springs: Vec<(usize, usize)>,
}

impl ForceLayout {
    /// Capture the current positions and edges of `graph`
    pub fn new(config: ForceConfig, graph: &Graph) -> Self {
        let positions = graph.vertices().map(|v| v.position).collect();
        let springs = graph
            .edges()
            .iter()
            .filter_map(|e| Some((graph.vertex_index(&e.from)?, graph.vertex_index(&e.to)?)))
            .collect();
        Self {
            config,
            positions,
            springs,
        }
    }

    pub fn positions(&self) -> &[Point2D<f32>] {
        &self.positions
    }

    /// Run one iteration
    pub fn step(&mut self) {
        let k = self.config.k;
        let mut forces = vec![Vector2D::<f32>::zero(); self.positions.len()];

        // Repulsion between every pair
        for i in 0..self.positions.len() {
            for j in (i + 1)..self.positions.len() {
                let delta = self.positions[j] - self.positions[i];
                let distance = delta.length() + DISTANCE_EPSILON;
                let push = delta * ((k * k) / distance / distance);
                forces[i] -= push;
                forces[j] += push;
            }
        }

        // Attraction along edges
        for &(from, to) in &self.springs {
            let delta = self.positions[to] - self.positions[from];
            let distance = delta.length() + DISTANCE_EPSILON;
            let pull = delta * ((distance * distance) / k / distance);
            forces[from] += pull;
            forces[to] -= pull;
        }

        for (position, force) in self.positions.iter_mut().zip(&forces) {
            let magnitude = force.length();
            if magnitude > 0.0 {
                *position += *force / magnitude * (self.config.damping * magnitude.min(self.config.max_step));
            }
        }
    }

    /// Run every configured iteration and write positions back to `graph`
    pub fn run(mut self, graph: &mut Graph) {
        for _ in 0..self.config.iterations {
            self.step();
        }
        for (vertex, position) in graph.vertices_mut().zip(self.positions) {
            vertex.position = position;
        }
    }
}

/// Lay `graph` out with the force simulation
pub fn force_directed(graph: &mut Graph, config: &ForceConfig) {
    ForceLayout::new(*config, graph).run(graph);
}
