/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Interactive graph algorithm workbench.
//!
//! A mutable graph store with per-edge directedness, a stepwise traversal
//! engine for BFS, DFS and Dijkstra driven manually or by a timer, structural
//! analysis (components, cut vertices, bridges) and vertex layouts.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod graph;
pub mod input;
pub mod layout;
pub mod persistence;
pub mod render;
pub mod run;
pub mod search;
pub mod timer;
pub mod traversal;

pub use app::{AppError, GraphLabApp};
pub use graph::{Edge, Graph, GraphError, Vertex, VertexId};
pub use run::{ExecutionMode, RunController, RunRequest, StepStatus};
pub use traversal::{AlgorithmKind, InvalidSelection, RunOutcome};
