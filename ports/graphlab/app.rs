/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Workbench session: the graph, the run controller and a renderer.
//!
//! All graph edits go through [`GraphLabApp`], which refuses them while a run
//! is active. Analysis and rendering only read the graph.

use std::path::Path;

use euclid::default::Point2D;
use log::info;
use thiserror::Error;

use crate::analysis::{self, AnalysisError, Bridge};
use crate::config::Settings;
use crate::graph::{Edge, EdgeIndex, EdgeStyle, Graph, GraphError, Vertex, VertexId, VertexStyle};
use crate::layout::{self, LayoutError, LayoutKind};
use crate::persistence::types::GraphSnapshot;
use crate::persistence::{self, PersistenceError, matrix};
use crate::render::Renderer;
use crate::run::{ExecutionMode, RunController, RunRequest, StepStatus};
use crate::search::{self, LookupError};
use crate::timer::{TimerId, TimerService};
use crate::traversal::{InvalidSelection, RunOutcome};

/// Any error a session operation can report
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Selection(#[from] InvalidSelection),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application state
pub struct GraphLabApp<T> {
    graph: Graph,
    runs: RunController<T>,
    renderer: Box<dyn Renderer>,
    pub settings: Settings,
}

impl<T: TimerService> GraphLabApp<T> {
    pub fn new(timers: T, renderer: Box<dyn Renderer>, settings: Settings) -> Self {
        let runs = RunController::with_default_delay(timers, settings.run.step_delay());
        Self {
            graph: Graph::new(),
            runs,
            renderer,
            settings,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn ensure_editable(&self) -> Result<(), GraphError> {
        if self.runs.is_active() {
            Err(GraphError::RunInProgress)
        } else {
            Ok(())
        }
    }

    // Graph edits

    pub fn add_vertex(
        &mut self,
        id: impl Into<VertexId>,
        label: impl Into<String>,
        position: Point2D<f32>,
        style: VertexStyle,
    ) -> Result<(), GraphError> {
        self.ensure_editable()?;
        self.graph.add_vertex(id, label, position, style)?;
        Ok(())
    }

    /// Add a vertex whose id is derived from its label
    pub fn add_labelled_vertex(&mut self, label: &str, position: Point2D<f32>) -> Result<VertexId, GraphError> {
        self.ensure_editable()?;
        let id = self.graph.next_free_id(label);
        self.graph
            .add_vertex(id.clone(), label, position, VertexStyle::default())?;
        Ok(id)
    }

    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        weight: f64,
        label: &str,
        style: EdgeStyle,
        directed: bool,
    ) -> Result<EdgeIndex, GraphError> {
        self.ensure_editable()?;
        Ok(self.graph.add_edge(from, to, weight, label, style, directed))
    }

    pub fn remove_vertex(&mut self, id: &str) -> Result<Option<Vertex>, GraphError> {
        self.ensure_editable()?;
        Ok(self.graph.remove_vertex(id))
    }

    pub fn remove_edge(&mut self, index: EdgeIndex) -> Result<Edge, GraphError> {
        self.ensure_editable()?;
        self.graph.remove_edge(index)
    }

    /// Move a vertex. Returns whether it exists.
    pub fn move_vertex(&mut self, id: &str, position: Point2D<f32>) -> Result<bool, GraphError> {
        self.ensure_editable()?;
        Ok(match self.graph.position_mut(id) {
            Some(current) => {
                *current = position;
                true
            },
            None => false,
        })
    }

    pub fn clear(&mut self) -> Result<(), GraphError> {
        self.ensure_editable()?;
        self.graph.clear();
        Ok(())
    }

    // Layout

    pub fn apply_layout(&mut self, kind: &LayoutKind) -> Result<(), AppError> {
        self.ensure_editable()?;
        layout::apply(&mut self.graph, kind, &self.settings.layout)?;
        Ok(())
    }

    // Structural analysis

    pub fn components(&self) -> Result<Vec<Vec<VertexId>>, AnalysisError> {
        analysis::connected_components(&self.graph)
    }

    /// Recolour vertices by component. Returns the number of components.
    pub fn colour_components(&mut self) -> Result<usize, AppError> {
        self.ensure_editable()?;
        Ok(analysis::colour_components(&mut self.graph)?)
    }

    pub fn cut_vertices(&self) -> Result<Vec<VertexId>, AnalysisError> {
        analysis::cut_vertices(&self.graph)
    }

    pub fn bridges(&self) -> Result<Vec<Bridge>, AnalysisError> {
        analysis::bridges(&self.graph)
    }

    // Snapshots and import/export

    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph.to_snapshot()
    }

    /// Replace the graph with a snapshot
    pub fn restore(&mut self, snapshot: &GraphSnapshot) -> Result<(), GraphError> {
        self.ensure_editable()?;
        self.graph = Graph::from_snapshot(snapshot);
        Ok(())
    }

    /// Replace the graph with the contents of a snapshot file
    pub fn load(&mut self, path: &Path) -> Result<(), AppError> {
        self.ensure_editable()?;
        self.graph = persistence::load_graph(path)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_graph(&self.graph, path)?;
        info!("Saved graph to {}", path.display());
        Ok(())
    }

    /// Replace the graph with an adjacency matrix import
    pub fn import_matrix(&mut self, text: &str, labels: Option<&str>, directed: bool) -> Result<(), AppError> {
        self.ensure_editable()?;
        let graph = matrix::import_matrix(text, labels, directed).map_err(PersistenceError::from)?;
        info!(
            "Imported a {}x{} matrix with {} edges",
            graph.vertex_count(),
            graph.vertex_count(),
            graph.edge_count()
        );
        self.graph = graph;
        Ok(())
    }

    pub fn export_matrix(&self) -> Result<String, AnalysisError> {
        if self.graph.is_empty() {
            return Err(AnalysisError::EmptyGraph);
        }
        Ok(matrix::export_matrix(&self.graph))
    }

    /// Resolve user input naming a vertex by id or label
    pub fn resolve(&self, query: &str) -> Result<VertexId, LookupError> {
        search::resolve_vertex(&self.graph, query)
    }

    // Runs

    pub fn start_traversal(&mut self, request: &RunRequest) -> Result<(), InvalidSelection> {
        self.runs.start(&self.graph, request, self.renderer.as_mut())
    }

    pub fn step(&mut self) -> StepStatus {
        self.runs.step(&self.graph, self.renderer.as_mut())
    }

    pub fn on_timer(&mut self, id: TimerId) -> StepStatus {
        self.runs.on_timer(id, &self.graph, self.renderer.as_mut())
    }

    /// Step until the active run finishes
    pub fn finish_run(&mut self) -> StepStatus {
        loop {
            match self.step() {
                StepStatus::Running => continue,
                status => return status,
            }
        }
    }

    pub fn cancel_run(&mut self) -> bool {
        let cancelled = self.runs.cancel();
        if cancelled {
            self.renderer.render(&self.graph, &self.runs.snapshot());
        }
        cancelled
    }

    pub fn is_running(&self) -> bool {
        self.runs.is_active()
    }

    pub fn run_mode(&self) -> ExecutionMode {
        self.runs.mode()
    }

    pub fn live_timer(&self) -> Option<TimerId> {
        self.runs.live_timer()
    }

    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.runs.last_outcome()
    }

    pub fn timers(&self) -> &T {
        self.runs.timers()
    }

    pub fn timers_mut(&mut self) -> &mut T {
        self.runs.timers_mut()
    }
}
