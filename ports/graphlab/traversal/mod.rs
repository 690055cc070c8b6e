/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Stepwise traversal engine.
//!
//! One state machine, [`Traversal`], drives BFS, DFS and Dijkstra. What
//! differs between them is the [`Frontier`] discipline:
//!
//! - [`Fifo`]: queue, vertices marked visited when enqueued (BFS)
//! - [`Lifo`]: stack, vertices marked visited when popped (DFS)
//! - [`DistanceFrontier`]: unvisited set ordered by tentative distance (Dijkstra)
//!
//! Every call to [`Traversal::step`] processes at most one vertex so a caller
//! can render between steps.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::graph::{Graph, VertexId};

pub mod frontier;

pub use frontier::{DistanceFrontier, Fifo, Lifo};

/// Algorithms the engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    Bfs,
    Dfs,
    Dijkstra,
}

impl AlgorithmKind {
    /// Smallest graph the algorithm can be started on
    pub fn min_vertices(self) -> usize {
        match self {
            AlgorithmKind::Bfs | AlgorithmKind::Dfs => 1,
            AlgorithmKind::Dijkstra => 2,
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmKind::Bfs => write!(f, "BFS"),
            AlgorithmKind::Dfs => write!(f, "DFS"),
            AlgorithmKind::Dijkstra => write!(f, "Dijkstra"),
        }
    }
}

/// A start request that cannot be honoured
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidSelection {
    #[error("{kind} needs at least {required} vertices, the graph has {actual}")]
    TooFewVertices {
        kind: AlgorithmKind,
        required: usize,
        actual: usize,
    },

    #[error("vertex `{0}` is not in the graph")]
    UnknownVertex(VertexId),

    #[error("Dijkstra needs a target vertex")]
    MissingTarget,

    #[error("a run cannot be started with the execution mode turned off")]
    ModeOff,
}

/// Final result of a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// BFS/DFS visit order
    Visited(Vec<VertexId>),

    /// Shortest path from source to target, both ends included
    Path { path: Vec<VertexId>, distance: f64 },

    /// Dijkstra finished without reaching the target
    NoPath { source: VertexId, target: VertexId },
}

/// What the frontier produced for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A vertex processed for the first time
    Visit(VertexId),

    /// A stale frontier entry for an already visited vertex
    Revisit(VertexId),

    /// Nothing left to process
    Exhausted,
}

/// Frontier discipline plugged into [`Traversal`]
pub trait Frontier {
    const KIND: AlgorithmKind;

    /// Prepare the frontier for a run starting at `source`
    fn seed(&mut self, graph: &Graph, source: &VertexId, visited: &mut HashSet<VertexId>);

    /// Take the next vertex out of the frontier
    fn advance(&mut self, visited: &mut HashSet<VertexId>) -> Advance;

    /// Discover the neighbors of a freshly visited vertex
    fn expand(&mut self, graph: &Graph, at: &VertexId, visited: &mut HashSet<VertexId>);

    /// The vertex the next step is expected to process, for display
    fn peek(&self, visited: &HashSet<VertexId>) -> Option<&VertexId>;

    /// Vertices still waiting in the frontier
    fn pending<'a>(&'a self, visited: &HashSet<VertexId>) -> Vec<&'a VertexId>;

    /// Whether the run stops right after visiting `at`
    fn is_goal(&self, _at: &VertexId) -> bool {
        false
    }

    /// Tentative distances, when the discipline keeps them
    fn distances(&self) -> Option<&IndexMap<VertexId, f64>> {
        None
    }

    fn outcome(&self, order: &[VertexId]) -> RunOutcome;
}

/// Borrowed view of a traversal for renderers
#[derive(Debug, Clone)]
pub struct TraversalView<'a> {
    pub kind: AlgorithmKind,
    pub current: Option<&'a VertexId>,
    pub next: Option<&'a VertexId>,
    pub order: &'a [VertexId],
    pub pending: Vec<&'a VertexId>,
    pub distances: Option<&'a IndexMap<VertexId, f64>>,
    pub finished: bool,
}

/// Object-safe handle over any [`Traversal`], used by the run controller
pub trait Stepper {
    fn kind(&self) -> AlgorithmKind;

    /// Advance one step; returns whether the run has terminated
    fn step(&mut self, graph: &Graph) -> bool;

    fn is_finished(&self) -> bool;

    /// Result so far (final once the run has terminated)
    fn outcome(&self) -> RunOutcome;

    fn view(&self) -> TraversalView<'_>;
}

/// Generic stepwise traversal state
#[derive(Debug, Clone)]
pub struct Traversal<F> {
    frontier: F,
    visited: HashSet<VertexId>,
    order: Vec<VertexId>,
    current: Option<VertexId>,
    next: Option<VertexId>,
    finished: bool,
}

impl<F: Frontier> Traversal<F> {
    /// Seed a traversal at `source`. The caller has checked `source` exists.
    pub fn new(graph: &Graph, source: &VertexId, mut frontier: F) -> Self {
        let mut visited = HashSet::new();
        frontier.seed(graph, source, &mut visited);
        Self {
            frontier,
            visited,
            order: Vec::new(),
            current: None,
            next: Some(source.clone()),
            finished: false,
        }
    }

    /// Process one frontier entry. Returns whether the traversal has terminated.
    pub fn step(&mut self, graph: &Graph) -> bool {
        if self.finished {
            return true;
        }

        match self.frontier.advance(&mut self.visited) {
            Advance::Exhausted => {
                self.finish();
                true
            },
            Advance::Revisit(vertex) => {
                debug!("{}: `{vertex}` already visited", F::KIND);
                self.current = Some(vertex);
                self.next = self.frontier.peek(&self.visited).cloned();
                false
            },
            Advance::Visit(vertex) => {
                debug!("{}: visiting `{vertex}`", F::KIND);
                self.order.push(vertex.clone());
                self.frontier.expand(graph, &vertex, &mut self.visited);
                self.next = self.frontier.peek(&self.visited).cloned();
                let reached_goal = self.frontier.is_goal(&vertex);
                self.current = Some(vertex);
                if reached_goal {
                    self.finish();
                }
                reached_goal
            },
        }
    }

    /// Step until the traversal terminates
    pub fn run_to_end(&mut self, graph: &Graph) -> RunOutcome {
        while !self.step(graph) {}
        self.frontier.outcome(&self.order)
    }

    fn finish(&mut self) {
        self.finished = true;
        self.current = None;
        self.next = None;
    }

    pub fn order(&self) -> &[VertexId] {
        &self.order
    }

    pub fn current(&self) -> Option<&VertexId> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&VertexId> {
        self.next.as_ref()
    }

    pub fn is_visited(&self, vertex: &str) -> bool {
        self.visited.contains(vertex)
    }

    pub fn frontier(&self) -> &F {
        &self.frontier
    }
}

impl<F: Frontier> Stepper for Traversal<F> {
    fn kind(&self) -> AlgorithmKind {
        F::KIND
    }

    fn step(&mut self, graph: &Graph) -> bool {
        Traversal::step(self, graph)
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn outcome(&self) -> RunOutcome {
        self.frontier.outcome(&self.order)
    }

    fn view(&self) -> TraversalView<'_> {
        TraversalView {
            kind: F::KIND,
            current: self.current.as_ref(),
            next: self.next.as_ref(),
            order: &self.order,
            pending: self.frontier.pending(&self.visited),
            distances: self.frontier.distances(),
            finished: self.finished,
        }
    }
}

/// Validate a selection and build the matching traversal.
///
/// Nothing is allocated for the run unless the selection is valid.
pub fn start(
    graph: &Graph,
    kind: AlgorithmKind,
    source: &str,
    target: Option<&str>,
) -> Result<Box<dyn Stepper>, InvalidSelection> {
    let required = kind.min_vertices();
    if graph.vertex_count() < required {
        return Err(InvalidSelection::TooFewVertices {
            kind,
            required,
            actual: graph.vertex_count(),
        });
    }
    if !graph.contains_vertex(source) {
        return Err(InvalidSelection::UnknownVertex(source.to_string()));
    }
    let source = source.to_string();

    Ok(match kind {
        AlgorithmKind::Bfs => Box::new(Traversal::new(graph, &source, Fifo::default())),
        AlgorithmKind::Dfs => Box::new(Traversal::new(graph, &source, Lifo::default())),
        AlgorithmKind::Dijkstra => {
            let target = target.ok_or(InvalidSelection::MissingTarget)?;
            if !graph.contains_vertex(target) {
                return Err(InvalidSelection::UnknownVertex(target.to_string()));
            }
            let frontier = DistanceFrontier::new(&source, target);
            Box::new(Traversal::new(graph, &source, frontier))
        },
    })
}
