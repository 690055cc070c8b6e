/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Rendering hooks for traversal runs.
//!
//! The run controller calls a [`Renderer`] after every state change with a
//! borrowed [`RunSnapshot`]. Renderers only read; the store and the run are
//! never mutated from here.

use std::io::Write;

use log::warn;

use crate::graph::{Graph, VertexId};
use crate::run::ExecutionMode;
use crate::traversal::{AlgorithmKind, RunOutcome, TraversalView};

/// Labels longer than this are shortened in text output
const MAX_LABEL_CHARS: usize = 16;

/// Everything a renderer may show about the current run
#[derive(Debug, Clone)]
pub struct RunSnapshot<'a> {
    pub mode: ExecutionMode,

    /// Live run state, `None` once the run is gone
    pub view: Option<TraversalView<'a>>,

    /// Result of the last finished run
    pub outcome: Option<&'a RunOutcome>,
}

impl RunSnapshot<'_> {
    /// A snapshot with no run and no outcome
    pub fn idle() -> Self {
        Self {
            mode: ExecutionMode::Off,
            view: None,
            outcome: None,
        }
    }
}

/// Receives run snapshots for display
pub trait Renderer {
    fn render(&mut self, graph: &Graph, run: &RunSnapshot<'_>);
}

/// Renderer that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _graph: &Graph, _run: &RunSnapshot<'_>) {}
}

/// Line-oriented renderer for terminals
pub struct TextRenderer<W: Write> {
    out: W,
    steps: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, steps: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            warn!("Failed to write run output: {e}");
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, graph: &Graph, run: &RunSnapshot<'_>) {
        let line = match (&run.view, run.outcome) {
            (Some(view), _) => {
                let line = describe_view(graph, view, self.steps);
                self.steps += 1;
                line
            },
            (None, Some(outcome)) => {
                self.steps = 0;
                describe_outcome(graph, outcome)
            },
            (None, None) => return,
        };
        self.write_line(&line);
    }
}

/// Display label of a vertex, falling back to the id for dangling references
fn label_of(graph: &Graph, id: &VertexId) -> String {
    let label = graph.vertex(id).map_or(id.as_str(), |v| v.label.as_str());
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let mut short: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
    short.push('\u{2026}');
    short
}

fn join_labels<'a>(graph: &Graph, ids: impl IntoIterator<Item = &'a VertexId>) -> String {
    let labels: Vec<String> = ids.into_iter().map(|id| label_of(graph, id)).collect();
    if labels.is_empty() {
        "-".to_string()
    } else {
        labels.join(", ")
    }
}

fn describe_view(graph: &Graph, view: &TraversalView<'_>, step: usize) -> String {
    let current = view.current.map_or("-".to_string(), |id| label_of(graph, id));
    let next = view.next.map_or("-".to_string(), |id| label_of(graph, id));
    let frontier_name = match view.kind {
        AlgorithmKind::Bfs => "queue",
        AlgorithmKind::Dfs => "stack",
        AlgorithmKind::Dijkstra => "unvisited",
    };

    let mut line = format!(
        "[{} #{step}] current: {current} | next: {next} | visited: {} | {frontier_name}: {}",
        view.kind,
        join_labels(graph, view.order.iter()),
        join_labels(graph, view.pending.iter().copied()),
    );

    if let Some(distances) = view.distances {
        let cells: Vec<String> = distances
            .iter()
            .map(|(id, d)| {
                if d.is_finite() {
                    format!("{}={d}", label_of(graph, id))
                } else {
                    format!("{}=\u{221e}", label_of(graph, id))
                }
            })
            .collect();
        line.push_str(&format!(" | distances: {}", cells.join(" ")));
    }
    line
}

fn describe_outcome(graph: &Graph, outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Visited(order) => {
            format!("Visit order: {}", join_labels(graph, order.iter()))
        },
        RunOutcome::Path { path, distance } => {
            let labels: Vec<String> = path.iter().map(|id| label_of(graph, id)).collect();
            format!("Shortest path: {} (distance {distance})", labels.join(" -> "))
        },
        RunOutcome::NoPath { source, target } => format!(
            "No path from {} to {}",
            label_of(graph, source),
            label_of(graph, target)
        ),
    }
}
