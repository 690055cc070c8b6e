/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Frontier disciplines for BFS, DFS and Dijkstra.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;

use super::{Advance, AlgorithmKind, Frontier, RunOutcome};
use crate::graph::{Graph, VertexId};

/// FIFO queue. A vertex is marked visited when it is enqueued, so it can
/// never be queued twice.
#[derive(Debug, Clone, Default)]
pub struct Fifo {
    queue: VecDeque<VertexId>,
}

impl Frontier for Fifo {
    const KIND: AlgorithmKind = AlgorithmKind::Bfs;

    fn seed(&mut self, _graph: &Graph, source: &VertexId, visited: &mut HashSet<VertexId>) {
        visited.insert(source.clone());
        self.queue.push_back(source.clone());
    }

    fn advance(&mut self, _visited: &mut HashSet<VertexId>) -> Advance {
        match self.queue.pop_front() {
            Some(vertex) => Advance::Visit(vertex),
            None => Advance::Exhausted,
        }
    }

    fn expand(&mut self, graph: &Graph, at: &VertexId, visited: &mut HashSet<VertexId>) {
        for neighbor in graph.neighbors(at) {
            if visited.insert(neighbor.clone()) {
                self.queue.push_back(neighbor.clone());
            }
        }
    }

    fn peek(&self, _visited: &HashSet<VertexId>) -> Option<&VertexId> {
        self.queue.front()
    }

    fn pending<'a>(&'a self, _visited: &HashSet<VertexId>) -> Vec<&'a VertexId> {
        self.queue.iter().collect()
    }

    fn outcome(&self, order: &[VertexId]) -> RunOutcome {
        RunOutcome::Visited(order.to_vec())
    }
}

/// LIFO stack. A vertex is marked visited only when popped, so it may sit on
/// the stack more than once; popping a visited vertex is a no-op step.
#[derive(Debug, Clone, Default)]
pub struct Lifo {
    stack: Vec<VertexId>,
}

impl Frontier for Lifo {
    const KIND: AlgorithmKind = AlgorithmKind::Dfs;

    fn seed(&mut self, _graph: &Graph, source: &VertexId, _visited: &mut HashSet<VertexId>) {
        self.stack.push(source.clone());
    }

    fn advance(&mut self, visited: &mut HashSet<VertexId>) -> Advance {
        match self.stack.pop() {
            Some(vertex) if visited.contains(&vertex) => Advance::Revisit(vertex),
            Some(vertex) => {
                visited.insert(vertex.clone());
                Advance::Visit(vertex)
            },
            None => Advance::Exhausted,
        }
    }

    fn expand(&mut self, graph: &Graph, at: &VertexId, visited: &mut HashSet<VertexId>) {
        let neighbors: Vec<&VertexId> = graph.neighbors(at).collect();
        // Reverse so the first neighbor in edge order ends on top of the stack
        for neighbor in neighbors.into_iter().rev() {
            if !visited.contains(neighbor) {
                self.stack.push(neighbor.clone());
            }
        }
    }

    fn peek(&self, _visited: &HashSet<VertexId>) -> Option<&VertexId> {
        self.stack.last()
    }

    fn pending<'a>(&'a self, _visited: &HashSet<VertexId>) -> Vec<&'a VertexId> {
        self.stack.iter().rev().collect()
    }

    fn outcome(&self, order: &[VertexId]) -> RunOutcome {
        RunOutcome::Visited(order.to_vec())
    }
}

/// Unvisited vertices keyed by tentative distance.
///
/// Selection scans the distance map, which keeps the graph's enumeration
/// order, and takes the first strictly smaller distance, so ties go to the
/// vertex enumerated first.
#[derive(Debug, Clone)]
pub struct DistanceFrontier {
    source: VertexId,
    target: VertexId,
    distances: IndexMap<VertexId, f64>,
    predecessors: HashMap<VertexId, VertexId>,
}

impl DistanceFrontier {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            distances: IndexMap::new(),
            predecessors: HashMap::new(),
        }
    }

    /// Unvisited vertex with the smallest finite tentative distance
    fn closest<'a>(&'a self, visited: &HashSet<VertexId>) -> Option<&'a VertexId> {
        let mut best: Option<(&VertexId, f64)> = None;
        for (vertex, &distance) in &self.distances {
            if visited.contains(vertex) || !distance.is_finite() {
                continue;
            }
            if best.is_none_or(|(_, min)| distance < min) {
                best = Some((vertex, distance));
            }
        }
        best.map(|(vertex, _)| vertex)
    }

    pub fn distance(&self, vertex: &str) -> Option<f64> {
        self.distances.get(vertex).copied()
    }

    pub fn predecessor(&self, vertex: &str) -> Option<&VertexId> {
        self.predecessors.get(vertex)
    }

    /// Walk predecessors back from the target. The path is only valid if it
    /// starts at the source.
    fn reconstruct_path(&self) -> Vec<VertexId> {
        let mut path = vec![self.target.clone()];
        let mut cursor = &self.target;
        while let Some(previous) = self.predecessors.get(cursor) {
            if path.len() > self.distances.len() {
                break;
            }
            path.push(previous.clone());
            cursor = previous;
        }
        path.reverse();
        path
    }
}

impl Frontier for DistanceFrontier {
    const KIND: AlgorithmKind = AlgorithmKind::Dijkstra;

    fn seed(&mut self, graph: &Graph, source: &VertexId, _visited: &mut HashSet<VertexId>) {
        self.distances = graph
            .vertex_ids()
            .map(|id| {
                let distance = if id == source { 0.0 } else { f64::INFINITY };
                (id.clone(), distance)
            })
            .collect();
        self.predecessors.clear();
    }

    fn advance(&mut self, visited: &mut HashSet<VertexId>) -> Advance {
        // Unvisited set empty, or every remaining vertex unreachable
        let Some(vertex) = self.closest(visited).cloned() else {
            return Advance::Exhausted;
        };
        visited.insert(vertex.clone());
        Advance::Visit(vertex)
    }

    fn expand(&mut self, graph: &Graph, at: &VertexId, visited: &mut HashSet<VertexId>) {
        let Some(&base) = self.distances.get(at) else {
            return;
        };
        for edge in graph.edges() {
            let Some(neighbor) = edge.neighbor_of(at) else {
                continue;
            };
            if visited.contains(neighbor) {
                continue;
            }
            let Some(known) = self.distances.get_mut(neighbor) else {
                continue;
            };
            let candidate = base + edge.weight;
            if candidate < *known {
                *known = candidate;
                self.predecessors.insert(neighbor.clone(), at.clone());
            }
        }
    }

    fn peek(&self, visited: &HashSet<VertexId>) -> Option<&VertexId> {
        self.closest(visited)
    }

    fn pending<'a>(&'a self, visited: &HashSet<VertexId>) -> Vec<&'a VertexId> {
        self.distances
            .keys()
            .filter(|vertex| !visited.contains(*vertex))
            .collect()
    }

    fn is_goal(&self, at: &VertexId) -> bool {
        *at == self.target
    }

    fn distances(&self) -> Option<&IndexMap<VertexId, f64>> {
        Some(&self.distances)
    }

    fn outcome(&self, _order: &[VertexId]) -> RunOutcome {
        let path = self.reconstruct_path();
        if path.first() != Some(&self.source) {
            return RunOutcome::NoPath {
                source: self.source.clone(),
                target: self.target.clone(),
            };
        }
        RunOutcome::Path {
            path,
            distance: self.distances.get(&self.target).copied().unwrap_or(f64::INFINITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::petgraph_adapter::PetgraphAdapter;
    use crate::graph::tests::{build, link};
    use crate::graph::EdgeStyle;
    use crate::traversal::Traversal;
    use petgraph::visit::EdgeRef;

    fn ids(list: &[&str]) -> Vec<VertexId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn weighted(graph: &mut Graph, from: &str, to: &str, weight: f64) {
        graph.add_edge(from, to, weight, "", EdgeStyle::default(), false);
    }

    fn dijkstra(graph: &Graph, source: &str, target: &str) -> Traversal<DistanceFrontier> {
        Traversal::new(
            graph,
            &source.to_string(),
            DistanceFrontier::new(source, target),
        )
    }

    #[test]
    fn test_bfs_visits_level_by_level() {
        let graph = build(&["A", "B", "C", "D"], &[("A", "B"), ("A", "C"), ("B", "D")]);
        let mut bfs = Traversal::new(&graph, &"A".to_string(), Fifo::default());
        assert_eq!(
            bfs.run_to_end(&graph),
            RunOutcome::Visited(ids(&["A", "B", "C", "D"]))
        );
    }

    #[test]
    fn test_bfs_never_enqueues_twice() {
        // Triangle plus a parallel edge: B is reachable from A twice
        let graph = build(&["A", "B", "C"], &[("A", "B"), ("A", "B"), ("A", "C"), ("B", "C")]);
        let mut bfs = Traversal::new(&graph, &"A".to_string(), Fifo::default());
        bfs.step(&graph);
        assert_eq!(bfs.frontier().pending(&HashSet::new()).len(), 2);
        assert_eq!(
            bfs.run_to_end(&graph),
            RunOutcome::Visited(ids(&["A", "B", "C"]))
        );
    }

    #[test]
    fn test_bfs_follows_edge_direction() {
        let mut graph = build(&["A", "B", "C"], &[]);
        graph.add_edge("B", "A", 1.0, "", EdgeStyle::default(), true);
        graph.add_edge("A", "C", 1.0, "", EdgeStyle::default(), true);

        let mut bfs = Traversal::new(&graph, &"A".to_string(), Fifo::default());
        assert_eq!(bfs.run_to_end(&graph), RunOutcome::Visited(ids(&["A", "C"])));
    }

    #[test]
    fn test_dfs_goes_deep_first() {
        let graph = build(&["A", "B", "C", "D"], &[("A", "B"), ("A", "C"), ("B", "D")]);
        let mut dfs = Traversal::new(&graph, &"A".to_string(), Lifo::default());
        assert_eq!(
            dfs.run_to_end(&graph),
            RunOutcome::Visited(ids(&["A", "B", "D", "C"]))
        );
    }

    #[test]
    fn test_dfs_stale_entry_is_a_noop_step() {
        // A pushes C and B; B pushes C again, so C ends up on the stack twice
        let graph = build(&["A", "B", "C"], &[("A", "B"), ("A", "C"), ("B", "C")]);
        let mut dfs = Traversal::new(&graph, &"A".to_string(), Lifo::default());

        assert!(!dfs.step(&graph)); // A
        assert!(!dfs.step(&graph)); // B
        assert!(!dfs.step(&graph)); // C
        assert_eq!(dfs.order().to_vec(), ids(&["A", "B", "C"]));

        assert!(!dfs.step(&graph)); // stale C
        assert_eq!(dfs.current().map(String::as_str), Some("C"));
        assert_eq!(dfs.order().len(), 3);

        assert!(dfs.step(&graph));
        assert_eq!(dfs.current(), None);
    }

    #[test]
    fn test_dfs_with_self_loop_and_dangling_edge() {
        let graph = build(&["A", "B"], &[("A", "A"), ("A", "ghost"), ("A", "B")]);
        let mut dfs = Traversal::new(&graph, &"A".to_string(), Lifo::default());
        assert_eq!(dfs.run_to_end(&graph), RunOutcome::Visited(ids(&["A", "B"])));
    }

    #[test]
    fn test_dijkstra_prefers_cheaper_two_hop_path() {
        let mut graph = build(&["A", "B", "C"], &[]);
        weighted(&mut graph, "A", "B", 1.0);
        weighted(&mut graph, "B", "C", 2.0);
        weighted(&mut graph, "A", "C", 5.0);

        let mut run = dijkstra(&graph, "A", "C");
        assert_eq!(
            run.run_to_end(&graph),
            RunOutcome::Path {
                path: ids(&["A", "B", "C"]),
                distance: 3.0
            }
        );
    }

    #[test]
    fn test_dijkstra_unreachable_target_reports_no_path() {
        let graph = build(&["A", "B", "C"], &[("A", "B")]);
        let mut run = dijkstra(&graph, "A", "C");
        assert_eq!(
            run.run_to_end(&graph),
            RunOutcome::NoPath {
                source: "A".into(),
                target: "C".into()
            }
        );
        // Every reachable vertex was finalized before giving up
        assert_eq!(run.order().to_vec(), ids(&["A", "B"]));
    }

    #[test]
    fn test_dijkstra_stops_at_target() {
        let graph = build(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("C", "D")]);
        let mut run = dijkstra(&graph, "A", "B");
        assert!(!run.step(&graph)); // A
        assert!(run.step(&graph)); // B is the target
        assert_eq!(run.order().to_vec(), ids(&["A", "B"]));
        assert!(!run.is_visited("C"));
    }

    #[test]
    fn test_dijkstra_source_equals_target() {
        let graph = build(&["A", "B"], &[("A", "B")]);
        let mut run = dijkstra(&graph, "A", "A");
        assert_eq!(
            run.run_to_end(&graph),
            RunOutcome::Path {
                path: ids(&["A"]),
                distance: 0.0
            }
        );
    }

    #[test]
    fn test_dijkstra_ties_go_to_first_enumerated_vertex() {
        let mut graph = build(&["S", "X", "Y", "T"], &[]);
        // Y's edge comes first, but X is enumerated first
        weighted(&mut graph, "S", "Y", 1.0);
        weighted(&mut graph, "S", "X", 1.0);
        weighted(&mut graph, "X", "T", 1.0);
        weighted(&mut graph, "Y", "T", 1.0);

        let mut run = dijkstra(&graph, "S", "T");
        assert!(!run.step(&graph));
        assert_eq!(run.next().map(String::as_str), Some("X"));
        assert_eq!(
            run.run_to_end(&graph),
            RunOutcome::Path {
                path: ids(&["S", "X", "T"]),
                distance: 2.0
            }
        );
    }

    #[test]
    fn test_dijkstra_respects_directed_edges() {
        let mut graph = build(&["A", "B", "C"], &[]);
        graph.add_edge("A", "C", 1.0, "", EdgeStyle::default(), false);
        graph.add_edge("B", "A", 1.0, "", EdgeStyle::default(), true);
        graph.add_edge("C", "B", 1.0, "", EdgeStyle::default(), true);

        let mut to_b = dijkstra(&graph, "A", "B");
        assert_eq!(
            to_b.run_to_end(&graph),
            RunOutcome::Path {
                path: ids(&["A", "C", "B"]),
                distance: 2.0
            }
        );

        let mut from_b_to_c = dijkstra(&graph, "B", "C");
        assert_eq!(
            from_b_to_c.run_to_end(&graph),
            RunOutcome::Path {
                path: ids(&["B", "A", "C"]),
                distance: 2.0
            }
        );
    }

    #[test]
    fn test_dijkstra_next_marker_does_not_change_distances() {
        let mut graph = build(&["A", "B", "C"], &[]);
        weighted(&mut graph, "A", "C", 4.0);
        weighted(&mut graph, "A", "B", 1.0);
        weighted(&mut graph, "B", "C", 1.0);

        let mut run = dijkstra(&graph, "A", "C");
        run.step(&graph);
        // After A: B (1) is closest, C (4) is tentative
        assert_eq!(run.next().map(String::as_str), Some("B"));
        assert_eq!(run.frontier().distance("C"), Some(4.0));
        run.step(&graph);
        assert_eq!(run.frontier().distance("C"), Some(2.0));
        assert_eq!(run.frontier().predecessor("C").map(String::as_str), Some("B"));
    }

    #[test]
    fn test_dijkstra_matches_petgraph() {
        let mut graph = build(&["a", "b", "c", "d", "e", "f"], &[]);
        weighted(&mut graph, "a", "b", 7.0);
        weighted(&mut graph, "a", "c", 9.0);
        weighted(&mut graph, "a", "f", 14.0);
        weighted(&mut graph, "b", "c", 10.0);
        weighted(&mut graph, "b", "d", 15.0);
        weighted(&mut graph, "c", "d", 11.0);
        weighted(&mut graph, "c", "f", 2.0);
        weighted(&mut graph, "d", "e", 6.0);
        graph.add_edge("e", "f", 9.0, "", EdgeStyle::default(), true);
        link(&mut graph, "f", "f");

        let adapter = PetgraphAdapter::from_graph(&graph);
        let source = adapter.node_index("a").unwrap();
        let expected = petgraph::algo::dijkstra(&adapter.graph, source, None, |e| *e.weight());

        for target in ["b", "c", "d", "e", "f"] {
            let mut run = dijkstra(&graph, "a", target);
            let RunOutcome::Path { distance, .. } = run.run_to_end(&graph) else {
                panic!("expected a path to {target}");
            };
            let idx = adapter.node_index(target).unwrap();
            assert_eq!(Some(&distance), expected.get(&idx), "distance to {target}");
        }
    }
}
