/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Vertex lookup by id or label, with fuzzy suggestions.

use crate::graph::{Graph, VertexId};
use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher};
use thiserror::Error;

/// Suggestions offered when a lookup fails
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no vertex matches `{query}`{}", did_you_mean(.suggestions))]
    NotFound {
        query: String,
        suggestions: Vec<VertexId>,
    },

    #[error("the label `{label}` is shared by vertices {}", .ids.join(", "))]
    Ambiguous { label: String, ids: Vec<VertexId> },
}

fn did_you_mean(suggestions: &[VertexId]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

#[derive(Clone)]
struct SearchCandidate {
    id: VertexId,
    text: String,
}

impl AsRef<str> for SearchCandidate {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Return vertex ids ranked by fuzzy match quality for `query`.
pub fn fuzzy_match_vertices(graph: &Graph, query: &str) -> Vec<VertexId> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let normalized_query = query.to_lowercase();
    let pattern = Pattern::parse(
        &normalized_query,
        CaseMatching::Respect,
        Normalization::Never,
    );
    let mut matcher = Matcher::new(Config::DEFAULT);

    let candidates: Vec<SearchCandidate> = graph
        .vertices()
        .map(|vertex| SearchCandidate {
            id: vertex.id.clone(),
            text: format!("{} {}", vertex.label.to_lowercase(), vertex.id.to_lowercase()),
        })
        .collect();

    pattern
        .match_list(candidates, &mut matcher)
        .into_iter()
        .map(|(candidate, _score)| candidate.id)
        .collect()
}

/// Resolve user input to a vertex id: an exact id first, then a unique exact
/// label. Anything else fails with the closest fuzzy matches.
pub fn resolve_vertex(graph: &Graph, query: &str) -> Result<VertexId, LookupError> {
    let query = query.trim();
    if graph.contains_vertex(query) {
        return Ok(query.to_string());
    }

    let mut labelled: Vec<VertexId> = graph.vertices_with_label(query).cloned().collect();
    match labelled.len() {
        0 => {
            let mut suggestions = fuzzy_match_vertices(graph, query);
            suggestions.truncate(MAX_SUGGESTIONS);
            Err(LookupError::NotFound {
                query: query.to_string(),
                suggestions,
            })
        },
        1 => Ok(labelled.remove(0)),
        _ => Err(LookupError::Ambiguous {
            label: query.to_string(),
            ids: labelled,
        }),
    }
}
