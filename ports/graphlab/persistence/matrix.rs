/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Adjacency (weight) matrix import and export.
//!
//! Import format: one whitespace-separated row per line, square, `0` meaning
//! "no edge". Non-zero weights must be finite and within `[0, 100]`.

use crate::graph::{EdgeStyle, Graph, VertexStyle};
use euclid::default::Point2D;
use log::warn;
use thiserror::Error;

pub const MAX_MATRIX_WEIGHT: f64 = 100.0;

/// Horizontal distance between imported vertices
const IMPORT_SPACING: f32 = 100.0;

/// Errors from parsing an adjacency matrix
#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("the matrix is empty")]
    Empty,

    #[error("the value `{value}` at row {row}, column {column} is not a number")]
    NotNumeric {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("the value at row {row}, column {column} is not finite")]
    NotFinite { row: usize, column: usize },

    #[error("the weight {value} at row {row}, column {column} must be between 0 and 100")]
    OutOfRange {
        row: usize,
        column: usize,
        value: f64,
    },

    #[error("the matrix must be square: row {row} has {len} values, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    #[error("{labels} labels were given for a matrix of size {size}")]
    LabelCount { labels: usize, size: usize },
}

/// Parse matrix rows. Row and column numbers in errors are 1-based.
fn parse_rows(text: &str) -> Result<Vec<Vec<f64>>, MatrixError> {
    let mut rows = Vec::new();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let row_number = rows.len() + 1;
        let mut row = Vec::new();
        for (col, token) in line.split_whitespace().enumerate() {
            let value: f64 = token.parse().map_err(|_| MatrixError::NotNumeric {
                row: row_number,
                column: col + 1,
                value: token.to_string(),
            })?;
            if value != 0.0 {
                if !value.is_finite() {
                    return Err(MatrixError::NotFinite {
                        row: row_number,
                        column: col + 1,
                    });
                }
                if !(0.0..=MAX_MATRIX_WEIGHT).contains(&value) {
                    return Err(MatrixError::OutOfRange {
                        row: row_number,
                        column: col + 1,
                        value,
                    });
                }
            }
            row.push(value);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(MatrixError::Empty);
    }

    let size = rows.len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != size {
            return Err(MatrixError::NotSquare {
                row: i + 1,
                len: row.len(),
                size,
            });
        }
    }
    Ok(rows)
}

/// Build a graph from an adjacency matrix.
///
/// `labels` is an optional comma-separated list; when absent vertices are
/// labelled `V0`, `V1`, ... Vertex ids are the row numbers `"0"`, `"1"`, ...
/// For an undirected import only the upper triangle (diagonal included)
/// becomes edges. Nothing is returned unless the whole matrix is valid.
pub fn import_matrix(text: &str, labels: Option<&str>, directed: bool) -> Result<Graph, MatrixError> {
    let rows = parse_rows(text)?;
    let size = rows.len();

    let labels: Vec<String> = match labels.map(str::trim).filter(|l| !l.is_empty()) {
        Some(list) => list.split(',').map(|l| l.trim().to_string()).collect(),
        None => (0..size).map(|i| format!("V{i}")).collect(),
    };
    if labels.len() != size {
        return Err(MatrixError::LabelCount {
            labels: labels.len(),
            size,
        });
    }

    let mut graph = Graph::new();
    for (i, label) in labels.into_iter().enumerate() {
        let x = i as f32 * IMPORT_SPACING - size as f32 * IMPORT_SPACING / 2.0;
        // Ids are row numbers, so they can never collide.
        let _ = graph.add_vertex(i.to_string(), label, Point2D::new(x, 0.0), VertexStyle::default());
    }

    for (i, row) in rows.iter().enumerate() {
        for (j, &weight) in row.iter().enumerate() {
            if weight == 0.0 || (!directed && i > j) {
                continue;
            }
            graph.add_edge(
                i.to_string(),
                j.to_string(),
                weight,
                weight.to_string(),
                EdgeStyle::default(),
                directed,
            );
        }
    }

    Ok(graph)
}

/// Weight matrix of the graph in vertex enumeration order.
///
/// Undirected edges fill both cells. When several edges join the same pair
/// the last one in the edge list wins.
pub fn to_matrix(graph: &Graph) -> Vec<Vec<f64>> {
    let size = graph.vertex_count();
    let mut matrix = vec![vec![0.0; size]; size];

    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.vertex_index(&edge.from), graph.vertex_index(&edge.to))
        else {
            warn!("Skipping dangling edge {} -> {} in matrix export", edge.from, edge.to);
            continue;
        };
        matrix[from][to] = edge.weight;
        if !edge.directed {
            matrix[to][from] = edge.weight;
        }
    }
    matrix
}

/// Render the weight matrix as text: a header naming the vertex labels, a
/// blank line, then tab-separated rows.
pub fn export_matrix(graph: &Graph) -> String {
    let labels: Vec<&str> = graph.vertices().map(|v| v.label.as_str()).collect();
    let mut text = String::from("Graph weight matrix\n");
    text.push_str(&format!("Vertices: {}\n\n", labels.join(", ")));

    for row in to_matrix(graph) {
        let cells: Vec<String> = row
            .iter()
            .map(|&value| {
                if value == 0.0 {
                    "0".to_string()
                } else {
                    format!("{value:.2}")
                }
            })
            .collect();
        text.push_str(&cells.join("\t"));
        text.push('\n');
    }
    text
}
