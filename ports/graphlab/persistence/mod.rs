/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph snapshot import/export.
//!
//! Formats:
//! - JSON (serde_json): the editor's `{ vertices, edges }` exchange format
//! - Binary (rkyv): the same snapshot, for compact local saves
//! - Adjacency matrix text: see [`matrix`]
//!
//! The format of a file is chosen from its extension (`.bin` is binary,
//! anything else is JSON).

pub mod matrix;
pub mod types;

use crate::graph::Graph;
use log::info;
use std::path::Path;
use thiserror::Error;
use types::GraphSnapshot;

pub use matrix::MatrixError;

/// Errors from snapshot and matrix import/export
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid binary snapshot: {0}")]
    Binary(String),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// On-disk snapshot encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Binary,
}

impl SnapshotFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => SnapshotFormat::Binary,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Serialize a snapshot as pretty-printed JSON
pub fn snapshot_to_json(snapshot: &GraphSnapshot) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Parse a JSON snapshot
pub fn snapshot_from_json(json: &str) -> Result<GraphSnapshot, PersistenceError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize a snapshot with rkyv
pub fn snapshot_to_bytes(snapshot: &GraphSnapshot) -> Result<Vec<u8>, PersistenceError> {
    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(snapshot)
        .map_err(|e| PersistenceError::Binary(format!("{e}")))?;
    Ok(bytes.to_vec())
}

/// Deserialize an rkyv snapshot
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<GraphSnapshot, PersistenceError> {
    // Copy to an aligned buffer: file bytes may not satisfy rkyv alignment
    let mut aligned = rkyv::util::AlignedVec::<16>::new();
    aligned.extend_from_slice(bytes);

    rkyv::from_bytes::<GraphSnapshot, rkyv::rancor::Error>(&aligned)
        .map_err(|e| PersistenceError::Binary(format!("{e}")))
}

/// Load a graph from a snapshot file, replacing nothing until parsing succeeds
pub fn load_graph(path: &Path) -> Result<Graph, PersistenceError> {
    let snapshot = match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => snapshot_from_json(&std::fs::read_to_string(path)?)?,
        SnapshotFormat::Binary => snapshot_from_bytes(&std::fs::read(path)?)?,
    };
    let graph = Graph::from_snapshot(&snapshot);
    info!(
        "Loaded {} vertices and {} edges from {}",
        graph.vertex_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

/// Save a graph snapshot to a file
pub fn save_graph(graph: &Graph, path: &Path) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let snapshot = graph.to_snapshot();
    match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => std::fs::write(path, snapshot_to_json(&snapshot)?)?,
        SnapshotFormat::Binary => std::fs::write(path, snapshot_to_bytes(&snapshot)?)?,
    }
    Ok(())
}
