/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Serializable types for graph snapshots.
//!
//! The same structure is written as JSON (serde) for exchange with the editor
//! and as rkyv bytes for compact local saves. Optional fields are `Option` so
//! a loader can substitute the store's defaults for anything omitted.

use rkyv::Archive;
use serde::{Deserialize, Serialize};

/// Persisted vertex
#[derive(
    Archive, rkyv::Serialize, rkyv::Deserialize, Serialize, Deserialize, Clone, Debug, PartialEq,
)]
pub struct PersistedVertex {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub radius: Option<f32>,
}

/// Persisted edge (endpoints by vertex id)
#[derive(
    Archive, rkyv::Serialize, rkyv::Deserialize, Serialize, Deserialize, Clone, Debug, PartialEq,
)]
pub struct PersistedEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default, rename = "isDirected")]
    pub is_directed: Option<bool>,
}

/// Full graph snapshot: vertex list plus edge list, both order-preserving
#[derive(
    Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    Serialize,
    Deserialize,
    Clone,
    Debug,
    Default,
    PartialEq,
)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub vertices: Vec<PersistedVertex>,
    #[serde(default)]
    pub edges: Vec<PersistedEdge>,
}
