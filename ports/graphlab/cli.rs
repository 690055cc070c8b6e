/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Command line of the `graphlab` binary.

use std::path::PathBuf;
use std::str::FromStr;

use bpaf::Bpaf;

/// Graph algorithm workbench
#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
pub struct Cli {
    /// Graph snapshot to work on (.json, or .bin for the binary format)
    #[bpaf(short, long, argument("PATH"), fallback(PathBuf::from("graph.json")))]
    pub graph: PathBuf,

    /// Settings file to use instead of the one in the config directory
    #[bpaf(long, argument("PATH"))]
    pub config: Option<PathBuf>,

    #[bpaf(external(command))]
    pub command: Command,
}

/// How a traversal advances
#[derive(Debug, Clone, Bpaf)]
pub struct RunOptions {
    /// Step on a timer instead of waiting for input
    #[bpaf(long)]
    pub auto: bool,

    /// Delay between automatic steps in milliseconds
    #[bpaf(long, argument("MS"))]
    pub delay: Option<u64>,
}

#[derive(Debug, Clone, Bpaf)]
pub enum Command {
    /// Breadth-first search from SOURCE
    #[bpaf(command)]
    Bfs {
        #[bpaf(external(run_options))]
        run: RunOptions,
        #[bpaf(positional("SOURCE"))]
        source: String,
    },

    /// Depth-first search from SOURCE
    #[bpaf(command)]
    Dfs {
        #[bpaf(external(run_options))]
        run: RunOptions,
        #[bpaf(positional("SOURCE"))]
        source: String,
    },

    /// Shortest path from SOURCE to TARGET
    #[bpaf(command)]
    Dijkstra {
        #[bpaf(external(run_options))]
        run: RunOptions,
        #[bpaf(positional("SOURCE"))]
        source: String,
        #[bpaf(positional("TARGET"))]
        target: String,
    },

    /// List connected components
    #[bpaf(command)]
    Components {
        /// Colour vertices by component and save the graph
        #[bpaf(long)]
        colour: bool,
    },

    /// List cut vertices
    #[bpaf(command("cut-vertices"))]
    CutVertices,

    /// List bridges
    #[bpaf(command)]
    Bridges,

    /// Reposition vertices and save the graph
    #[bpaf(command)]
    Layout {
        /// Root vertex for the tree layout
        #[bpaf(long, argument("VERTEX"))]
        root: Option<String>,

        /// force, circular, grid or tree
        #[bpaf(positional("KIND"))]
        kind: LayoutChoice,
    },

    /// Print the weight matrix, or write it to a file
    #[bpaf(command("export-matrix"))]
    ExportMatrix {
        #[bpaf(short, long, argument("PATH"))]
        output: Option<PathBuf>,
    },

    /// Replace the graph with a weight matrix read from MATRIX
    #[bpaf(command("import-matrix"))]
    ImportMatrix {
        /// Comma-separated vertex labels
        #[bpaf(long, argument("LABELS"))]
        labels: Option<String>,

        /// Create directed edges
        #[bpaf(long)]
        directed: bool,

        #[bpaf(positional("MATRIX"))]
        matrix: PathBuf,
    },
}

/// Layout named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChoice {
    Force,
    Circular,
    Grid,
    Tree,
}

impl FromStr for LayoutChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "force" => Ok(LayoutChoice::Force),
            "circular" | "circle" => Ok(LayoutChoice::Circular),
            "grid" => Ok(LayoutChoice::Grid),
            "tree" => Ok(LayoutChoice::Tree),
            other => Err(format!("unknown layout `{other}`, expected force, circular, grid or tree")),
        }
    }
}
