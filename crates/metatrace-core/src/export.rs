//! Offline dumps of an [`InstantiationGraph`].
//!
//! Three formats are supported: a plain human-readable listing, Graphviz DOT,
//! and a JSON snapshot.

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::InstantiationGraph;
use crate::id::VertexId;
use crate::kind::InstantiationKind;
use crate::location::{DisplayLocation, FileLocation};

/// Output format for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Dump,
    Dot,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dump" | "text" => Ok(ExportFormat::Dump),
            "dot" | "graphviz" => Ok(ExportFormat::Dot),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "invalid export format '{}', expected dump/dot/json",
                s
            )),
        }
    }
}

/// Renders `graph` in the requested format.
pub fn render(graph: &InstantiationGraph, format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Dump => Ok(to_dump(graph)),
        ExportFormat::Dot => Ok(to_dot(graph)),
        ExportFormat::Json => serde_json::to_string_pretty(&GraphSnapshot::from(graph)),
    }
}

/// Writes `graph` to `path` in the requested format.
pub fn export(graph: &InstantiationGraph, format: ExportFormat, path: &Path) -> io::Result<()> {
    let content = render(graph, format)?;
    std::fs::write(path, content)
}

/// The plain listing: every vertex with its location, then every edge.
pub fn to_dump(graph: &InstantiationGraph) -> String {
    let mut out = String::from("Verticies:\n");
    for id in graph.vertices() {
        let location = graph
            .vertex(id)
            .and_then(|v| v.point_of_instantiation.as_ref());
        let _ = writeln!(
            out,
            "{} : {} instantiated from {}",
            id,
            graph.name(id),
            DisplayLocation(location)
        );
    }

    out.push_str("Edges:\n");
    for edge in graph.edges() {
        let _ = writeln!(
            out,
            "{} ---{}---> {}",
            graph.name(edge.from),
            edge.kind,
            graph.name(edge.to)
        );
    }
    out
}

/// Graphviz DOT with one labelled statement per vertex and per edge.
pub fn to_dot(graph: &InstantiationGraph) -> String {
    let mut out = String::from("digraph {\n");
    for id in graph.vertices() {
        let _ = writeln!(
            out,
            "    N{} [label=\"{}\"];",
            id,
            escape_label(graph.name(id))
        );
    }
    for edge in graph.edges() {
        let _ = writeln!(
            out,
            "    N{} -> N{} [label=\"{}\"];",
            edge.from, edge.to, edge.kind
        );
    }
    out.push_str("}\n");
    out
}

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Serializable copy of a graph, used by the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub vertices: Vec<VertexRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: VertexId,
    pub name: String,
    pub location: Option<FileLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: VertexId,
    pub to: VertexId,
    pub kind: InstantiationKind,
}

impl From<&InstantiationGraph> for GraphSnapshot {
    fn from(graph: &InstantiationGraph) -> Self {
        let vertices = graph
            .vertices()
            .filter_map(|id| {
                let v = graph.vertex(id)?;
                Some(VertexRecord {
                    id,
                    name: v.name.clone(),
                    location: v.point_of_instantiation.clone(),
                })
            })
            .collect();
        let edges = graph
            .edges()
            .map(|e| EdgeRecord {
                from: e.from,
                to: e.to,
                kind: e.kind,
            })
            .collect();
        GraphSnapshot { vertices, edges }
    }
}
