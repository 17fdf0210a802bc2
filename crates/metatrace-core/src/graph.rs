//! InstantiationGraph: the directed graph of template instantiations.
//!
//! [`InstantiationGraph`] owns an arena of [`Vertex`] values and the edges
//! between them, addressed by [`VertexId`] / [`EdgeId`] handles. A vertex is
//! identified by its compiler-printed name: inserting a name that is already
//! present returns the existing handle and changes nothing.
//!
//! # Lifecycle
//!
//! A graph is built once per captured metaprogram evaluation (the mutating
//! phase), then queried any number of times. Traversal state lives outside the
//! graph and must be recreated whenever the graph is rebuilt.
//!
//! # Assumptions
//!
//! The graph is expected to be a DAG. This is never checked; the traversals
//! only terminate on a cycle because they stop expanding discovered vertices.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{EdgeId, VertexId};
use crate::kind::InstantiationKind;
use crate::location::FileLocation;

/// Name of the synthetic vertex `0` every graph starts with.
pub const ROOT_NAME: &str = "<root>";

/// One instantiated entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    /// Fully qualified name as printed by the compiler. Identity key.
    pub name: String,
    /// Where the entity was first instantiated, if the compiler said.
    pub point_of_instantiation: Option<FileLocation>,
}

/// A resolved edge: handle, endpoints and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantiationEdge {
    pub id: EdgeId,
    /// The instantiator.
    pub from: VertexId,
    /// The instantiated entity.
    pub to: VertexId,
    pub kind: InstantiationKind,
}

impl InstantiationEdge {
    /// The endpoint on the far side when walking in `direction`.
    pub fn endpoint(&self, direction: Direction) -> VertexId {
        match direction {
            Direction::Outgoing => self.to,
            Direction::Incoming => self.from,
        }
    }
}

/// The instantiation graph of one metaprogram run.
#[derive(Debug, Clone)]
pub struct InstantiationGraph {
    graph: StableGraph<Vertex, InstantiationKind, Directed, u32>,
    /// Name -> vertex handle, the identity index.
    by_name: HashMap<String, VertexId>,
}

impl InstantiationGraph {
    /// Creates a graph holding only the `<root>` vertex.
    pub fn new() -> Self {
        let mut graph = InstantiationGraph {
            graph: StableGraph::new(),
            by_name: HashMap::new(),
        };
        let root = graph.add_vertex(ROOT_NAME, None);
        debug_assert_eq!(root, VertexId::ROOT);
        graph
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Inserts a vertex for `name`, or returns the existing one.
    ///
    /// The location is recorded only by the first call for a given name;
    /// later calls are no-ops.
    pub fn add_vertex(
        &mut self,
        name: impl Into<String>,
        point_of_instantiation: Option<FileLocation>,
    ) -> VertexId {
        let name = name.into();
        if let Some(&existing) = self.by_name.get(&name) {
            return existing;
        }

        let id = VertexId::from(self.graph.add_node(Vertex {
            name: name.clone(),
            point_of_instantiation,
        }));
        tracing::debug!(vertex = %id, name = %name, "added vertex");
        self.by_name.insert(name, id);
        id
    }

    /// Connects `from` (the instantiator) to `to` (the instantiated entity).
    ///
    /// Both endpoints must exist. Connecting an ordered pair twice is a defect
    /// in the event producer and yields [`CoreError::DuplicateEdge`].
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        kind: InstantiationKind,
    ) -> Result<EdgeId, CoreError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;

        if self.has_edge(from, to) {
            return Err(CoreError::DuplicateEdge { from, to });
        }

        let id = EdgeId::from(self.graph.add_edge(from.into(), to.into(), kind));
        tracing::debug!(edge = %id, %from, %to, %kind, "added edge");
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Looks up the vertex printed as `name`.
    pub fn find_vertex(&self, name: &str) -> Option<VertexId> {
        self.by_name.get(name).copied()
    }

    /// Returns the vertex data for a handle.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.graph.node_weight(id.into())
    }

    /// Returns the name of a vertex, or an empty string for a foreign handle.
    pub fn name(&self, id: VertexId) -> &str {
        self.vertex(id).map_or("", |v| v.name.as_str())
    }

    /// Returns `true` if `from -> to` is already connected.
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.graph.find_edge(from.into(), to.into()).is_some()
    }

    /// Edges leaving `v`, in insertion order.
    pub fn out_edges(&self, v: VertexId) -> Vec<InstantiationEdge> {
        self.edges_directed(v, Direction::Outgoing)
    }

    /// Edges entering `v`, in insertion order.
    pub fn in_edges(&self, v: VertexId) -> Vec<InstantiationEdge> {
        self.edges_directed(v, Direction::Incoming)
    }

    /// Edges adjacent to `v` in `direction`, in insertion order.
    pub fn edges_directed(&self, v: VertexId, direction: Direction) -> Vec<InstantiationEdge> {
        let idx: NodeIndex<u32> = v.into();
        if self.graph.node_weight(idx).is_none() {
            return Vec::new();
        }
        // petgraph yields adjacency newest-first; edge indices grow with
        // insertion since edges are never removed.
        let mut edges: Vec<InstantiationEdge> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| InstantiationEdge {
                id: EdgeId::from(e.id()),
                from: VertexId::from(e.source()),
                to: VertexId::from(e.target()),
                kind: *e.weight(),
            })
            .collect();
        edges.sort_by_key(|e| e.id);
        edges
    }

    /// All vertex handles, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.node_indices().map(VertexId::from)
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = InstantiationEdge> + '_ {
        self.graph.edge_indices().filter_map(move |idx: EdgeIndex<u32>| {
            let (source, target) = self.graph.edge_endpoints(idx)?;
            Some(InstantiationEdge {
                id: EdgeId::from(idx),
                from: VertexId::from(source),
                to: VertexId::from(target),
                kind: *self.graph.edge_weight(idx)?,
            })
        })
    }

    /// Number of vertices, `<root>` included.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn check_vertex(&self, id: VertexId) -> Result<(), CoreError> {
        if self.graph.node_weight(id.into()).is_none() {
            return Err(CoreError::VertexNotFound { id });
        }
        Ok(())
    }
}

impl Default for InstantiationGraph {
    fn default() -> Self {
        InstantiationGraph::new()
    }
}
