//! Core error types for metatrace-core.
//!
//! Two tiers share one enum: user-facing lookups that can fail on bad input,
//! and internal defects that mean the event producer or the name grammar is
//! wrong. [`CoreError::is_internal`] tells them apart.

use crate::id::VertexId;
use thiserror::Error;

/// Errors produced by the metatrace-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A trace was requested for a name with no vertex.
    #[error("type \"{name}\" not found")]
    TypeNotFound { name: String },

    /// A vertex handle does not belong to the graph.
    #[error("vertex not found: VertexId({id})", id = id.0)]
    VertexNotFound { id: VertexId },

    /// The ordered pair is already connected.
    #[error("duplicate edge: VertexId({from}) -> VertexId({to})", from = from.0, to = to.0)]
    DuplicateEdge { from: VertexId, to: VertexId },

    /// A compiler-printed name did not match the qualified-name grammar.
    #[error("unrecognized name: '{name}'")]
    UnrecognizedName { name: String },

    /// The event stream closed more instantiations than it opened.
    #[error("unbalanced instantiation events: {reason}")]
    UnbalancedEvents { reason: String },
}

impl CoreError {
    /// Returns `true` for defects in the event producer or name grammar,
    /// `false` for errors caused by user input.
    pub fn is_internal(&self) -> bool {
        !matches!(self, CoreError::TypeNotFound { .. })
    }
}
