//! Builds an [`InstantiationGraph`] from the compiler's event stream.
//!
//! An instrumented compiler reports instantiations as nested `begin`/`end`
//! pairs. Every `begin` is instantiated by whatever is currently open, so
//! [`EventReplay`] keeps a stack of open vertices whose bottom is `<root>`.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::graph::InstantiationGraph;
use crate::id::VertexId;
use crate::kind::InstantiationKind;
use crate::location::FileLocation;

/// One entry of the compiler's instantiation trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum InstantiationEvent {
    /// `name` starts being instantiated by the innermost open entity.
    Begin {
        name: String,
        kind: InstantiationKind,
        #[serde(default)]
        location: Option<FileLocation>,
    },
    /// The innermost open instantiation finished.
    End,
}

/// Replays events into a graph.
#[derive(Debug)]
pub struct EventReplay {
    graph: InstantiationGraph,
    open: Vec<VertexId>,
}

impl EventReplay {
    pub fn new() -> Self {
        EventReplay {
            graph: InstantiationGraph::new(),
            open: vec![VertexId::ROOT],
        }
    }

    /// Applies a single event.
    ///
    /// A `begin` that repeats an already recorded parent/child pair (the same
    /// memoized lookup reported twice) reuses the existing edge.
    pub fn apply(&mut self, event: InstantiationEvent) -> Result<(), CoreError> {
        match event {
            InstantiationEvent::Begin {
                name,
                kind,
                location,
            } => {
                let parent = *self.open.last().ok_or_else(|| CoreError::UnbalancedEvents {
                    reason: "no open instantiation".into(),
                })?;
                let vertex = self.graph.add_vertex(name, location);
                if !self.graph.has_edge(parent, vertex) {
                    self.graph.add_edge(parent, vertex, kind)?;
                }
                self.open.push(vertex);
            }
            InstantiationEvent::End => {
                if self.open.len() <= 1 {
                    return Err(CoreError::UnbalancedEvents {
                        reason: "end event without a matching begin".into(),
                    });
                }
                self.open.pop();
            }
        }
        Ok(())
    }

    /// Number of instantiations still open, `<root>` excluded.
    pub fn open_depth(&self) -> usize {
        self.open.len().saturating_sub(1)
    }

    /// Finishes the replay. Instantiations left open are tolerated since a
    /// failed compilation stops mid-trace.
    pub fn finish(self) -> InstantiationGraph {
        if self.open.len() > 1 {
            tracing::warn!(open = self.open.len() - 1, "event stream ended with open instantiations");
        }
        self.graph
    }
}

impl Default for EventReplay {
    fn default() -> Self {
        EventReplay::new()
    }
}

/// Builds a graph from a sequence of events.
pub fn build_graph<I>(events: I) -> Result<InstantiationGraph, CoreError>
where
    I: IntoIterator<Item = InstantiationEvent>,
{
    let mut replay = EventReplay::new();
    for event in events {
        replay.apply(event)?;
    }
    Ok(replay.finish())
}

/// Reads events as either one JSON array or JSON lines.
pub fn read_events<R: Read>(mut reader: R) -> Result<Vec<InstantiationEvent>, serde_json::Error> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(serde_json::Error::io)?;

    if text.trim_start().starts_with('[') {
        return serde_json::from_str(&text);
    }
    serde_json::Deserializer::from_str(&text)
        .into_iter::<InstantiationEvent>()
        .collect()
}
