pub mod error;
pub mod export;
pub mod graph;
pub mod id;
pub mod ingest;
pub mod kind;
pub mod location;
pub mod name_head;

// Re-export commonly used types
pub use error::CoreError;
pub use export::{ExportFormat, GraphSnapshot};
pub use graph::{InstantiationEdge, InstantiationGraph, Vertex, ROOT_NAME};
pub use id::{EdgeId, VertexId};
pub use ingest::{build_graph, read_events, EventReplay, InstantiationEvent};
pub use kind::InstantiationKind;
pub use location::FileLocation;
pub use name_head::emphasis_span;
