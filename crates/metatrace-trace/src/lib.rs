//! Traversal and rendering of template instantiation graphs.
//!
//! # Architecture
//!
//! - [`TraceWalker`] renders forward traces and backtraces of an
//!   [`InstantiationGraph`](metatrace_core::InstantiationGraph) in one call,
//!   using an explicit-stack DFS.
//! - [`format_frame`] turns each traversal [`Frame`] into wrapped lines with
//!   tree connectors and an emphasized name head.
//! - [`StepMachine`] walks the same graph one instantiation at a time and
//!   keeps its state between calls, for step/continue/frame debugging.
//! - [`Display`] is the output surface; [`RecordingDisplay`] captures output.
//!
//! # Usage
//!
//! ```ignore
//! let walker = TraceWalker::new(&graph);
//! walker.full_forward(&mut display);
//!
//! let mut session = StepMachine::new(&graph);
//! while session.step() {
//!     session.print_current_frame(&mut display);
//! }
//! ```

pub mod config;
pub mod display;
pub mod format;
pub mod step;
pub mod walker;

pub use config::TraceConfig;
pub use display::{Color, Display, RecordingDisplay, DEPTH_PALETTE};
pub use format::{format_frame, Segment, TraceLine};
pub use step::{CurrentFrame, StepMachine};
pub use walker::{DiscoveredSet, Frame, TraceWalker};

#[cfg(test)]
mod tests {
    use super::*;
    use metatrace_core::{InstantiationGraph, InstantiationKind, VertexId};
    use proptest::prelude::*;

    /// Builds a DAG on `n + 1` vertices from a list of candidate edges. An
    /// edge is kept only if it points from a lower to a higher vertex, which
    /// rules out cycles, and only once per ordered pair.
    fn dag(n: usize, candidates: &[(usize, usize)]) -> InstantiationGraph {
        let mut graph = InstantiationGraph::new();
        let ids: Vec<VertexId> = std::iter::once(VertexId::ROOT)
            .chain((1..=n).map(|i| graph.add_vertex(format!("v{}", i), None)))
            .collect();

        for &(from, to) in candidates {
            let (from, to) = (from % ids.len(), to % ids.len());
            if from < to && !graph.has_edge(ids[from], ids[to]) {
                graph
                    .add_edge(ids[from], ids[to], InstantiationKind::TemplateInstantiation)
                    .unwrap();
            }
        }
        graph
    }

    proptest! {
        #[test]
        fn full_backtrace_discovers_every_vertex_once(
            n in 0usize..12,
            candidates in prop::collection::vec((0usize..13, 0usize..13), 0..40),
        ) {
            let graph = dag(n, &candidates);
            let frames = TraceWalker::new(&graph).full_backward_frames();

            // A vertex is expanded when first popped, so first appearances
            // are the discoveries.
            let mut seen = DiscoveredSet::for_graph(&graph);
            let mut discoveries = 0;
            for frame in &frames {
                if seen.insert(frame.vertex) {
                    discoveries += 1;
                }
            }
            prop_assert_eq!(discoveries, graph.vertex_count());
            prop_assert_eq!(seen.len(), graph.vertex_count());
        }

        #[test]
        fn stepping_matches_full_forward_order(
            n in 0usize..12,
            candidates in prop::collection::vec((0usize..13, 0usize..13), 0..40),
        ) {
            let graph = dag(n, &candidates);
            let traced: Vec<VertexId> = TraceWalker::new(&graph)
                .full_forward_frames()
                .into_iter()
                .map(|f| f.vertex)
                .collect();

            let mut machine = StepMachine::new(&graph);
            let mut stepped = Vec::new();
            while let CurrentFrame::At { vertex, .. } = machine.current_frame() {
                stepped.push(vertex);
                machine.step();
            }
            prop_assert_eq!(stepped, traced);
        }
    }
}
