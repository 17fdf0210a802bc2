//! Step-by-step traversal of a metaprogram.
//!
//! [`StepMachine`] walks the instantiation graph one instantiation per
//! [`step`](StepMachine::step), the way a debugger steps through statements.
//! Its stack and discovered set persist between calls, so a session can be
//! paused at any frame, inspected with [`current_frame`](StepMachine::current_frame),
//! and resumed.
//!
//! The pop order is the same as a full forward trace of the same graph.

use metatrace_core::{InstantiationGraph, InstantiationKind, VertexId};

use crate::display::{Display, ERROR_COLOR};
use crate::walker::DiscoveredSet;

/// Message shown when there is nothing left to step into.
pub const STACK_EMPTY: &str = "Stack is empty";

/// The frame a stepping session is stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentFrame {
    /// The next `step` will pop this vertex.
    At {
        vertex: VertexId,
        kind: Option<InstantiationKind>,
    },
    /// The metaprogram has been fully walked.
    StackEmpty,
}

/// Resumable forward traversal state for one debugging session.
pub struct StepMachine<'g> {
    graph: &'g InstantiationGraph,
    /// Pending `(vertex, incoming kind)` pairs; the last one is on top.
    stack: Vec<(VertexId, Option<InstantiationKind>)>,
    discovered: DiscoveredSet,
    steps_taken: usize,
}

impl<'g> StepMachine<'g> {
    /// Starts a session positioned at `<root>`.
    pub fn new(graph: &'g InstantiationGraph) -> Self {
        let mut machine = StepMachine {
            graph,
            stack: Vec::new(),
            discovered: DiscoveredSet::for_graph(graph),
            steps_taken: 0,
        };
        machine.reset();
        machine
    }

    /// Rewinds to `<root>` with nothing discovered.
    pub fn reset(&mut self) {
        self.discovered = DiscoveredSet::for_graph(self.graph);
        self.stack.clear();
        if self.graph.vertex_count() > 0 {
            self.stack.push((VertexId::ROOT, None));
        }
        self.steps_taken = 0;
    }

    /// Pops the current frame, expanding its vertex the first time it is seen.
    ///
    /// Returns `false` when the stack is already empty.
    pub fn step(&mut self) -> bool {
        let Some((vertex, _)) = self.stack.pop() else {
            return false;
        };

        if self.discovered.insert(vertex) {
            for edge in self.graph.out_edges(vertex).iter().rev() {
                self.stack.push((edge.to, Some(edge.kind)));
            }
        }
        self.steps_taken += 1;
        tracing::trace!(%vertex, depth = self.stack.len(), "step");
        true
    }

    /// Steps at most `n` times; returns how many steps were taken.
    pub fn step_n(&mut self, n: usize) -> usize {
        (0..n).take_while(|_| self.step()).count()
    }

    /// Steps until the stack is empty; returns how many steps were taken.
    pub fn run(&mut self) -> usize {
        let mut taken = 0;
        while self.step() {
            taken += 1;
        }
        taken
    }

    /// The frame the next `step` will pop.
    pub fn current_frame(&self) -> CurrentFrame {
        match self.stack.last() {
            Some(&(vertex, kind)) => CurrentFrame::At { vertex, kind },
            None => CurrentFrame::StackEmpty,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of vertices expanded so far.
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Number of successful steps since the last reset.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Prints the name of the current frame, or that the stack is empty.
    pub fn print_current_frame(&self, display: &mut dyn Display) {
        match self.current_frame() {
            CurrentFrame::At { vertex, .. } => {
                display.display(&format!("{}\n", self.graph.name(vertex)), None);
            }
            CurrentFrame::StackEmpty => {
                display.display(&format!("{}\n", STACK_EMPTY), Some(ERROR_COLOR));
            }
        }
    }

    /// Steps once and prints the new current frame. On an exhausted session
    /// prints that the stack is empty instead and changes nothing.
    pub fn print_step(&mut self, display: &mut dyn Display) -> bool {
        if !self.step() {
            display.display(&format!("{}\n", STACK_EMPTY), Some(ERROR_COLOR));
            return false;
        }
        self.print_current_frame(display);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingDisplay;
    use crate::walker::TraceWalker;
    use metatrace_core::InstantiationKind::{Memoization, TemplateInstantiation};

    /// root -> A -> B, root -> C (A declared before C).
    fn branching_graph() -> InstantiationGraph {
        let mut graph = InstantiationGraph::new();
        let a = graph.add_vertex("A", None);
        let b = graph.add_vertex("B", None);
        let c = graph.add_vertex("C", None);
        graph.add_edge(VertexId::ROOT, a, TemplateInstantiation).unwrap();
        graph.add_edge(a, b, Memoization).unwrap();
        graph.add_edge(VertexId::ROOT, c, TemplateInstantiation).unwrap();
        graph
    }

    fn visit_order(machine: &mut StepMachine<'_>) -> Vec<VertexId> {
        let mut order = Vec::new();
        while let CurrentFrame::At { vertex, .. } = machine.current_frame() {
            order.push(vertex);
            assert!(machine.step());
        }
        order
    }

    #[test]
    fn starts_at_root() {
        let graph = branching_graph();
        let machine = StepMachine::new(&graph);
        assert_eq!(
            machine.current_frame(),
            CurrentFrame::At {
                vertex: VertexId::ROOT,
                kind: None
            }
        );
        assert!(!machine.is_finished());
        assert_eq!(machine.discovered_count(), 0);
    }

    #[test]
    fn steps_in_declaration_order() {
        let graph = branching_graph();
        let mut machine = StepMachine::new(&graph);
        let order: Vec<&str> = visit_order(&mut machine)
            .into_iter()
            .map(|v| graph.name(v))
            .collect();
        assert_eq!(order, vec!["<root>", "A", "B", "C"]);
        assert!(machine.is_finished());
        assert_eq!(machine.discovered_count(), 4);
    }

    #[test]
    fn matches_full_forward_trace() {
        let graph = branching_graph();
        let mut machine = StepMachine::new(&graph);
        let stepped = visit_order(&mut machine);
        let traced: Vec<VertexId> = TraceWalker::new(&graph)
            .full_forward_frames()
            .into_iter()
            .map(|f| f.vertex)
            .collect();
        assert_eq!(stepped, traced);
    }

    #[test]
    fn current_frame_carries_edge_kind() {
        let graph = branching_graph();
        let mut machine = StepMachine::new(&graph);
        machine.step_n(2);
        assert_eq!(
            machine.current_frame(),
            CurrentFrame::At {
                vertex: graph.find_vertex("B").unwrap(),
                kind: Some(Memoization)
            }
        );
    }

    #[test]
    fn exhausted_machine_is_a_no_op() {
        let graph = branching_graph();
        let mut machine = StepMachine::new(&graph);
        assert_eq!(machine.run(), 4);
        assert_eq!(machine.steps_taken(), 4);

        assert!(!machine.step());
        assert_eq!(machine.step_n(3), 0);
        assert_eq!(machine.current_frame(), CurrentFrame::StackEmpty);
        assert_eq!(machine.steps_taken(), 4);

        let mut display = RecordingDisplay::new(80);
        assert!(!machine.print_step(&mut display));
        assert_eq!(display.text(), "Stack is empty\n");
        assert_eq!(display.segments()[0].1, Some(ERROR_COLOR));
    }

    #[test]
    fn step_n_stops_early() {
        let graph = branching_graph();
        let mut machine = StepMachine::new(&graph);
        assert_eq!(machine.step_n(10), 4);
    }

    #[test]
    fn reset_rewinds_to_root() {
        let graph = branching_graph();
        let mut machine = StepMachine::new(&graph);
        machine.run();
        machine.reset();
        assert_eq!(machine.steps_taken(), 0);
        assert_eq!(machine.discovered_count(), 0);
        assert_eq!(visit_order(&mut machine).len(), 4);
    }

    #[test]
    fn shared_vertex_is_popped_again_but_not_expanded() {
        let mut graph = branching_graph();
        let b = graph.find_vertex("B").unwrap();
        let c = graph.find_vertex("C").unwrap();
        graph.add_edge(c, b, TemplateInstantiation).unwrap();

        let mut machine = StepMachine::new(&graph);
        let order: Vec<&str> = visit_order(&mut machine)
            .into_iter()
            .map(|v| graph.name(v))
            .collect();
        assert_eq!(order, vec!["<root>", "A", "B", "C", "B"]);
        assert_eq!(machine.discovered_count(), 4);
    }

    #[test]
    fn print_frame_and_step() {
        let graph = branching_graph();
        let mut machine = StepMachine::new(&graph);
        let mut display = RecordingDisplay::new(80);

        machine.print_current_frame(&mut display);
        assert!(machine.print_step(&mut display));
        assert_eq!(display.lines(), vec!["<root>", "A"]);
    }
}
