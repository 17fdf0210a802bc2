//! Depth-first traces over an [`InstantiationGraph`].
//!
//! [`TraceWalker`] renders forward traces (what a vertex instantiated) and
//! backtraces (what instantiated a vertex), rooted either at a named vertex or
//! covering the whole graph.
//!
//! The walk uses an explicit stack so instantiation chains of any length are
//! safe. Every popped frame is rendered, so a vertex reachable along several
//! paths appears once per path, but its children are only expanded the first
//! time it is popped. Children are pushed in reverse so they come off the
//! stack in declaration order.

use petgraph::Direction;

use metatrace_core::{CoreError, InstantiationGraph, InstantiationKind, VertexId};

use crate::config::TraceConfig;
use crate::display::{Display, ERROR_COLOR};
use crate::format::format_frame;

/// One unit of a traversal: a vertex, how deep it is, and the kind of the
/// edge it was reached through (`None` for the starting vertex).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub vertex: VertexId,
    pub depth: usize,
    pub kind: Option<InstantiationKind>,
}

impl Frame {
    pub fn start(vertex: VertexId) -> Self {
        Frame {
            vertex,
            depth: 0,
            kind: None,
        }
    }
}

/// Which vertices have had their children expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSet {
    marks: Vec<bool>,
}

impl DiscoveredSet {
    /// An empty set sized for `graph`.
    pub fn for_graph(graph: &InstantiationGraph) -> Self {
        DiscoveredSet {
            marks: vec![false; graph.vertex_count()],
        }
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.marks.get(v.index()).copied().unwrap_or(false)
    }

    /// Marks `v`; returns `true` if it was not marked before.
    pub fn insert(&mut self, v: VertexId) -> bool {
        let Some(mark) = self.marks.get_mut(v.index()) else {
            return false;
        };
        !std::mem::replace(mark, true)
    }

    pub fn len(&self) -> usize {
        self.marks.iter().filter(|&&m| m).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Renders traces of one graph.
pub struct TraceWalker<'g> {
    graph: &'g InstantiationGraph,
    config: TraceConfig,
}

impl<'g> TraceWalker<'g> {
    pub fn new(graph: &'g InstantiationGraph) -> Self {
        TraceWalker {
            graph,
            config: TraceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TraceConfig) -> Self {
        self.config = config;
        self
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Prints what `name` instantiated.
    ///
    /// An unknown name prints `type "<name>" not found` and returns
    /// [`CoreError::TypeNotFound`]; nothing else is printed.
    pub fn forward(&self, display: &mut dyn Display, name: &str) -> Result<(), CoreError> {
        let start = self.lookup(display, name)?;
        let width = self.width(display);
        let mut discovered = DiscoveredSet::for_graph(self.graph);
        self.visit(start, Direction::Outgoing, &mut discovered, |frame, pending| {
            self.render(display, frame, pending, width)
        });
        Ok(())
    }

    /// Prints the whole metaprogram starting at `<root>`.
    pub fn full_forward(&self, display: &mut dyn Display) {
        let width = self.width(display);
        let mut discovered = DiscoveredSet::for_graph(self.graph);
        self.visit(
            VertexId::ROOT,
            Direction::Outgoing,
            &mut discovered,
            |frame, pending| self.render(display, frame, pending, width),
        );
    }

    /// Prints what led to `name` being instantiated.
    pub fn backward(&self, display: &mut dyn Display, name: &str) -> Result<(), CoreError> {
        let start = self.lookup(display, name)?;
        let width = self.width(display);
        let mut discovered = DiscoveredSet::for_graph(self.graph);
        self.visit(start, Direction::Incoming, &mut discovered, |frame, pending| {
            self.render(display, frame, pending, width)
        });
        Ok(())
    }

    /// Prints backtraces covering every vertex exactly once.
    pub fn full_backward(&self, display: &mut dyn Display) {
        let width = self.width(display);
        self.full_backward_visit(|frame, pending| self.render(display, frame, pending, width));
    }

    // -----------------------------------------------------------------------
    // Frame streams
    // -----------------------------------------------------------------------

    /// Frames of [`forward`](Self::forward), in visiting order.
    pub fn forward_frames(&self, name: &str) -> Result<Vec<Frame>, CoreError> {
        let start = self.find(name)?;
        Ok(self.collect(start, Direction::Outgoing))
    }

    /// Frames of [`full_forward`](Self::full_forward), in visiting order.
    pub fn full_forward_frames(&self) -> Vec<Frame> {
        self.collect(VertexId::ROOT, Direction::Outgoing)
    }

    /// Frames of [`backward`](Self::backward), in visiting order.
    pub fn backward_frames(&self, name: &str) -> Result<Vec<Frame>, CoreError> {
        let start = self.find(name)?;
        Ok(self.collect(start, Direction::Incoming))
    }

    /// Frames of [`full_backward`](Self::full_backward), in visiting order.
    /// Every depth-0 frame starts a new pass.
    pub fn full_backward_frames(&self) -> Vec<Frame> {
        let mut frames = Vec::new();
        self.full_backward_visit(|frame, _| frames.push(*frame));
        frames
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Runs one DFS from `start` along `direction`, calling `on_frame` with
    /// each popped frame and the per-depth counts of frames still waiting.
    ///
    /// Does nothing if `start` is already discovered.
    fn visit<F>(
        &self,
        start: VertexId,
        direction: Direction,
        discovered: &mut DiscoveredSet,
        mut on_frame: F,
    ) where
        F: FnMut(&Frame, &[usize]),
    {
        if discovered.contains(start) {
            return;
        }
        tracing::debug!(start = %start, ?direction, "trace pass");

        let mut pending: Vec<usize> = vec![1];
        let mut stack = vec![Frame::start(start)];

        while let Some(frame) = stack.pop() {
            pending[frame.depth] -= 1;
            on_frame(&frame, &pending);

            if !discovered.insert(frame.vertex) {
                continue;
            }

            let child_depth = frame.depth + 1;
            if pending.len() <= child_depth {
                pending.resize(child_depth + 1, 0);
            }
            for edge in self.graph.edges_directed(frame.vertex, direction).iter().rev() {
                stack.push(Frame {
                    vertex: edge.endpoint(direction),
                    depth: child_depth,
                    kind: Some(edge.kind),
                });
                pending[child_depth] += 1;
            }
        }
    }

    /// Repeatedly backtraces from an undiscovered vertex whose out-edges all
    /// lead to discovered vertices, until none is left.
    ///
    /// Each search is a full scan of the vertices, so this is quadratic in the
    /// vertex count.
    fn full_backward_visit<F>(&self, mut on_frame: F)
    where
        F: FnMut(&Frame, &[usize]),
    {
        let mut discovered = DiscoveredSet::for_graph(self.graph);
        while let Some(start) = self.next_complete_vertex(&discovered) {
            self.visit(start, Direction::Incoming, &mut discovered, &mut on_frame);
        }
    }

    fn next_complete_vertex(&self, discovered: &DiscoveredSet) -> Option<VertexId> {
        self.graph.vertices().find(|&v| {
            !discovered.contains(v)
                && self
                    .graph
                    .out_edges(v)
                    .iter()
                    .all(|edge| discovered.contains(edge.to))
        })
    }

    fn collect(&self, start: VertexId, direction: Direction) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut discovered = DiscoveredSet::for_graph(self.graph);
        self.visit(start, direction, &mut discovered, |frame, _| frames.push(*frame));
        frames
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn find(&self, name: &str) -> Result<VertexId, CoreError> {
        self.graph
            .find_vertex(name)
            .ok_or_else(|| CoreError::TypeNotFound {
                name: name.to_string(),
            })
    }

    fn lookup(&self, display: &mut dyn Display, name: &str) -> Result<VertexId, CoreError> {
        self.find(name).inspect_err(|err| {
            display.display(&err.to_string(), Some(ERROR_COLOR).filter(|_| self.config.color));
        })
    }

    fn width(&self, display: &dyn Display) -> usize {
        self.config.effective_width(display.width())
    }

    fn render(&self, display: &mut dyn Display, frame: &Frame, pending: &[usize], width: usize) {
        let name = self.graph.name(frame.vertex);
        for line in format_frame(name, frame.kind, frame.depth, pending, width) {
            line.emit(display, self.config.color);
        }
    }
}
