//! End-to-end: replay a recorded event stream, then trace and step it.

use metatrace_core::{build_graph, read_events, InstantiationGraph, InstantiationKind, VertexId};
use metatrace_trace::{CurrentFrame, RecordingDisplay, StepMachine, TraceConfig, TraceWalker};

const EVENTS: &str = r#"
{"phase":"begin","name":"fib<3>","kind":"TemplateInstantiation","location":{"file":"fib.cpp","line":12,"column":5}}
{"phase":"begin","name":"fib<2>","kind":"TemplateInstantiation","location":{"file":"fib.cpp","line":4,"column":22}}
{"phase":"begin","name":"fib<1>","kind":"Memoization","location":{"file":"fib.cpp","line":4,"column":22}}
{"phase":"end"}
{"phase":"begin","name":"fib<0>","kind":"Memoization"}
{"phase":"end"}
{"phase":"end"}
{"phase":"begin","name":"fib<1>","kind":"Memoization"}
{"phase":"end"}
{"phase":"end"}
"#;

fn fib_graph() -> InstantiationGraph {
    let events = read_events(EVENTS.as_bytes()).expect("events parse");
    build_graph(events).expect("events replay")
}

#[test]
fn replayed_graph_has_merged_vertices() {
    let graph = fib_graph();
    // <root>, fib<3>, fib<2>, fib<1>, fib<0>; the second fib<1> merges.
    assert_eq!(graph.vertex_count(), 5);
    assert_eq!(graph.edge_count(), 5);

    let fib1 = graph.find_vertex("fib<1>").unwrap();
    let loc = graph.vertex(fib1).unwrap().point_of_instantiation.clone();
    assert_eq!(loc.map(|l| l.line), Some(4));
    assert_eq!(graph.in_edges(fib1).len(), 2);
}

#[test]
fn full_forward_trace_renders_tree() {
    let graph = fib_graph();
    let mut display = RecordingDisplay::new(80);
    TraceWalker::new(&graph).full_forward(&mut display);

    assert_eq!(
        display.lines(),
        vec![
            "<root>",
            "+ fib<3> (TemplateInstantiation)",
            "  + fib<2> (TemplateInstantiation)",
            "  | + fib<1> (Memoization)",
            "  | + fib<0> (Memoization)",
            "  + fib<1> (Memoization)",
        ]
    );
}

#[test]
fn backtrace_of_memoized_vertex() {
    let graph = fib_graph();
    let mut display = RecordingDisplay::new(80);
    TraceWalker::new(&graph)
        .backward(&mut display, "fib<1>")
        .unwrap();

    assert_eq!(
        display.lines(),
        vec![
            "fib<1>",
            "+ fib<2> (Memoization)",
            "| + fib<3> (TemplateInstantiation)",
            "|   + <root> (TemplateInstantiation)",
            "+ fib<3> (Memoization)",
        ]
    );
}

#[test]
fn narrow_display_wraps_lines() {
    let graph = fib_graph();
    let mut display = RecordingDisplay::new(200);
    let config = TraceConfig {
        width: Some(16),
        color: true,
    };
    TraceWalker::new(&graph)
        .with_config(config)
        .forward(&mut display, "fib<2>")
        .unwrap();

    assert_eq!(
        display.lines(),
        vec![
            "fib<2>",
            "+ fib<1> (Memoiz",
            "| ation)",
            "+ fib<0> (Memoiz",
            "  ation)",
        ]
    );
}

#[test]
fn stepping_session_walks_every_instantiation() {
    let graph = fib_graph();
    let mut session = StepMachine::new(&graph);
    let mut display = RecordingDisplay::new(80);

    while session.print_step(&mut display) {}

    assert_eq!(
        display.lines(),
        vec!["fib<3>", "fib<2>", "fib<1>", "fib<0>", "fib<1>", "Stack is empty", "Stack is empty"]
    );
    assert_eq!(session.current_frame(), CurrentFrame::StackEmpty);
    assert_eq!(session.steps_taken(), 6);
}

#[test]
fn duplicate_edge_is_reported_as_internal() {
    let mut graph = fib_graph();
    let fib3 = graph.find_vertex("fib<3>").unwrap();
    let err = graph
        .add_edge(VertexId::ROOT, fib3, InstantiationKind::Memoization)
        .unwrap_err();
    assert!(err.is_internal());
}
