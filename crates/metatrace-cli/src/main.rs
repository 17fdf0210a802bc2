//! Template metaprogram trace viewer CLI.
//!
//! Provides the `metatrace` binary, which loads the instantiation events an
//! instrumented compiler recorded for one metaprogram and renders forward
//! traces, backtraces and step-by-step sessions over them, or exports the
//! instantiation graph.

mod terminal;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use metatrace_core::export::{self, ExportFormat};
use metatrace_core::{build_graph, read_events, CoreError, InstantiationGraph};
use metatrace_trace::{Display, StepMachine, TraceConfig, TraceWalker};

use terminal::TerminalDisplay;

/// Template metaprogram trace viewer.
#[derive(Parser)]
#[command(name = "metatrace", about = "Template metaprogram trace viewer")]
struct Cli {
    /// Recorded instantiation events (JSON array or JSON lines).
    #[arg(short, long)]
    events: PathBuf,

    /// Rendering width (default: METATRACE_WIDTH, then the terminal width).
    #[arg(short, long)]
    width: Option<usize>,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show what a type instantiated (the whole metaprogram without NAME).
    Forwardtrace { name: Option<String> },

    /// Show the whole metaprogram.
    Trace,

    /// Show what led to a type being instantiated (every vertex without NAME).
    Backtrace { name: Option<String> },

    /// Step through the metaprogram from its start and show the frame reached.
    ///
    /// Sessions are not kept between invocations; each one starts at `<root>`.
    Step {
        /// Number of instantiations to step over.
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },

    /// Run the metaprogram to completion.
    Continue,

    /// Show the current frame of a fresh session, which is always `<root>`.
    ///
    /// Sessions are not kept between invocations, so this is `step --count 0`.
    Frame,

    /// Write the instantiation graph to a file.
    Export {
        /// Output format: dump, dot, json.
        #[arg(short, long, default_value = "dump")]
        format: String,

        /// Output file.
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = TraceConfig::from_env();
    if cli.width.is_some() {
        config.width = cli.width;
    }
    if cli.no_color {
        config.color = false;
    }

    let graph = match load_graph(&cli.events) {
        Ok(graph) => graph,
        Err(code) => process::exit(code),
    };

    process::exit(run_command(&graph, cli.command, config));
}

/// Reads and replays the event file.
///
/// Returns exit code 3 on I/O or parse errors and 2 on a malformed stream.
fn load_graph(path: &Path) -> Result<InstantiationGraph, i32> {
    let file = File::open(path).map_err(|e| {
        eprintln!("Error: failed to open '{}': {}", path.display(), e);
        3
    })?;
    let events = read_events(BufReader::new(file)).map_err(|e| {
        eprintln!("Error: failed to read events from '{}': {}", path.display(), e);
        3
    })?;
    tracing::info!(events = events.len(), "loaded instantiation events");

    build_graph(events).map_err(|e| error_code(&e))
}

/// Execute a subcommand.
///
/// Returns exit code: 0 = success, 1 = unknown type, 2 = internal error,
/// 3 = I/O error.
fn run_command(graph: &InstantiationGraph, command: Commands, config: TraceConfig) -> i32 {
    let mut display = TerminalDisplay::new();
    let color = config.color;
    let walker = TraceWalker::new(graph).with_config(config);

    let result = match command {
        Commands::Forwardtrace { name: Some(name) } => walker.forward(&mut display, &name),
        Commands::Forwardtrace { name: None } | Commands::Trace => {
            walker.full_forward(&mut display);
            Ok(())
        }
        Commands::Backtrace { name: Some(name) } => walker.backward(&mut display, &name),
        Commands::Backtrace { name: None } => {
            walker.full_backward(&mut display);
            Ok(())
        }
        Commands::Step { count } => {
            let mut session = StepMachine::new(graph);
            let taken = session.step_n(count);
            tracing::debug!(requested = count, taken, "stepped");
            session.print_current_frame(&mut display);
            Ok(())
        }
        Commands::Continue => {
            let mut session = StepMachine::new(graph);
            let taken = session.run();
            display.display(
                &format!("Metaprogram finished after {} steps\n", taken),
                Some(metatrace_trace::Color::Green).filter(|_| color),
            );
            Ok(())
        }
        Commands::Frame => {
            StepMachine::new(graph).print_current_frame(&mut display);
            Ok(())
        }
        Commands::Export { format, output } => return run_export(graph, &format, &output),
    };

    match result {
        Ok(()) => 0,
        // Lookup failures were already shown on the display.
        Err(e) if !e.is_internal() => {
            display.display("\n", None);
            1
        }
        Err(e) => error_code(&e),
    }
}

fn run_export(graph: &InstantiationGraph, format: &str, output: &Path) -> i32 {
    let format: ExportFormat = match format.parse() {
        Ok(format) => format,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 1;
        }
    };

    match export::export(graph, format, output) {
        Ok(()) => {
            println!("Graph written to {}", output.display());
            0
        }
        Err(e) => {
            eprintln!("I/O error: {}", e);
            3
        }
    }
}

/// Reports a core error and maps it to an exit code.
fn error_code(err: &CoreError) -> i32 {
    if err.is_internal() {
        tracing::error!(%err, "internal error");
        eprintln!("Internal error: {}", err);
        2
    } else {
        eprintln!("Error: {}", err);
        1
    }
}
