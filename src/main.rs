use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use brainfrick::{BoundsPolicy, BracketStrategy, BrainfuckError, Interpreter, Program, StdMachine};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod cli_util;
mod config;

use cli_util::print_run_error;

#[derive(Parser, Debug)]
#[command(
    name = "brainfrick",
    version,
    about = "Run Brainfuck code given literally or loaded from a file",
    after_help = r#"Notes:
- If CODE names a readable file, its contents are run; otherwise CODE itself is run.
- Literal CODE with no instructions prints a notice; a file with none runs as an empty program.
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- Input (`,`) reads one character from stdin; end of input aborts the run.
- Output (`.`) prints the cell value as a Unicode character.

Examples:
    brainfrick ./hello.bf
    brainfrick --cells 2 "++[>++<-]>."
    brainfrick ",[.,]" < input.txt"#
)]
struct Cli {
    /// Brainfuck code, or a path to a file containing Brainfuck code
    #[arg(value_name = "CODE", allow_hyphen_values = true)]
    code: String,

    /// Number of tape cells (fallback BF_CELLS, then brainfrick.toml; default 8)
    #[arg(long = "cells", value_name = "N")]
    cells: Option<usize>,

    /// Fail when the pointer moves past either end of the tape instead of staying put
    #[arg(long = "strict-bounds")]
    strict_bounds: bool,

    /// Match all brackets before running instead of scanning at each jump
    #[arg(long = "jump-table")]
    jump_table: bool,

    /// Log every executed instruction to stderr
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Where the program text came from.
enum Source {
    File(String),
    Literal(String),
}

/// Treat `arg` as a file path when it can be read, otherwise as literal code.
fn load_source(arg: &str) -> Source {
    match fs::read_to_string(arg) {
        Ok(text) => {
            debug!(path = arg, "running code from file");
            Source::File(text)
        }
        Err(e) => {
            debug!(error = %e, "argument is not a readable file; running it as code");
            Source::Literal(arg.to_string())
        }
    }
}

fn run(program: &str, cli: Cli) -> i32 {
    let Cli {
        code,
        cells,
        strict_bounds,
        jump_table,
        ..
    } = cli;

    // A file without instructions is an empty program; literal text without
    // any is most likely a mistyped path, so say so.
    let parsed = match load_source(&code) {
        Source::File(text) => Program::parse(&text),
        Source::Literal(text) => {
            let parsed = Program::parse(&text);
            if parsed.is_empty() {
                println!("No brainfuck code detected, exiting.");
                let _ = io::stdout().flush();
                return 0;
            }
            parsed
        }
    };

    let cells = config::resolve_cells(cells);
    let machine = match StdMachine::new(cells) {
        Ok(m) => m,
        Err(err) => {
            print_run_error(program, "", &err);
            return 2;
        }
    };
    let bounds = if strict_bounds {
        BoundsPolicy::Strict
    } else {
        BoundsPolicy::Saturate
    };
    let strategy = if jump_table {
        BracketStrategy::JumpTable
    } else {
        BracketStrategy::Scan
    };

    // Ctrl+C flips the flag; the interpreter checks it before every instruction.
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || cancel_handler.store(true, Ordering::Relaxed)) {
        warn!(error = %e, "failed to set ctrl+c handler");
    }

    let mut bf = Interpreter::new(machine.with_bounds(bounds))
        .with_strategy(strategy)
        .with_cancel_flag(cancel);

    let exit_code = match bf.interpret(&parsed) {
        Ok(()) => 0,
        Err(BrainfuckError::Canceled) => {
            eprintln!("Execution aborted: cancelled");
            130
        }
        Err(err) => {
            print_run_error(program, &parsed.to_string(), &err);
            1
        }
    };

    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    exit_code
}

fn main() {
    // We still pull the program name for error rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("brainfrick"));

    let cli = Cli::parse();
    init_logging(cli.debug);

    let code = run(&program, cli);
    std::process::exit(code);
}
