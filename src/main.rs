use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as CParser;
use log::error;

use ratioscript::{evaluator, Parser};

/// Interpreter for a small C-like expression language with exact rational
/// arithmetic.
#[derive(CParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Source file to run. Omit when only `--interactive` is given.
    file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Drop into a line-oriented REPL after running `file` (or instead of
    /// running anything, if `file` is omitted).
    #[arg(short, long)]
    interactive: bool,
}

fn log_level(verbosity: u8) -> log::Level {
    match verbosity {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();
    simple_logger::init_with_level(log_level(args.verbose)).expect("logger already initialized");

    let mut parser = Parser::new(vec![]);

    if let Some(file) = &args.file {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(err) => {
                error!("could not read file '{}': {err}", file.to_string_lossy());
                return ExitCode::FAILURE;
            }
        };
        if run(&mut parser, &source).is_err() {
            return ExitCode::FAILURE;
        }
    }

    if args.interactive {
        repl(&mut parser);
    }

    ExitCode::SUCCESS
}

/// Feeds `source` through the shared parser/context and prints each
/// statement's result; on failure, reports the error's wire-level name
/// and position via `log::error!`.
fn run(parser: &mut Parser, source: &str) -> Result<(), ()> {
    let program = parser.reset_source(source).and_then(|()| parser.parse_program());
    let program = match program {
        Ok(program) => program,
        Err(err) => {
            error!("{err}");
            return Err(());
        }
    };
    match evaluator::evaluate(&program, parser.context_mut()) {
        Ok(values) => {
            for value in values {
                println!("{value:?}");
            }
            Ok(())
        }
        Err(err) => {
            error!("{err}");
            Err(())
        }
    }
}

/// Read a line, evaluate it against the persistent context, print the
/// result or report the error, repeat. No history, completion, or
/// keybindings.
fn repl(parser: &mut Parser) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!(">> ");
        if stdout.flush().is_err() {
            return;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {}
            Err(err) => {
                error!("failed to read line: {err}");
                return;
            }
        }
        if line.trim().is_empty() {
            continue;
        }
        let _ = run(parser, &line);
    }
}
