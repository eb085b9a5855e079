// File: src/main.rs
//
// Main entry point for the Pithon interpreter.
// Handles command-line argument parsing and dispatches to the appropriate
// subcommand (run, repl, or test).

use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;
use pithon::fixtures::{self, DEFAULT_FIXTURE_DIR};
use pithon::interpreter::{Interpreter, InterpreterConfig, DEFAULT_MAX_CALL_DEPTH};
use pithon::repl::Repl;
use pithon::{logging, parser};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(
    name = "pithon",
    about = "Pithon: a small Python-like scripting language",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None,
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log output (-v for debug, -vv for trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Maximum nesting of user-function calls
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Pithon script file
    Run {
        /// Path to the .py file
        file: PathBuf,
    },

    /// Launch the interactive Pithon REPL
    Repl,

    /// Run every fixture program and compare its output with the .out file
    Test {
        /// Directory holding the fixture programs
        #[arg(default_value = DEFAULT_FIXTURE_DIR)]
        dir: PathBuf,

        /// Regenerate all .out files based on actual output
        #[arg(long)]
        update: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = InterpreterConfig { max_call_depth: cli.max_call_depth };
    dispatch(cli.command, config)
}

fn dispatch(command: Commands, config: InterpreterConfig) -> ExitCode {
    match command {
        Commands::Run { file } => run_file(&file, config),

        Commands::Repl => match Repl::new(config).and_then(|mut repl| repl.run()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red(), err);
                ExitCode::FAILURE
            }
        },

        Commands::Test { dir, update } => match fixtures::run_fixtures(&dir, update, &config) {
            Ok(summary) if summary.all_passed() => ExitCode::SUCCESS,
            Ok(_) => ExitCode::FAILURE,
            Err(err) => {
                eprintln!("[!] Failed to read test directory {}: {}", dir.display(), err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_file(file: &Path, config: InterpreterConfig) -> ExitCode {
    let code = match fs::read_to_string(file) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} cannot read {}: {}", "Error:".bright_red(), file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(file = %file.display(), "running script");
    let mut interpreter = Interpreter::with_config(config);
    let result = parser::parse(&code).and_then(|program| interpreter.eval_program(&program));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let err = err.with_source_context(&code, Some(&file.display().to_string()));
            eprint!("{}", err);
            ExitCode::FAILURE
        }
    }
}
