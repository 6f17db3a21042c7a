//! Kaleido Driver
//!
//! Command line entry point: run a source file, start a REPL, or print the
//! lowered IR of a file.

mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kal_frontend::CodegenOptions;
use kal_vm::{VmConfig, DEFAULT_MAX_STEPS};
use session::{Outcome, Session};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kal")]
#[command(about = "Kaleido compiler and interpreter")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and evaluate a source file
    Run {
        /// Input source file
        input: PathBuf,

        /// Print the IR of each item to stderr
        #[arg(long)]
        print_ir: bool,

        /// Write the final module as JSON
        #[arg(long, value_name = "PATH")]
        emit_json: Option<PathBuf>,

        /// Skip the optimization passes
        #[arg(long)]
        no_opt: bool,

        /// Instructions each top-level expression may execute
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: u64,
    },

    /// Read items from stdin and evaluate them line by line
    Repl {
        #[arg(long)]
        print_ir: bool,

        #[arg(long)]
        no_opt: bool,
    },

    /// Print the lowered module of a source file
    Ir {
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        #[arg(long)]
        no_opt: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ok = match cli.command {
        Commands::Run { input, print_ir, emit_json, no_opt, max_steps } => {
            let config = VmConfig { max_steps, ..VmConfig::default() };
            run_file(&input, print_ir, emit_json.as_deref(), codegen_options(no_opt), config)?
        }
        Commands::Repl { print_ir, no_opt } => run_repl(print_ir, codegen_options(no_opt))?,
        Commands::Ir { input, json, no_opt } => print_module(&input, json, codegen_options(no_opt))?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

fn codegen_options(no_opt: bool) -> CodegenOptions {
    CodegenOptions { optimize: !no_opt, ..CodegenOptions::default() }
}

fn module_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("module")
        .to_string()
}

fn print_outcomes(outcomes: &[Outcome], print_ir: bool) {
    for outcome in outcomes {
        match outcome {
            Outcome::Defined { name, ir } if print_ir => eprint!("Read function definition '{name}':\n{ir}"),
            Outcome::Declared { name, ir } if print_ir => eprint!("Read extern '{name}':\n{ir}"),
            Outcome::Lowered { ir } if print_ir => eprint!("Read top-level expression:\n{ir}"),
            Outcome::Evaluated { value, ir } => {
                if print_ir {
                    eprint!("Read top-level expression:\n{ir}");
                }
                println!("Evaluated to {value:.6}");
            }
            _ => {}
        }
    }
}

/// Returns whether every item compiled and ran
fn run_file(
    input: &Path,
    print_ir: bool,
    emit_json: Option<&Path>,
    options: CodegenOptions,
    config: VmConfig,
) -> Result<bool> {
    let source = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;

    let mut session = Session::new(&module_name(input), options, config);
    let outcomes = session.eval_source(&source);
    print_outcomes(&outcomes, print_ir);

    if let Some(path) = emit_json {
        let json = serde_json::to_string_pretty(session.module())?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        eprintln!("Module written to: {}", path.display());
    }

    let reporter = session.reporter();
    if !reporter.diagnostics().is_empty() {
        reporter.print_diagnostics();
        eprintln!("{}", reporter.summary());
    }
    Ok(!reporter.has_errors())
}

fn run_repl(print_ir: bool, options: CodegenOptions) -> Result<bool> {
    let mut session = Session::new("repl", options, VmConfig::default());
    let stdin = io::stdin();

    eprint!("ready> ");
    io::stderr().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            let outcomes = session.eval_source(&line);
            print_outcomes(&outcomes, print_ir);

            let reporter = session.reporter_mut();
            reporter.print_diagnostics();
            reporter.clear();
        }
        eprint!("ready> ");
        io::stderr().flush()?;
    }
    eprintln!();
    Ok(true)
}

fn print_module(input: &Path, json: bool, options: CodegenOptions) -> Result<bool> {
    let source = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;

    let mut session = Session::compile_only(&module_name(input), options);
    session.eval_source(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(session.module())?);
    } else {
        print!("{}", session.module());
    }

    let reporter = session.reporter();
    reporter.print_diagnostics();
    Ok(!reporter.has_errors())
}
