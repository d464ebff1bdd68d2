//! Command-line driver for the incremental BASIC compiler.
//!
//! `ibc [-r] <source-file>` compiles the file one line at a time, reports
//! any compile errors, and runs the program. With `-r` the recreated
//! listing is printed before execution.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use ibc_core::ProgramUnit;

/// Incremental BASIC compiler and interpreter
#[derive(Parser)]
#[command(name = "ibc")]
#[command(about = "Compiles and runs a BASIC source file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Print the recreated program listing before executing
    #[arg(short = 'r', long)]
    recreate: bool,

    /// BASIC source file to compile and run
    source_file: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // Usage problems exit 1, matching compile and file errors;
            // --help and --version still exit 0.
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(exit_code) => exit_code,
        Err(error) => {
            eprintln!("ibc: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let file_name = cli.source_file.display();
    let source = fs::read_to_string(&cli.source_file)
        .with_context(|| format!("{file_name}: could not open file"))?;
    debug!("compiling {file_name}");

    let mut program = ProgramUnit::new();
    let compiled_clean = program.compile_source(&source, &mut io::stderr().lock())?;
    if !compiled_clean {
        eprintln!("{file_name}: contains errors, program not run");
        return Ok(ExitCode::FAILURE);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.recreate {
        writeln!(out, "Program:")?;
        program.recreate(&mut out)?;
        writeln!(out)?;
        writeln!(out, "Executing...")?;
    }

    debug!("executing {file_name}");
    let ran_clean = program.run_code(&mut out)?;
    Ok(if ran_clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
