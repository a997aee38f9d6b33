//! `commentator`: learn comment phrasing from a commented C++ corpus and
//! suggest comments for uncommented code.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commentator_core::tracing::init_tracing;
use commentator_core::PipelineError;

mod commands;

use commands::{LearnCommand, SuggestCommand};

#[derive(Parser)]
#[command(name = "commentator")]
#[command(about = "Suggest comments for C++ sources from learned patterns and a domain dictionary")]
#[command(version)]
struct Cli {
    /// Enable diagnostic logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Learn comment templates from a commented reference corpus
    Learn(LearnCommand),

    /// Scan a source tree and write a comment suggestion report
    Suggest(SuggestCommand),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Learn(cmd) => cmd.execute(),
        Commands::Suggest(cmd) => cmd.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<PipelineError>()
                .map_or(1, PipelineError::exit_code);
            ExitCode::from(code)
        }
    }
}
