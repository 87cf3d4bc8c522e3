mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use pricing_diff::DocumentError;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pricing-diff")]
#[command(about = "Compute pricing document totals and compare revisions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compute totals for a pricing document")]
    Totals {
        #[arg(help = "Path to the pricing document JSON")]
        doc: String,
        #[arg(long, value_name = "PATH", help = "JSON file with price/description overrides")]
        overrides: Option<String>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, help = "Document total over detail tables only (exclude the master)")]
        detail_only: bool,
        #[arg(long, help = "Substitute 0 for malformed money fields, warning per field")]
        lenient: bool,
        #[arg(long, short, help = "Quiet mode: only show the document total")]
        quiet: bool,
        #[arg(long, short, help = "Verbose mode: show per-item detail")]
        verbose: bool,
    },
    #[command(about = "Compare two pricing document revisions")]
    Scan {
        #[arg(help = "Path to the old/base document JSON")]
        old: String,
        #[arg(help = "Path to the new/changed document JSON")]
        new: String,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, help = "Trim and case-fold names before matching sections and rows")]
        normalize_labels: bool,
        #[arg(long, help = "Skip the master-vs-details reconciliation warning")]
        no_reconcile: bool,
        #[arg(long, short, help = "Quiet mode: only show summary")]
        quiet: bool,
        #[arg(long, short, help = "Verbose mode: show unchanged sections and rows")]
        verbose: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    fn from_flags(quiet: bool, verbose: bool) -> Verbosity {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Totals {
            doc,
            overrides,
            format,
            detail_only,
            lenient,
            quiet,
            verbose,
        } => commands::totals::run(
            &doc,
            overrides.as_deref(),
            format,
            detail_only,
            lenient,
            Verbosity::from_flags(quiet, verbose),
        ),
        Commands::Scan {
            old,
            new,
            format,
            normalize_labels,
            no_reconcile,
            quiet,
            verbose,
        } => commands::scan::run(
            &old,
            &new,
            format,
            normalize_labels,
            no_reconcile,
            Verbosity::from_flags(quiet, verbose),
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for_error(&e)
        }
    }
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if is_input_error(err) {
        ExitCode::from(2)
    } else {
        ExitCode::from(3)
    }
}

fn is_input_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<DocumentError>()
            || cause.is::<std::io::Error>()
            || cause.is::<serde_json::Error>()
    })
}
