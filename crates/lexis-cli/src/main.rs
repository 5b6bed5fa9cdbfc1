//! `lexis` command-line tool.
//!
//! Runs the lexis engine against JSON language files (one file per language,
//! named after the language):
//! - `lexis eval` evaluates one template with ad-hoc placeholder values
//! - `lexis check` validates language files against a set of paths
//! - `lexis coverage` compares language files with a reference file

mod commands;
mod output;
mod source;

use std::io;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{CheckArgs, CoverageArgs, EvalArgs, run_check, run_coverage, run_eval};
use miette::{IntoDiagnostic, MietteHandlerOpts};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lexis", version, about = "Evaluate and validate lexis language files")]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Log library activity (loading, reloading, cache misses) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    /// `Auto` leaves detection (TTY, `NO_COLOR`, `FORCE_COLOR`) to owo-colors.
    fn apply(self) {
        match self {
            ColorWhen::Auto => {}
            ColorWhen::Always => owo_colors::set_override(true),
            ColorWhen::Never => owo_colors::set_override(false),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check language files for missing or wrongly shaped values
    Check(CheckArgs),
    /// Compare language files against a reference file
    Coverage(CoverageArgs),
    /// Evaluate a single template
    Eval(EvalArgs),
}

impl Commands {
    fn run(self) -> miette::Result<i32> {
        match self {
            Commands::Check(args) => run_check(args),
            Commands::Coverage(args) => run_coverage(args),
            Commands::Eval(args) => run_eval(args),
        }
    }
}

/// Logs go to stderr so command output stays machine-readable. `RUST_LOG`
/// directives are combined with the one chosen by `--verbose`.
fn init_logging(verbose: bool) -> miette::Result<()> {
    let directive = if verbose { "lexis=debug" } else { "lexis=warn" };
    let filter = EnvFilter::from_default_env().add_directive(directive.parse().into_diagnostic()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();
    init_logging(cli.verbose)?;
    miette::set_hook(Box::new(|_| {
        Box::new(MietteHandlerOpts::new().unicode(true).context_lines(2).build())
    }))?;

    let code = cli.command.run().unwrap_or_else(|report| {
        eprintln!("{report:?}");
        exitcode::SOFTWARE
    });
    exit(code)
}
