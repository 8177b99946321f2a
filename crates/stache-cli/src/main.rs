//! Stache CLI entry point.
//!
//! Provides command-line tools for working with Mustache templates:
//! - `stache render` - Render a template file against JSON data
//! - `stache check` - Validate template syntax
//! - `stache spec` - Run conformance fixture suites

mod commands;
mod output;

use std::io::stderr;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{run_check, run_render, run_spec, CheckArgs, RenderArgs, SpecArgs};
use miette::{set_hook, MietteHandlerOpts, Result};
use tracing_subscriber::EnvFilter;

/// Mustache template tools.
#[derive(Debug, Parser)]
#[command(name = "stache")]
#[command(about = "Mustache template tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a template file
    Render(RenderArgs),
    /// Check template syntax
    Check(CheckArgs),
    /// Run JSON conformance fixture suites
    Spec(SpecArgs),
}

impl ColorWhen {
    /// Force colors on or off. `Auto` leaves detection of TTY, `NO_COLOR`
    /// and `FORCE_COLOR` to owo-colors.
    fn apply(self) {
        match self {
            ColorWhen::Auto => {}
            ColorWhen::Always => owo_colors::set_override(true),
            ColorWhen::Never => owo_colors::set_override(false),
        }
    }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `--verbose`.
fn setup_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.color.apply();
    setup_tracing(cli.verbose);
    set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(1)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::Check(args) => run_check(args),
        Commands::Spec(args) => run_spec(args),
    };

    let code = result.unwrap_or_else(|e| {
        eprintln!("{e:?}");
        exitcode::SOFTWARE
    });
    exit(code)
}
