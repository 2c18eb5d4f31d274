//! dpo CLI: the command-line interface of the detailed placement optimizer.
//!
//! Provides `dpo improve` to run a command script over a design, `dpo check`
//! to run the legality checks alone, and `dpo hpwl` to report wirelength.

#![warn(missing_docs)]

mod check;
mod hpwl;
mod improve;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// dpo: detailed placement optimization over legalized rows.
#[derive(Parser, Debug)]
#[command(name = "dpo", version, about = "Detailed Placement Optimizer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `dpo.toml` file or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command script over a design.
    Improve(ImproveArgs),
    /// Run the legality checks on a design.
    Check(DesignArg),
    /// Print the total half-perimeter wirelength of a design.
    Hpwl(DesignArg),
}

/// Arguments for the `dpo improve` subcommand.
#[derive(Parser, Debug)]
pub struct ImproveArgs {
    /// JSON design file; taken from `dpo.toml` when omitted.
    pub design: Option<String>,

    /// Command script, e.g. "mis -p 10; gs -p 5".
    #[arg(short, long)]
    pub script: Option<String>,

    /// Seed for the optimizer's RNG.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write the optimized design.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format for the final report.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

/// A design path argument.
#[derive(Parser, Debug)]
pub struct DesignArg {
    /// JSON design file; taken from `dpo.toml` when omitted.
    pub design: Option<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

impl From<dpo_config::ReportFormat> for ReportFormat {
    fn from(format: dpo_config::ReportFormat) -> Self {
        match format {
            dpo_config::ReportFormat::Text => ReportFormat::Text,
            dpo_config::ReportFormat::Json => ReportFormat::Json,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("TERM").is_some_and(|t| t != "dumb"),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Improve(ref args) => improve::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Hpwl(ref args) => hpwl::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
