//! dutyroster CLI - Duty Rostering Engine
//!
//! Command-line interface for validating roster files and producing duty
//! rosters.

mod roster;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dutyroster_core::Renderer;
use dutyroster_render::{JsonRenderer, TextRenderer};
use dutyroster_solver::{analyze_demand, RosterSolver};

use crate::roster::RosterFile;

/// Exit code when a run finishes without a usable roster
const EXIT_UNSOLVED: i32 = 2;

#[derive(Parser)]
#[command(name = "dutyroster")]
#[command(author, version, about = "Duty rostering engine", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a roster file and print its demand analysis (no solving)
    Check {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Quiet mode: suppress all output except errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Produce a duty roster from a roster file
    Solve {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Wall-clock budget in seconds (defaults scale with instance size)
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Soldier name column width (default: 16)
        #[arg(short = 'w', long, default_value = "16")]
        width: usize,

        /// Quiet mode: suppress stdout output (files are still written)
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Check { file, format, quiet } => cmd_check(&file, &format, quiet)?,
        Commands::Solve { file, format, output, time_limit, width, quiet } => {
            cmd_solve(&file, &format, output.as_deref(), time_limit, width, quiet)?
        }
    };
    std::process::exit(code);
}

fn cmd_check(file: &Path, format: &str, quiet: bool) -> Result<i32> {
    let roster_file = RosterFile::load(file)?;
    let params = roster_file.parameters();
    let soldiers = roster_file.soldiers();

    let analysis = analyze_demand(&params, &soldiers)
        .with_context(|| format!("invalid inputs in {}", file.display()))?;

    if !quiet {
        match format {
            "json" => println!("{}", serde_json::to_string_pretty(&analysis)?),
            _ => {
                println!(
                    "{} soldiers over {} days, {} of {} soldier-days available, {} required",
                    analysis.n_soldiers,
                    analysis.n_days,
                    analysis.available_soldier_days,
                    analysis.total_soldier_days,
                    analysis.required_soldier_days,
                );
                println!(
                    "base target {} needs {} block(s) and {} forced gap day(s)",
                    analysis.base_days_target, analysis.min_blocks, analysis.implied_gap_days,
                );
                if let Some(cause) = analysis.suspected {
                    println!("warning: inputs look tight ({cause:?})");
                }
            }
        }
    }
    Ok(0)
}

fn cmd_solve(
    file: &Path,
    format: &str,
    output: Option<&Path>,
    time_limit: Option<u64>,
    width: usize,
    quiet: bool,
) -> Result<i32> {
    let roster_file = RosterFile::load(file)?;
    let params = roster_file.parameters();
    let soldiers = roster_file.soldiers();

    let solver = match time_limit {
        Some(secs) => RosterSolver::with_time_limit(Duration::from_secs(secs)),
        None => RosterSolver::new(),
    };
    let outcome = solver
        .solve(&params, &soldiers)
        .with_context(|| format!("cannot roster {}", file.display()))?;

    let rendered = match format {
        "json" => JsonRenderer::pretty().render(&outcome)?,
        "text" => TextRenderer::new().name_width(width).render(&outcome)?,
        other => anyhow::bail!("unknown output format: {other}"),
    };

    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None if quiet => {}
        None => print!("{rendered}"),
    }

    Ok(if outcome.is_solved() { 0 } else { EXIT_UNSOLVED })
}
