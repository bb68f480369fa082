//! World Model Probe CLI
//!
//! 기록된 관측 시나리오(JSON/YAML)를 월드 모델에 재생하고
//! cycle 별 reach-step 표 / kicker / offside line 을 출력한다.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use wm_core::engine::scenario_loader::{CycleReport, ScenarioPlayerRef, ScenarioReport};
use wm_core::{Scenario, WorldModelConfig};

#[derive(Parser)]
#[command(name = "wm_probe")]
#[command(about = "Replay observation scenarios through the world model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file and print per-cycle results
    Run {
        /// Scenario file (.json, .yaml, .yml)
        #[arg(long)]
        scenario: PathBuf,

        /// Preset overriding the scenario's own configuration
        #[arg(long)]
        profile: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Exit with a non-zero status when an assertion fails
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// Print the effective configuration of a preset as JSON
    Config {
        /// Preset name (standard, keepaway, parallel)
        #[arg(long, default_value = "standard")]
        profile: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, profile, format, strict } => {
            let mut loaded = Scenario::load_from_path(&scenario)
                .with_context(|| format!("loading scenario {}", scenario.display()))?;
            if let Some(name) = profile {
                debug!(profile = %name, "overriding scenario configuration");
                loaded.config = None;
                loaded.profile = Some(name);
            }
            info!(id = %loaded.id, cycles = loaded.cycles.len(), "replaying scenario");

            let report = loaded.run().with_context(|| format!("running scenario {}", loaded.id))?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => print_report(&report),
            }

            if strict && !report.passed() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Config { profile } => {
            let config = WorldModelConfig::from_profile(&profile)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &ScenarioReport) {
    println!("Scenario: {}", report.id);
    for cycle in &report.cycles {
        print_cycle(cycle);
    }

    println!();
    if report.passed() {
        println!("✅ All assertions passed");
    } else {
        println!("❌ {} assertion(s) failed", report.assertion_failures.len());
        for failure in &report.assertion_failures {
            println!("   - {}", failure);
        }
    }
}

fn print_cycle(cycle: &CycleReport) {
    println!(
        "\n── cycle {} ── ball ({:.2}, {:.2})",
        cycle.cycle, cycle.ball_position.x, cycle.ball_position.y
    );
    println!("   {:<6} {:>4} {:>3} {:>16} {:>6}", "side", "unum", "gk", "position", "reach");
    for entry in &cycle.reach_table {
        let unum = entry.unum.map_or_else(|| "?".to_string(), |u| u.to_string());
        let reach = entry.reach_step.map_or_else(|| "-".to_string(), |s| s.to_string());
        println!(
            "   {:<6} {:>4} {:>3} {:>16} {:>6}",
            format!("{:?}", entry.side),
            unum,
            if entry.is_goalie { "G" } else { "" },
            format!("({:.2}, {:.2})", entry.position.x, entry.position.y),
            reach
        );
    }

    println!(
        "   fastest: all {} / ours {} / theirs {}",
        tag(cycle.fastest_player),
        tag(cycle.fastest_teammate),
        tag(cycle.fastest_opponent)
    );
    let kicker = if cycle.kicker_ambiguous {
        format!("ambiguous ({} candidates)", cycle.kicker_candidates)
    } else {
        tag(cycle.kicker)
    };
    println!("   kicker: {} (side {:?})", kicker, cycle.kicker_side);
    println!(
        "   offside lines: ours {:.2} / theirs {:.2}",
        cycle.our_offside_line_x, cycle.their_offside_line_x
    );
    for dropped in &cycle.dropped {
        println!("   dropped: {}", dropped);
    }
}

fn tag(player: Option<ScenarioPlayerRef>) -> String {
    player.map_or_else(|| "-".to_string(), |p| format!("{:?} #{}", p.side, p.unum))
}
