//! ironplan - periodized strength program planner
//!
//! Every command prints JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use ironplan::auxiliary::{advance_offset, assign_auxiliaries, AuxiliaryPool};
use ironplan::config::{load_formula_config, load_json, AppConfig, ADVISORY_URL_ENV};
use ironplan::formula::next_training_max;
use ironplan::jit::{JitInput, JitOutput};
use ironplan::lifts::Lift;
use ironplan::math::{convert, estimate_one_rep_max, round_to_increment, WeightUnit};
use ironplan::schedule::generate_schedule;
use ironplan::strategy::{
    AdvisoryStrategy, ComparisonObserver, Divergence, FormulaStrategy, GenerationStrategy,
    HttpAdvisoryClient, HybridStrategy,
};
use ironplan::volume::{CompletedLift, MrvMevConfig, VolumeTracker};
use ironplan::warmup::{calculate_warmup, WarmupPreset};

#[derive(Parser)]
#[command(name = "ironplan")]
#[command(author, version, about = "Periodized strength planner with just-in-time sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the program skeleton
    Schedule {
        /// Program length including the final deload week
        #[arg(short, long, default_value = "10")]
        weeks: u32,

        /// Training days per week (3, 4 or 5)
        #[arg(short, long, default_value = "3")]
        days: u8,

        /// First day of the program (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        start: Option<NaiveDate>,
    },

    /// Prescribe one session from a JSON input file
    Session {
        /// Path to a JitInput JSON file
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "formula")]
        strategy: StrategyKind,

        /// Formula overrides JSON, merged over the system defaults
        #[arg(short, long)]
        overrides: Option<PathBuf>,

        /// Advisory endpoint (or set IRONPLAN_ADVISORY_URL)
        #[arg(long, env = "IRONPLAN_ADVISORY_URL")]
        advisory_url: Option<String>,
    },

    /// Assign auxiliary exercises for every block
    Aux {
        /// Path to a JSON list of {lift, exercises}
        pools: PathBuf,

        /// Persisted rotation offset
        #[arg(short, long, default_value = "0")]
        offset: usize,

        /// Blocks completed since the offset was saved
        #[arg(long, default_value = "0")]
        completed_blocks: usize,
    },

    /// Warmup ramp for a working weight
    Warmup {
        /// Working weight in kg
        weight: f64,

        #[arg(short, long, value_enum, default_value = "standard")]
        preset: PresetArg,

        #[arg(long, default_value = "2.5")]
        increment: f64,

        #[arg(long, default_value = "20")]
        bar: f64,
    },

    /// Estimate a one-rep max from a set
    Estimate {
        weight: f64,
        reps: u32,

        #[arg(short, long, value_enum, default_value = "kg")]
        unit: UnitArg,

        /// Also compute the next training max for this lift
        #[arg(long, requires = "current")]
        lift: Option<Lift>,

        /// Current training max, same unit as the weight
        #[arg(long, requires = "lift")]
        current: Option<f64>,

        #[arg(short, long)]
        overrides: Option<PathBuf>,
    },

    /// Weekly volume per muscle from completed lifts
    Volume {
        /// Path to a JSON list of {lift, sets}
        sessions: PathBuf,
    },

    /// Print the resolved formula config
    Config {
        #[arg(short, long)]
        overrides: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    Formula,
    Advisory,
    Hybrid,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Standard,
    Minimal,
    Extended,
}

impl From<PresetArg> for WarmupPreset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Standard => WarmupPreset::Standard,
            PresetArg::Minimal => WarmupPreset::Minimal,
            PresetArg::Extended => WarmupPreset::Extended,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Kg,
    Lb,
}

impl From<UnitArg> for WeightUnit {
    fn from(u: UnitArg) -> Self {
        match u {
            UnitArg::Kg => WeightUnit::Kg,
            UnitArg::Lb => WeightUnit::Lb,
        }
    }
}

/// Logs hybrid comparisons for later review
struct LogObserver;

impl ComparisonObserver for LogObserver {
    fn observe(
        &self,
        input: &JitInput,
        formula: &JitOutput,
        advisory: &JitOutput,
        divergence: &Divergence,
    ) -> Result<()> {
        tracing::info!(
            "Comparison {} {} on {}: formula {:?} x{}, advisory {:?} x{}, attention: {}",
            input.lift,
            input.intensity_type,
            input.session_date,
            formula.working_weight(),
            formula.sets.len(),
            advisory.working_weight(),
            advisory.sets.len(),
            divergence.needs_attention
        );
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn advisory_strategy(
    app: &AppConfig,
    url_flag: Option<String>,
) -> Result<AdvisoryStrategy<HttpAdvisoryClient>> {
    let mut app = app.clone();
    if url_flag.is_some() {
        app.advisory_url = url_flag;
    }
    let client = app.advisory_client().with_context(|| {
        format!("No advisory endpoint: pass --advisory-url or set {}", ADVISORY_URL_ENV)
    })?;
    Ok(AdvisoryStrategy::new(client).with_timeout(app.advisory_timeout))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let app = AppConfig::from_env()?;

    match cli.command {
        Commands::Schedule { weeks, days, start } => {
            let start = start.unwrap_or_else(|| chrono::Local::now().date_naive());
            print_json(&generate_schedule(weeks, days, start)?)?;
        }

        Commands::Session { input, strategy, overrides, advisory_url } => {
            let mut session: JitInput = load_json(&input)?;
            if overrides.is_some() {
                session.formula_config = load_formula_config(overrides.as_deref())?;
            }

            let output = match strategy {
                StrategyKind::Formula => FormulaStrategy::new().generate(&session).await?,
                StrategyKind::Advisory => {
                    advisory_strategy(&app, advisory_url)?
                        .generate(&session)
                        .await?
                }
                StrategyKind::Hybrid => {
                    HybridStrategy::new(advisory_strategy(&app, advisory_url)?)
                        .with_observer(Box::new(LogObserver))
                        .generate(&session)
                        .await?
                }
            };
            print_json(&output)?;
        }

        Commands::Aux { pools, offset, completed_blocks } => {
            let pools: Vec<AuxiliaryPool> = load_json(&pools)?;
            let offset = advance_offset(offset, completed_blocks);
            print_json(&serde_json::json!({
                "offset": offset,
                "assignments": assign_auxiliaries(&pools, offset),
            }))?;
        }

        Commands::Warmup { weight, preset, increment, bar } => {
            let preset = WarmupPreset::from(preset);
            print_json(&calculate_warmup(weight, preset.steps(), increment, bar))?;
        }

        Commands::Estimate { weight, reps, unit, lift, current, overrides } => {
            let unit = WeightUnit::from(unit);
            let estimate_kg = estimate_one_rep_max(convert(weight, unit, WeightUnit::Kg), reps)?;
            let mut report = serde_json::json!({
                "estimated_max": round_to_increment(convert(estimate_kg, WeightUnit::Kg, unit), 0.5),
                "unit": unit.suffix(),
            });
            if let (Some(lift), Some(current)) = (lift, current) {
                let config = load_formula_config(overrides.as_deref())?;
                let next = next_training_max(
                    lift,
                    convert(current, unit, WeightUnit::Kg),
                    Some(estimate_kg),
                    &config,
                )?;
                report["next_training_max"] = serde_json::json!(round_to_increment(
                    convert(next, WeightUnit::Kg, unit),
                    0.5
                ));
            }
            print_json(&report)?;
        }

        Commands::Volume { sessions } => {
            let sessions: Vec<CompletedLift> = load_json(&sessions)?;
            let tracker = VolumeTracker::from_sessions(&sessions);
            print_json(&tracker.weekly_report(&MrvMevConfig::default()))?;
        }

        Commands::Config { overrides } => {
            print_json(&load_formula_config(overrides.as_deref())?)?;
        }
    }

    Ok(())
}
