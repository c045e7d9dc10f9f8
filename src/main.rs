use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};
use tracing::{error, warn};

use aletheia::catalog::{CoachingTarget, Difficulty};
use aletheia::coaching::CoachingEngine;
use aletheia::config::{AppConfig, CONFIG_KEYS};
use aletheia::error::{AletheiaError, ErrorSeverity};
use aletheia::export::{text, CoachingReport, ExportFormat, ExportManager};
use aletheia::formatting::{format_duration, format_pace, pace_label};
use aletheia::gait::{symmetry, LegCycle};
use aletheia::logging::{init_logging, LogLevel};
use aletheia::models::PerformanceMetric;
use aletheia::run::load_run;
use aletheia::scoring::{classify, ColorTag, MetricInfo};

/// Aletheia - post-run gait and coaching analytics
///
/// Reads recorded runs, scores their gait and injury metrics, and produces
/// coaching focus areas with drills.
#[derive(Parser)]
#[command(name = "aletheia")]
#[command(version)]
#[command(about = "Post-run gait and coaching analytics", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Coaching analysis for a recorded run
    Analyze {
        /// Run file (JSON)
        run: PathBuf,

        /// Snapshot number (defaults to the latest)
        #[arg(short, long)]
        snapshot: Option<u32>,

        /// Output format (text, json)
        #[arg(short = 'f', long, default_value = "text")]
        format: String,
    },

    /// Classify a 0-100 score
    Classify {
        score: u8,

        /// Also rate the score against a metric's optimal range
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Format elapsed seconds as a duration
    Duration { seconds: f64 },

    /// Format pace from distance and elapsed seconds
    Pace {
        /// Distance in the configured units
        distance: f64,

        /// Elapsed seconds
        duration: f64,
    },

    /// Left/right gait symmetry from phase percentages
    Symmetry {
        /// Left leg landing,stabilizing,launching,flying
        #[arg(short, long)]
        left: String,

        /// Right leg landing,stabilizing,launching,flying
        #[arg(short, long)]
        right: String,
    },

    /// List exercises from the catalog
    Exercises {
        /// Target metric (impact, sway, hip-mobility)
        #[arg(short, long)]
        target: Option<String>,

        /// Difficulty (foundational, intermediate, advanced)
        #[arg(short, long)]
        difficulty: Option<String>,
    },

    /// Export a run as a coaching report or snapshot table
    Export {
        /// Run file (JSON)
        run: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json, text)
        #[arg(short = 'f', long, default_value = "json")]
        format: String,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (key=value)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

#[derive(Tabled)]
struct ExerciseRow {
    #[tabled(rename = "Exercise")]
    name: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Difficulty")]
    difficulty: String,
    #[tabled(rename = "Duration")]
    duration: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)?;

    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    init_logging(&log_config)?;

    if !config.settings.color_output {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Analyze {
            run,
            snapshot,
            format,
        } => {
            let run = load_run(config.resolve_run_path(&run)).map_err(report_failure)?;
            let engine = CoachingEngine::with_catalog(config.exercise_catalog()?);
            let report =
                CoachingReport::build(&run, snapshot, &engine).map_err(report_failure)?;

            match format.to_lowercase().as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "text" => print_report(&report),
                "plain" => print!("{}", text::render_report(&report)),
                other => bail!("Unsupported output format: {}", other),
            }
        }

        Commands::Classify { score, metric } => {
            if score > 100 {
                bail!("Score must be between 0 and 100, got {}", score);
            }
            let tier = classify(score);
            println!("{} {}", score, paint(tier.label(), tier.color()).bold());

            if let Some(name) = metric {
                let info = metric_info(&name)?;
                println!("  {}: {}", info.title, info.rating(score));
                println!("  {}", info.description.dimmed());
            }
        }

        Commands::Duration { seconds } => {
            println!("{}", format_duration(seconds));
        }

        Commands::Pace { distance, duration } => {
            println!(
                "{}{}",
                format_pace(distance, duration),
                pace_label(config.settings.units)
            );
        }

        Commands::Symmetry { left, right } => {
            let left = parse_leg(&left).context("Invalid --left phases")?;
            let right = parse_leg(&right).context("Invalid --right phases")?;
            for (side, leg) in [("Left", &left), ("Right", &right)] {
                if !leg.is_valid() {
                    eprintln!(
                        "{}",
                        format!("Warning: {} phases add up to {:.1}%", side, leg.total()).yellow()
                    );
                }
            }
            let score = symmetry(&left, &right);
            let tier = classify(score);
            println!("Symmetry: {} ({})", score, paint(tier.label(), tier.color()));
        }

        Commands::Exercises { target, difficulty } => {
            let target = target
                .map(|t| t.parse::<CoachingTarget>())
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let difficulty = difficulty
                .map(|d| d.parse::<Difficulty>())
                .transpose()
                .map_err(anyhow::Error::msg)?;

            let catalog = config.exercise_catalog()?;
            let rows: Vec<ExerciseRow> = catalog
                .filter(target, difficulty)
                .into_iter()
                .map(|e| ExerciseRow {
                    name: e.name.clone(),
                    target: e.target.to_string(),
                    difficulty: e.difficulty.to_string(),
                    duration: e.duration.clone(),
                })
                .collect();

            if rows.is_empty() {
                println!("{}", "No exercises match".yellow());
            } else {
                let mut table = Table::new(rows);
                table.with(Style::rounded());
                println!("{}", table);
            }
        }

        Commands::Export {
            run,
            output,
            format,
        } => {
            let format: ExportFormat = format.parse()?;
            let run = load_run(config.resolve_run_path(&run)).map_err(report_failure)?;
            let manager =
                ExportManager::with_engine(CoachingEngine::with_catalog(config.exercise_catalog()?));
            manager
                .export(&run, format, &output)
                .map_err(report_failure)?;
            println!(
                "{}",
                format!("✓ Exported to {}", output.display()).green()
            );
        }

        Commands::Config { list, set, get } => {
            if list {
                for key in CONFIG_KEYS {
                    println!("{} = {}", key, config.get(key).unwrap_or_default());
                }
            } else if let Some(key_value) = set {
                let (key, value) = key_value
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Expected key=value, got '{}'", key_value))?;
                config.set(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                println!("{}", format!("✓ {} updated", key.trim()).green());
            } else if let Some(key) = get {
                let value = config
                    .get(&key)
                    .ok_or_else(|| anyhow!("Unknown configuration key: {}", key))?;
                println!("{}", value);
            } else {
                println!("Config file: {}", config_path.display());
            }
        }
    }

    Ok(())
}

/// Log a library error at its severity and turn it into the message shown to the user
fn report_failure(err: AletheiaError) -> anyhow::Error {
    match err.severity() {
        ErrorSeverity::Error => error!(error = %err, "Command failed"),
        ErrorSeverity::Warning => warn!(error = %err, "Command incomplete"),
    }
    anyhow!(err.user_message())
}

fn paint(text: &str, color: ColorTag) -> ColoredString {
    match color {
        ColorTag::Green => text.green(),
        ColorTag::Yellow => text.yellow(),
        ColorTag::Red => text.red(),
    }
}

fn parse_leg(phases: &str) -> Result<LegCycle> {
    let values = phases
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()?;
    match values.as_slice() {
        [landing, stabilizing, launching, flying] => {
            Ok(LegCycle::new(*landing, *stabilizing, *launching, *flying))
        }
        _ => bail!("Expected 4 comma-separated phases, got {}", values.len()),
    }
}

fn metric_info(name: &str) -> Result<MetricInfo> {
    let normalized = name.to_lowercase().replace(['-', ' '], "_");
    match normalized.as_str() {
        "hip_mobility" => return Ok(MetricInfo::HIP_MOBILITY),
        "hip_stability" => return Ok(MetricInfo::HIP_STABILITY),
        "symmetry" => return Ok(MetricInfo::SYMMETRY),
        _ => {}
    }
    PerformanceMetric::ALL
        .into_iter()
        .find(|m| m.key() == normalized)
        .map(MetricInfo::performance)
        .ok_or_else(|| anyhow!("Unknown metric: {}", name))
}

fn print_report(report: &CoachingReport) {
    let analysis = &report.analysis;
    let status_color = match analysis.overall_status {
        aletheia::OverallStatus::Good => ColorTag::Green,
        aletheia::OverallStatus::Attention => ColorTag::Yellow,
        aletheia::OverallStatus::Concern => ColorTag::Red,
    };

    println!(
        "{}",
        format!(
            "{} {} ({})",
            analysis.overall_status.symbol(),
            analysis.overall_status.title(),
            analysis.average_score
        )
        .bold()
    );
    println!("{}", paint(&analysis.summary_message, status_color));
    println!(
        "  {}  {}  {}  (snapshot {})",
        report.distance, report.duration, report.pace, report.snapshot_number
    );
    println!();

    println!("{}", "Performance".cyan().bold());
    for metric in PerformanceMetric::ALL {
        let score = report.performance.get(metric);
        let tier = classify(score);
        println!(
            "  {:<12} {:>3}  {}",
            metric.to_string(),
            score,
            paint(tier.label(), tier.color())
        );
    }
    println!();

    println!("{}", "Injury".cyan().bold());
    println!(
        "  Hip mobility {}  Hip stability {}  Symmetry {}  Risk {}",
        report.injury.hip_mobility,
        report.injury.hip_stability,
        report.injury.symmetry,
        report.injury.risk_level.to_string().bold()
    );
    println!(
        "  Cadence {} spm  Gait symmetry {}",
        report.gait.cadence, report.gait.symmetry
    );
    println!();

    if analysis.has_focus_areas() {
        println!("{}", "Focus Areas".cyan().bold());
        for focus in &analysis.focus_areas {
            println!(
                "  {} {} ({})",
                "▸".red(),
                focus.title.bold(),
                focus.score
            );
            println!("    {}", focus.quick_tip.dimmed());
            for exercise in &focus.exercises {
                println!("    • {} - {}", exercise.name, exercise.duration);
            }
        }
        println!();
    }

    if !analysis.strengths.is_empty() {
        println!("{}", "Strengths".cyan().bold());
        for strength in &analysis.strengths {
            println!("  {} {}", "✓".green(), strength);
        }
    }
}
