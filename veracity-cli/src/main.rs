//! Veracity CLI
//!
//! Explainable fake-review scoring over a flat-file data directory.

mod data;
mod rescore;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use veracity_core::{ReviewSubmission, ScoreResult, ScoringConfig};
use veracity_engine::{Assessor, Engine};
use veracity_signals::{FixedPolarity, LexiconOracle, SharedOracle};

#[derive(Parser)]
#[command(name = "veracity")]
#[command(author, version, about = "Veracity: explainable fake-review scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

/// Options shared by every command that builds an engine
#[derive(clap::Args)]
struct EngineArgs {
    /// Scoring configuration file (TOML)
    #[arg(long, env = "VERACITY_CONFIG")]
    config: Option<PathBuf>,

    /// Word polarity table for the lexicon oracle (TOML)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Use this fixed polarity instead of the lexicon oracle
    #[arg(long, allow_hyphen_values = true)]
    polarity: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a new review
    Score {
        /// Directory holding users.json, products.json and reviews.json
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,

        /// Author id
        #[arg(short, long)]
        user: String,

        /// Product id
        #[arg(short, long)]
        product: String,

        /// Star rating (1-5)
        #[arg(short, long)]
        rating: f64,

        /// Review text
        #[arg(short, long)]
        text: String,

        /// Submission time (RFC 3339, default: now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Replay stored reviews and report label changes
    Rescore {
        /// Directory holding users.json, products.json and reviews.json
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,

        /// Only print reviews whose label changed or failed to score
        #[arg(long)]
        changed_only: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Print the effective scoring configuration
    Config {
        /// Scoring configuration file (TOML)
        #[arg(long, env = "VERACITY_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Score {
            data_dir,
            user,
            product,
            rating,
            text,
            at,
            json,
            engine,
        } => {
            let submission =
                ReviewSubmission::new(user, product, rating, text, at.unwrap_or_else(Utc::now));
            run_score(&data_dir, &submission, &engine, json)?;
        }
        Commands::Rescore {
            data_dir,
            changed_only,
            engine,
        } => {
            run_rescore(&data_dir, &engine, changed_only)?;
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins over the verbosity flag when set
fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    Ok(match path {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    })
}

fn build_engine(args: &EngineArgs) -> Result<Engine> {
    let config = load_config(args.config.as_deref())?;

    let oracle: SharedOracle = match (args.polarity, &args.lexicon) {
        (Some(polarity), _) => Arc::new(FixedPolarity(polarity)),
        (None, Some(path)) => Arc::new(LexiconOracle::load(path)?),
        (None, None) => Arc::new(LexiconOracle::embedded()),
    };

    Ok(Engine::new(config, oracle)?)
}

fn run_score(
    data_dir: &Path,
    submission: &ReviewSubmission,
    args: &EngineArgs,
    json: bool,
) -> Result<()> {
    let store = Arc::new(data::load_store(data_dir)?);
    let assessor = Assessor::with_store(build_engine(args)?, store);
    let result = assessor.assess(submission)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(submission, &result);
    }

    Ok(())
}

fn print_result(submission: &ReviewSubmission, result: &ScoreResult) {
    let icon = if result.is_fake() { "🚩" } else { "✅" };
    println!(
        "{} {} (confidence {}%) - review by {} on {}, rating {}",
        icon,
        result.label,
        result.confidence,
        submission.author_id,
        submission.product_id,
        submission.rating
    );

    if !result.reasons.is_empty() {
        println!("\nReasons:");
        for reason in &result.reasons {
            println!("   - {}", reason);
        }
    }

    println!("\nSignals:");
    for report in &result.signals {
        let state = match (report.evaluated, report.fired) {
            (false, _) => "not evaluated",
            (true, true) => "fired",
            (true, false) => "clear",
        };
        let detail = match (report.score, report.value) {
            (Some(score), _) => format!("score {}", score),
            (None, Some(value)) => format!("value {:.2}", value),
            (None, None) => String::new(),
        };
        println!(
            "   {:<20} {:<14} +{:<3} {}",
            format!("{:?}", report.kind),
            state,
            report.penalty,
            detail
        );
    }

    if !result.not_evaluated.is_empty() {
        println!("\n⚠️  Sentiment unavailable; skipped: {:?}", result.not_evaluated);
    }
}

fn run_rescore(data_dir: &Path, args: &EngineArgs, changed_only: bool) -> Result<()> {
    let store = data::load_store(data_dir)?;
    let engine = build_engine(args)?;
    let replayed = rescore::replay(&store, &engine);

    let mut changed = 0;
    let mut failed = 0;

    for entry in &replayed {
        match &entry.outcome {
            Ok(result) => {
                let was = entry
                    .stored
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string());
                if entry.changed() {
                    changed += 1;
                } else if changed_only {
                    continue;
                }
                println!(
                    "{:<8} {:<8} -> {:<8} {:>3}%  {}",
                    entry.id,
                    was,
                    result.label,
                    result.confidence,
                    result.reasons.join("; ")
                );
            }
            Err(e) => {
                failed += 1;
                println!("{:<8} error: {}", entry.id, e);
            }
        }
    }

    println!(
        "\n📊 Replayed {} reviews: {} label changes, {} failures",
        replayed.len(),
        changed,
        failed
    );
    Ok(())
}
