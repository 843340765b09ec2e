//! Smokesense CLI
//!
//! Sensor-to-bag pipeline for smoking episode detection research.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use smokesense::{
    config::Config,
    model::{save_outcome, Experiment},
    pipeline::{self, PipelineOptions},
    report::{label_shares, RunReport},
    store, VERSION,
};

#[derive(Parser)]
#[command(name = "smokesense")]
#[command(version = VERSION)]
#[command(about = "Sensor-to-bag pipeline for smoking episode detection research", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate labeled bags and export train/test splits
    Bags {
        /// Directory containing participant data
        base_dir: PathBuf,

        /// Window width in minutes (overrides config)
        #[arg(long)]
        bag_interval: Option<i64>,

        /// Target test-set fraction (overrides config)
        #[arg(long)]
        pct_test: Option<f64>,

        /// Output directory for the split files (overrides config)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Skip participants that fail instead of aborting the run
        #[arg(long)]
        skip_failures: bool,
    },

    /// Run hyperparameter search over a classifier on a training split
    Train {
        /// File containing training bags (JSON)
        #[arg(long)]
        train: PathBuf,

        /// Model type
        #[arg(long, default_value = "threshold")]
        model: String,

        /// Number of hyperparameter settings to evaluate
        #[arg(long, default_value = "40")]
        iterations: usize,

        /// Collapse each bag to its instance-wise feature mean before
        /// fitting (single-instance mode)
        #[arg(long)]
        take_mean: bool,

        /// Base directory for experiment outputs
        #[arg(long, default_value = "saved_models")]
        output: PathBuf,
    },

    /// Show label statistics for a bag file
    Stats {
        /// File containing bags (JSON)
        #[arg(long)]
        bags: PathBuf,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bags {
            base_dir,
            bag_interval,
            pct_test,
            output,
            skip_failures,
        } => {
            cmd_bags(base_dir, bag_interval, pct_test, output, skip_failures);
        }
        Commands::Train {
            train,
            model,
            iterations,
            take_mean,
            output,
        } => {
            cmd_train(train, &model, iterations, take_mean, output);
        }
        Commands::Stats { bags } => {
            cmd_stats(bags);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_bags(
    base_dir: PathBuf,
    bag_interval: Option<i64>,
    pct_test: Option<f64>,
    output: Option<PathBuf>,
    skip_failures: bool,
) {
    println!("Smokesense v{VERSION}");
    println!();

    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    let options = PipelineOptions {
        base_dir,
        bag_interval_minutes: bag_interval.unwrap_or(config.bag_interval_minutes),
        pct_test: pct_test.unwrap_or(config.pct_test),
        output_dir: output.unwrap_or_else(|| config.export_path.clone()),
        skip_failures,
    };

    if options.bag_interval_minutes <= 0 {
        eprintln!("Error: --bag-interval must be positive");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&options.pct_test) {
        eprintln!("Error: --pct-test must be between 0 and 1");
        std::process::exit(1);
    }

    println!("Generating bags...");
    println!("  Window width: {} min", options.bag_interval_minutes);
    println!("  Target test fraction: {:.2}", options.pct_test);
    println!();

    let report = RunReport::with_persistence(
        config
            .data_path
            .join("reports")
            .join(format!("run_{}.json", Utc::now().format("%Y%m%d_%H%M%S"))),
    );

    match pipeline::run(&options, &report) {
        Ok(outcome) => {
            println!();
            println!("Exported {} training bags to {:?}", outcome.train_count, outcome.train_path);
            println!("Exported {} test bags to {:?}", outcome.test_count, outcome.test_path);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    if let Err(e) = report.save() {
        eprintln!("Warning: Could not save run report: {e}");
    }

    println!();
    println!("{}", report.summary());
    println!("Done");
}

fn cmd_train(train: PathBuf, model: &str, iterations: usize, take_mean: bool, output: PathBuf) {
    let mut bags = match store::load_bags(&train) {
        Ok(bags) => bags,
        Err(e) => {
            eprintln!("Error loading {train:?}: {e}");
            std::process::exit(1);
        }
    };
    println!("Loaded {} training bags from {:?}", bags.len(), train);

    if take_mean {
        println!("Taking the feature mean of bag instances...");
        let before = bags.len();
        bags = bags.iter().filter_map(|b| b.mean_pooled()).collect();
        if bags.len() < before {
            eprintln!(
                "Warning: dropped {} bags with no instance rows",
                before - bags.len()
            );
        }
    }

    println!("Starting {model} experiment ({iterations} settings)...");
    let experiment = Experiment::new(model, iterations);
    let outcome = match experiment.run(&bags) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Best F1 Score={:.5}", outcome.best_metrics.f1);
    println!(
        "  precision={:.5} recall={:.5} ({} settings evaluated)",
        outcome.best_metrics.precision, outcome.best_metrics.recall, outcome.evaluated
    );

    // One directory per run keeps repeated experiments side by side.
    let output_dir = output
        .join(model)
        .join(Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string());
    match save_outcome(&output_dir, &outcome) {
        Ok(()) => println!("Saved best configuration to {output_dir:?}"),
        Err(e) => {
            eprintln!("Error writing experiment output: {e}");
            std::process::exit(1);
        }
    }

    println!("Done");
}

fn cmd_stats(bags: PathBuf) {
    let bags = match store::load_bags(&bags) {
        Ok(bags) => bags,
        Err(e) => {
            eprintln!("Error loading {bags:?}: {e}");
            std::process::exit(1);
        }
    };

    let labels: Vec<i8> = bags.iter().map(|b| b.label).collect();
    let (positive, negative) = label_shares(&labels);

    println!("Number of Data Points: {}", bags.len());
    println!("Positive: {positive:.2} | Negative: {negative:.2}");

    // Per-participant breakdown
    let mut participants: Vec<String> = bags.iter().map(|b| b.participant_id.clone()).collect();
    participants.sort();
    participants.dedup();
    for pid in participants {
        let count = bags.iter().filter(|b| b.participant_id == pid).count();
        let positives = bags
            .iter()
            .filter(|b| b.participant_id == pid && b.is_positive())
            .count();
        println!("  participant {pid}: {count} bags ({positives} positive)");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
