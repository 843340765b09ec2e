//! The multi-participant bag-generation run.
//!
//! Participants are processed sequentially and folded into one pooled
//! train/test pair; the cross-participant rebalance runs only after the
//! fold completes because it needs the global maximum test-day size.

use std::path::PathBuf;

use crate::core::bagging::BagBuilder;
use crate::core::features::FeatureTable;
use crate::core::split::{leave_one_day_out, rebalance_split, TrainTestSplit};
use crate::data::loader;
use crate::report::{label_shares, RunReport};
use crate::store;

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory containing `participant_*` subdirectories
    pub base_dir: PathBuf,
    /// Sliding window width in minutes
    pub bag_interval_minutes: i64,
    /// Target fraction of bags in the test split
    pub pct_test: f64,
    /// Directory the split files are written into
    pub output_dir: PathBuf,
    /// Skip participants that fail instead of aborting the run
    pub skip_failures: bool,
}

/// Locations and sizes of the exported splits.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub train_count: usize,
    pub test_count: usize,
}

/// Errors raised by the pipeline driver.
#[derive(Debug)]
pub enum PipelineError {
    NoParticipants(String),
    Participant { participant: String, message: String },
    Store(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::NoParticipants(e) => write!(f, "no participants: {e}"),
            PipelineError::Participant {
                participant,
                message,
            } => {
                write!(f, "participant {participant}: {message}")
            }
            PipelineError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Pooled splits accumulated across the participant fold.
#[derive(Debug, Default)]
struct Pooled {
    split: TrainTestSplit,
    largest_test_participant: Option<String>,
    largest_test_len: usize,
}

impl Pooled {
    /// Fold one participant's split into the pool, tracking the largest
    /// per-participant test set for the later rebalance.
    fn absorb(&mut self, participant_id: &str, split: TrainTestSplit) {
        if split.test.len() > self.largest_test_len {
            self.largest_test_len = split.test.len();
            self.largest_test_participant = Some(participant_id.to_string());
        }

        self.split.train.extend(split.train);
        self.split.test.extend(split.test);
    }
}

/// Generate and day-split bags for one participant directory.
///
/// Returns an empty split (with a printed warning) when the interval
/// produces no usable windows.
fn process_participant(
    dir: &std::path::Path,
    participant_id: &str,
    builder: &BagBuilder,
    report: &RunReport,
) -> Result<TrainTestSplit, String> {
    let (trace, events) = loader::load_participant(dir).map_err(|e| e.to_string())?;

    let table = FeatureTable::from_trace(&trace);
    let bags = builder
        .generate_bags(&table, &events, participant_id)
        .map_err(|e| e.to_string())?;
    println!(" {} non-empty bags generated", bags.len());

    report.record_bags_generated(bags.len() as u64);
    report.record_positive_bags(bags.iter().filter(|b| b.is_positive()).count() as u64);

    if bags.is_empty() {
        // Degenerate window: the interval never fit inside the trace.
        eprintln!(
            "Warning: participant {participant_id} produced no usable windows \
             (interval {} min may exceed the trace span)",
            builder.interval_minutes()
        );
        return Ok(TrainTestSplit::default());
    }

    let split = leave_one_day_out(bags).map_err(|e| e.to_string())?;

    if let Some(first) = split.test.first() {
        println!("Left-out date: {}", first.end_time);
    }
    println!("number of training bags={}", split.train.len());
    println!("number of test bags={}", split.test.len());

    Ok(split)
}

/// Run the full pipeline and export both splits.
pub fn run(options: &PipelineOptions, report: &RunReport) -> Result<PipelineOutcome, PipelineError> {
    let participant_dirs = loader::discover_participants(&options.base_dir)
        .map_err(|e| PipelineError::NoParticipants(e.to_string()))?;
    if participant_dirs.is_empty() {
        return Err(PipelineError::NoParticipants(format!(
            "no participant_* directories under {:?}",
            options.base_dir
        )));
    }

    let builder = BagBuilder::new(options.bag_interval_minutes);

    let mut pooled = Pooled::default();
    for dir in &participant_dirs {
        let dir_name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let participant_id = loader::participant_id(&dir_name);

        print!("Creating bags for {dir_name}...");
        match process_participant(dir, &participant_id, &builder, report) {
            Ok(split) => {
                report.record_participant();
                pooled.absorb(&participant_id, split);
            }
            Err(message) if options.skip_failures => {
                println!();
                eprintln!("Warning: skipping {dir_name}: {message}");
                report.record_skipped_participant();
            }
            Err(message) => {
                println!();
                return Err(PipelineError::Participant {
                    participant: participant_id,
                    message,
                });
            }
        }
    }

    println!(
        "Total number of training bags={}.",
        pooled.split.train.len()
    );
    println!("Total number of test bags={}.", pooled.split.test.len());

    // Rebalance toward the target test fraction using the participant with
    // the largest held-out day.
    let split = match pooled.largest_test_participant {
        Some(ref participant_id) => {
            println!("Shifting participant {participant_id} to the training set");
            rebalance_split(pooled.split, participant_id, options.pct_test)
        }
        None => {
            eprintln!("Warning: no test bags pooled; skipping rebalance");
            pooled.split
        }
    };

    println!("Total number of training bags={}.", split.train.len());
    println!("Total number of test bags={}.", split.test.len());

    let train_labels: Vec<i8> = split.train.iter().map(|b| b.label).collect();
    let test_labels: Vec<i8> = split.test.iter().map(|b| b.label).collect();
    print_label_stats("Train Data Stats:", &train_labels);
    print_label_stats("Test Data Stats:", &test_labels);

    report.record_split(split.train.len() as u64, split.test.len() as u64);

    let train_path = store::save_bags(
        options
            .output_dir
            .join(store::train_file_name(options.bag_interval_minutes)),
        &split.train,
    )
    .map_err(|e| PipelineError::Store(e.to_string()))?;
    let test_path = store::save_bags(
        options
            .output_dir
            .join(store::test_file_name(options.bag_interval_minutes)),
        &split.test,
    )
    .map_err(|e| PipelineError::Store(e.to_string()))?;

    Ok(PipelineOutcome {
        train_path,
        test_path,
        train_count: split.train.len(),
        test_count: split.test.len(),
    })
}

fn print_label_stats(header: &str, labels: &[i8]) {
    let (positive, negative) = label_shares(labels);
    println!("{header}");
    println!("Number of Data Points: {}", labels.len());
    println!("Positive: {positive:.2} | Negative: {negative:.2}");
}
