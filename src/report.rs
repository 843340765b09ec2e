//! Run accounting for bag-generation passes.
//!
//! Tracks counts per run so the pipeline can print a closing summary and
//! persist it alongside the exported splits. Counts are diagnostics, not
//! part of the output contract.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Counters for one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// Unique identifier for this run
    run_id: Uuid,
    /// Participants whose bags were generated successfully
    participants_processed: AtomicU64,
    /// Participants skipped after a failure (skip-failures mode)
    participants_skipped: AtomicU64,
    /// Bags surviving the missing-value filter across all participants
    bags_generated: AtomicU64,
    /// Bags exported to the training split
    train_bags: AtomicU64,
    /// Bags exported to the test split
    test_bags: AtomicU64,
    /// Positively labeled bags across both splits
    positive_bags: AtomicU64,
    /// Run start time
    started_at: DateTime<Utc>,
    /// Path for persisting the report
    persist_path: Option<PathBuf>,
}

impl RunReport {
    /// Create a new report with a fresh run ID.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            participants_processed: AtomicU64::new(0),
            participants_skipped: AtomicU64::new(0),
            bags_generated: AtomicU64::new(0),
            train_bags: AtomicU64::new(0),
            test_bags: AtomicU64::new(0),
            positive_bags: AtomicU64::new(0),
            started_at: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a report that persists to the given path on `save`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut report = Self::new();
        report.persist_path = Some(path);
        report
    }

    /// Get the run ID.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Record one successfully processed participant.
    pub fn record_participant(&self) {
        self.participants_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one participant skipped after a failure.
    pub fn record_skipped_participant(&self) {
        self.participants_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record bags surviving the missing-value filter.
    pub fn record_bags_generated(&self, count: u64) {
        self.bags_generated.fetch_add(count, Ordering::Relaxed);
    }

    /// Record the final split sizes.
    pub fn record_split(&self, train: u64, test: u64) {
        self.train_bags.store(train, Ordering::Relaxed);
        self.test_bags.store(test, Ordering::Relaxed);
    }

    /// Record positively labeled bags.
    pub fn record_positive_bags(&self, count: u64) {
        self.positive_bags.fetch_add(count, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> RunStats {
        RunStats {
            run_id: self.run_id,
            participants_processed: self.participants_processed.load(Ordering::Relaxed),
            participants_skipped: self.participants_skipped.load(Ordering::Relaxed),
            bags_generated: self.bags_generated.load(Ordering::Relaxed),
            train_bags: self.train_bags.load(Ordering::Relaxed),
            test_bags: self.test_bags.load(Ordering::Relaxed),
            positive_bags: self.positive_bags.load(Ordering::Relaxed),
            started_at: self.started_at,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Run {}:\n\
             - Participants processed: {}\n\
             - Participants skipped: {}\n\
             - Bags generated: {}\n\
             - Training bags: {}\n\
             - Test bags: {}\n\
             - Positive bags: {}",
            stats.run_id,
            stats.participants_processed,
            stats.participants_skipped,
            stats.bags_generated,
            stats.train_bags,
            stats.test_bags,
            stats.positive_bags,
        )
    }

    /// Save the report to disk as JSON.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let json =
                serde_json::to_string_pretty(&self.stats()).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub run_id: Uuid,
    pub participants_processed: u64,
    pub participants_skipped: u64,
    pub bags_generated: u64,
    pub train_bags: u64,
    pub test_bags: u64,
    pub positive_bags: u64,
    pub started_at: DateTime<Utc>,
}

/// Positive/negative label shares for a bag collection's labels.
///
/// Returns `(positive_fraction, negative_fraction)`; an empty slice yields
/// zeros.
pub fn label_shares(labels: &[i8]) -> (f64, f64) {
    if labels.is_empty() {
        return (0.0, 0.0);
    }

    let positives = labels.iter().filter(|&&l| l == 1).count();
    let total = labels.len() as f64;
    (positives as f64 / total, (labels.len() - positives) as f64 / total)
}
