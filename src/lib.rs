//! Smokesense - sensor-to-bag pipeline for smoking episode detection research.
//!
//! This library turns per-participant physiological sensor logs and
//! self-reported smoking episodes into labeled bags of feature-vector
//! instances (multi-instance learning), splits them leave-one-day-out, and
//! runs hyperparameter search over opaque bag classifiers.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         Smokesense                            │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌───────────────────┐    │
//! │  │  Loader   │──▶│  BagBuilder  │──▶│ Leave-one-day-out │    │
//! │  │  (CSV)    │   │ (1-min slide)│   │   + rebalance     │    │
//! │  └───────────┘   └──────────────┘   └───────────────────┘    │
//! │        │                                     │               │
//! │        ▼                                     ▼               │
//! │  ┌───────────┐                       ┌──────────────┐        │
//! │  │ RunReport │                       │ JSON splits  │──▶ fit │
//! │  └───────────┘                       └──────────────┘        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use smokesense::core::{leave_one_day_out, BagBuilder, FeatureTable};
//! use smokesense::data::load_participant;
//!
//! let (trace, events) = load_participant("data/participant_3017").unwrap();
//! let table = FeatureTable::from_trace(&trace);
//!
//! let builder = BagBuilder::new(5);
//! let bags = builder.generate_bags(&table, &events, "3017").unwrap();
//! let split = leave_one_day_out(bags).unwrap();
//! println!("{} train / {} test", split.train.len(), split.test.len());
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod store;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use core::{
    label_window, leave_one_day_out, rebalance_split, Bag, BagBuilder, BagError, FeatureTable,
    SplitError, TrainTestSplit, EVENT_LABEL, NO_EVENT_LABEL,
};
pub use data::{load_participant, EventSeries, LoadError, SensorRecord, SensorTrace};
pub use model::{BagClassifier, Experiment, ExperimentOutcome, HyperParams, ModelError};
pub use pipeline::{PipelineError, PipelineOptions, PipelineOutcome};
pub use report::{RunReport, RunStats};
pub use store::{load_bags, save_bags, StoreError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
