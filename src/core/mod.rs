//! Core bag-generation logic.
//!
//! This module contains:
//! - The labeled `Bag` unit and its pooling helpers
//! - Feature-matrix assembly with the derived time-of-day column
//! - Sliding-window bag generation and window labeling
//! - Leave-one-day-out partitioning and cross-participant rebalancing

pub mod bag;
pub mod bagging;
pub mod features;
pub mod split;

// Re-export commonly used types
pub use bag::{Bag, EVENT_LABEL, NO_EVENT_LABEL};
pub use bagging::{label_window, BagBuilder, BagError};
pub use features::{derive_time_of_day, feature_names, FeatureTable, SENSOR_FEATURES, TIME_OF_DAY};
pub use split::{leave_one_day_out, rebalance_split, SplitError, TrainTestSplit};
