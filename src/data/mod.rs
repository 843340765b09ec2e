//! Participant data ingestion.
//!
//! This module contains:
//! - Row and series types for sensor and event tables
//! - CSV loading and participant directory discovery

pub mod loader;
pub mod types;

// Re-export commonly used items
pub use loader::{
    discover_participants, load_event_table, load_participant, load_sensor_table, participant_id,
    LoadError, EVENTS_FILE, SENSOR_FILE,
};
pub use types::{EventSeries, SensorRecord, SensorTrace};
