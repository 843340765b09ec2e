//! Demonstration of the Smokesense bag-generation core.
//!
//! This example shows how to:
//! 1. Build a sensor trace and event series in memory
//! 2. Assemble the feature table with the derived time-of-day column
//! 3. Generate labeled bags with a sliding window
//! 4. Split them leave-one-day-out and rebalance
//!
//! Run with: cargo run --example bag_demo

use chrono::{Duration, NaiveDate};
use smokesense::core::{leave_one_day_out, rebalance_split, BagBuilder, FeatureTable};
use smokesense::data::{EventSeries, SensorRecord, SensorTrace};

fn main() {
    println!("Smokesense - Bag Generation Demo");
    println!("================================");
    println!();

    // Four continuous hours of synthetic minute-to-minute readings,
    // crossing midnight so the trace touches two calendar days.
    let base = NaiveDate::from_ymd_opt(2019, 3, 7)
        .unwrap()
        .and_hms_opt(22, 0, 0)
        .unwrap();
    let mut records = Vec::new();
    for minute in 0..240 {
        let t = base + Duration::minutes(minute);
        let wave = (minute as f64 / 15.0).sin();
        records.push(SensorRecord {
            datetime: t,
            activity_zscore: Some(wave),
            cadence_zscore: Some(-wave),
            minute_ventilation_adjusted_zscore: Some(0.3 * wave),
            tidal_volume_adjusted_zscore: Some(0.1),
            heart_rate_zscore: Some(0.5 * wave),
            rr_interval_zscore: Some(-0.5 * wave),
            hrv_zscore: Some(0.2),
        });
    }
    let trace = SensorTrace::new(records);

    // One reported episode per calendar day.
    let events = EventSeries::new(vec![
        NaiveDate::from_ymd_opt(2019, 3, 7)
            .unwrap()
            .and_hms_opt(22, 30, 0)
            .unwrap(),
        NaiveDate::from_ymd_opt(2019, 3, 8)
            .unwrap()
            .and_hms_opt(1, 15, 0)
            .unwrap(),
    ]);

    let table = FeatureTable::from_trace(&trace);
    println!(
        "Trace: {} readings from {} to {}",
        table.len(),
        trace.first_time().unwrap(),
        trace.last_time().unwrap()
    );

    let builder = BagBuilder::new(5);
    let bags = builder
        .generate_bags(&table, &events, "demo")
        .expect("bag generation failed");

    let positives = bags.iter().filter(|b| b.is_positive()).count();
    println!(
        "Generated {} bags ({} positive, {} negative)",
        bags.len(),
        positives,
        bags.len() - positives
    );

    let split = leave_one_day_out(bags).expect("no day with a positive label");
    println!(
        "Leave-one-day-out: {} train / {} test (test day {})",
        split.train.len(),
        split.test.len(),
        split.test[0].end_day()
    );

    let split = rebalance_split(split, "demo", 0.15);
    println!(
        "After rebalance: {} train / {} test ({:.1}% test)",
        split.train.len(),
        split.test.len(),
        100.0 * split.test_fraction()
    );
}
