//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use microgrid_twin::feed::SyntheticFeed;
use microgrid_twin::forecast::{NaiveForecaster, SeasonalForecaster};
use microgrid_twin::sim::{BatteryConfig, DispatchOptimizer, SimulationPipeline};

/// First day of generated history used throughout the tests.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date")
}

/// Default battery (100 MWh, 50 MW, 90% efficiency, half charged).
pub fn default_battery() -> BatteryConfig {
    BatteryConfig::new(100.0, 50.0, 0.9).expect("valid battery")
}

/// Pipeline with the seasonal forecaster and horizon thresholds.
pub fn seasonal_pipeline(seed: u64) -> SimulationPipeline<SyntheticFeed, SeasonalForecaster> {
    SimulationPipeline::new(
        SyntheticFeed::with_seed(seed),
        SeasonalForecaster::new(),
        DispatchOptimizer::new(default_battery()),
        start_date(),
    )
}

/// Pipeline with the naive forecaster and horizon thresholds.
pub fn naive_pipeline(seed: u64) -> SimulationPipeline<SyntheticFeed, NaiveForecaster> {
    SimulationPipeline::new(
        SyntheticFeed::with_seed(seed),
        NaiveForecaster::default(),
        DispatchOptimizer::new(default_battery()),
        start_date(),
    )
}

/// Absolute-tolerance float comparison.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
