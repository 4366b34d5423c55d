//! Common types and traits for the synthetic data feed.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{Rng, rngs::StdRng};

/// One timestamped value of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// The four series a feed can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    /// Electricity demand (MW).
    Demand,
    /// Solar generation (MW).
    Solar,
    /// Wind generation (MW).
    Wind,
    /// Energy price (currency per unit energy).
    Price,
}

impl SeriesKind {
    /// All kinds, in the order the pipeline requests them.
    pub const ALL: [Self; 4] = [Self::Demand, Self::Solar, Self::Wind, Self::Price];

    /// Offset added to the master seed so every kind draws from its own stream.
    pub(crate) fn seed_offset(self) -> u64 {
        match self {
            Self::Demand => 0,
            Self::Solar => 1,
            Self::Wind => 2,
            Self::Price => 3,
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Demand => "demand",
            Self::Solar => "solar",
            Self::Wind => "wind",
            Self::Price => "price",
        };
        f.write_str(name)
    }
}

/// Source of ordered, hourly, timestamped series.
///
/// A call returns the complete series for `days * 24` hours starting at
/// midnight of `start_date`.
pub trait DataFeed {
    /// Generates one series of `days * 24` hourly points.
    fn generate(&mut self, kind: SeriesKind, days: usize, start_date: NaiveDate)
    -> Vec<SeriesPoint>;
}

/// Hourly timestamps for `days` days starting at midnight of `start_date`.
pub fn hourly_timestamps(start_date: NaiveDate, days: usize) -> Vec<NaiveDateTime> {
    let start = start_date.and_time(chrono::NaiveTime::MIN);
    (0..days * 24)
        .map(|h| start + Duration::hours(h as i64))
        .collect()
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
