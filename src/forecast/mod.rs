//! Demand forecasting behind a two-method capability interface.
//!
//! The pipeline only ever calls [`Forecaster::train`] once and then
//! [`Forecaster::predict`] once; it makes no assumption about the model.

pub mod naive;
pub mod seasonal;

pub use naive::NaiveForecaster;
pub use seasonal::SeasonalForecaster;

use chrono::{Duration, NaiveDateTime};

use crate::error::{Result, SimError};
use crate::feed::SeriesPoint;

/// A trainable point forecaster.
pub trait Forecaster {
    /// Fits the model on an ordered history.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotTrained`] if the history is empty, contains
    /// non-finite values, or its timestamps are not strictly increasing.
    fn train(&mut self, history: &[SeriesPoint]) -> Result<()>;

    /// Forecasts the `horizon` steps following the training history.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotTrained`] if [`Forecaster::train`] never succeeded.
    fn predict(&self, horizon: usize) -> Result<Vec<SeriesPoint>>;
}

/// Where a trained model's forecast starts and how far apart its points are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ForecastClock {
    pub last: NaiveDateTime,
    pub step: Duration,
}

impl ForecastClock {
    /// Timestamps of the `horizon` points after the last training point.
    pub fn timestamps(&self, horizon: usize) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (1..=horizon).map(move |k| self.last + self.step * k as i32)
    }
}

/// Checks a training history and derives the forecast clock from it.
///
/// A single-point history is assumed to be hourly.
pub(crate) fn check_history(history: &[SeriesPoint]) -> Result<ForecastClock> {
    let Some(last) = history.last() else {
        return Err(SimError::NotTrained("training history is empty".into()));
    };

    if let Some(bad) = history.iter().find(|p| !p.value.is_finite()) {
        return Err(SimError::NotTrained(format!(
            "non-finite value at {}",
            bad.timestamp
        )));
    }

    if let Some(pair) = history.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
        return Err(SimError::NotTrained(format!(
            "timestamps not strictly increasing at {}",
            pair[1].timestamp
        )));
    }

    let step = match history {
        [.., a, b] => b.timestamp - a.timestamp,
        _ => Duration::hours(1),
    };

    Ok(ForecastClock {
        last: last.timestamp,
        step,
    })
}
