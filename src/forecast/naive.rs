//! Naive "tomorrow is today" forecaster.

use crate::error::{Result, SimError};
use crate::feed::SeriesPoint;

use super::{ForecastClock, Forecaster, check_history};

/// Repeats the last season (24 points by default) of the training history.
#[derive(Debug, Clone)]
pub struct NaiveForecaster {
    season: usize,
    fitted: Option<(ForecastClock, Vec<f64>)>,
}

impl Default for NaiveForecaster {
    fn default() -> Self {
        Self::new(24)
    }
}

impl NaiveForecaster {
    /// Creates a forecaster repeating the last `season` points (at least one).
    pub fn new(season: usize) -> Self {
        Self {
            season: season.max(1),
            fitted: None,
        }
    }
}

impl Forecaster for NaiveForecaster {
    fn train(&mut self, history: &[SeriesPoint]) -> Result<()> {
        self.fitted = None;
        let clock = check_history(history)?;
        let start = history.len().saturating_sub(self.season);
        let baseline = history[start..].iter().map(|p| p.value).collect();
        self.fitted = Some((clock, baseline));
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<SeriesPoint>> {
        let Some((clock, baseline)) = &self.fitted else {
            return Err(SimError::NotTrained("predict called before train".into()));
        };
        let values = repeat_to_horizon(baseline, horizon);
        Ok(clock
            .timestamps(horizon)
            .zip(values)
            .map(|(ts, v)| SeriesPoint::new(ts, v))
            .collect())
    }
}

/// Repeats or truncates `baseline` to exactly `horizon` values.
fn repeat_to_horizon(baseline: &[f64], horizon: usize) -> Vec<f64> {
    if horizon == 0 {
        return Vec::new();
    }

    if baseline.is_empty() {
        return vec![0.0; horizon];
    }

    baseline.iter().copied().cycle().take(horizon).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn history(values: &[f64]) -> Vec<SeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid timestamp");
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| SeriesPoint::new(start + Duration::hours(i as i64), v))
            .collect()
    }

    #[test]
    fn forecast_matches_horizon_length() {
        let mut f = NaiveForecaster::new(3);
        f.train(&history(&[1.0, 2.0, 3.0])).expect("train");
        let forecast = f.predict(7).expect("predict");
        assert_eq!(forecast.len(), 7);
    }

    #[test]
    fn forecast_repeats_last_season() {
        let mut f = NaiveForecaster::new(2);
        f.train(&history(&[9.0, 1.0, 2.0])).expect("train");
        let values: Vec<f64> = f.predict(5).expect("predict").iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn short_history_is_used_whole() {
        let mut f = NaiveForecaster::default();
        f.train(&history(&[4.0, 5.0])).expect("train");
        let values: Vec<f64> = f.predict(3).expect("predict").iter().map(|p| p.value).collect();
        assert_eq!(values, vec![4.0, 5.0, 4.0]);
    }

    #[test]
    fn predict_before_train_fails() {
        let f = NaiveForecaster::default();
        assert!(matches!(f.predict(24), Err(SimError::NotTrained(_))));
    }

    #[test]
    fn failed_retrain_discards_the_previous_model() {
        let mut f = NaiveForecaster::default();
        f.train(&history(&[1.0, 2.0])).expect("train");
        assert!(f.train(&history(&[1.0, f64::NAN])).is_err());
        assert!(matches!(f.predict(2), Err(SimError::NotTrained(_))));
    }

    #[test]
    fn zero_horizon_is_empty() {
        assert!(repeat_to_horizon(&[1.0], 0).is_empty());
    }
}
