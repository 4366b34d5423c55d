//! Additive trend + daily + weekly seasonality regression.

use chrono::{Datelike, NaiveDateTime, Timelike};
use linfa::{DatasetBase, prelude::*};
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

use crate::error::{Result, SimError};
use crate::feed::SeriesPoint;

use super::{ForecastClock, Forecaster, check_history};

/// Distinct calendar days needed before the trend is fitted.
///
/// With seven days or fewer every day has its own weekday, so a day-count
/// trend is indistinguishable from the weekday effects.
const MIN_TREND_DAYS: usize = 8;

/// Days since `origin`, fractional.
fn days_since(origin: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    (ts - origin).num_seconds() as f64 / 86_400.0
}

fn hour_of(ts: NaiveDateTime) -> usize {
    ts.hour() as usize
}

fn weekday_of(ts: NaiveDateTime) -> usize {
    ts.weekday().num_days_from_monday() as usize
}

fn distinct_days(history: &[SeriesPoint]) -> usize {
    1 + history
        .windows(2)
        .filter(|w| w[0].timestamp.date() != w[1].timestamp.date())
        .count()
}

/// Assigns one dummy column per observed bucket, except the first observed
/// one which is the reference level folded into the intercept.
fn bucket_columns<const N: usize>(seen: &[bool; N], next_col: &mut usize) -> [Option<usize>; N] {
    let mut cols = [None; N];
    let mut reference_taken = false;
    for (bucket, &was_seen) in seen.iter().enumerate() {
        if !was_seen {
            continue;
        }
        if reference_taken {
            cols[bucket] = Some(*next_col);
            *next_col += 1;
        } else {
            reference_taken = true;
        }
    }
    cols
}

/// Reads bucket effects out of the fitted parameters.
///
/// Buckets never seen in training get the mean of the observed effects.
fn bucket_effects<const N: usize>(
    seen: &[bool; N],
    cols: &[Option<usize>; N],
    params: &Array1<f64>,
) -> [f64; N] {
    let mut effects = [0.0; N];
    for (bucket, col) in cols.iter().enumerate() {
        if let Some(c) = col {
            effects[bucket] = params[*c];
        }
    }
    let observed: Vec<f64> = (0..N).filter(|&b| seen[b]).map(|b| effects[b]).collect();
    let mean = observed.iter().sum::<f64>() / observed.len().max(1) as f64;
    for (bucket, effect) in effects.iter_mut().enumerate() {
        if !seen[bucket] {
            *effect = mean;
        }
    }
    effects
}

/// Fitted coefficients of the additive model.
#[derive(Debug, Clone)]
struct SeasonalModel {
    origin: NaiveDateTime,
    intercept: f64,
    slope_per_day: f64,
    hour_effects: [f64; 24],
    weekday_effects: [f64; 7],
}

impl SeasonalModel {
    fn fit(history: &[SeriesPoint]) -> Result<Self> {
        let origin = history[0].timestamp;

        let mut hours_seen = [false; 24];
        let mut weekdays_seen = [false; 7];
        for p in history {
            hours_seen[hour_of(p.timestamp)] = true;
            weekdays_seen[weekday_of(p.timestamp)] = true;
        }

        // Column layout: [trend?, hour dummies, weekday dummies]
        let with_trend = distinct_days(history) >= MIN_TREND_DAYS;
        let mut width = usize::from(with_trend);
        let hour_cols = bucket_columns(&hours_seen, &mut width);
        let weekday_cols = bucket_columns(&weekdays_seen, &mut width);

        let targets: Array1<f64> = history.iter().map(|p| p.value).collect();
        if width == 0 {
            // single hour of a single day: nothing to regress on
            return Ok(Self {
                origin,
                intercept: targets.mean().unwrap_or_default(),
                slope_per_day: 0.0,
                hour_effects: [0.0; 24],
                weekday_effects: [0.0; 7],
            });
        }

        let mut records = Array2::<f64>::zeros((history.len(), width));
        for (i, p) in history.iter().enumerate() {
            if with_trend {
                records[[i, 0]] = days_since(origin, p.timestamp);
            }
            if let Some(c) = hour_cols[hour_of(p.timestamp)] {
                records[[i, c]] = 1.0;
            }
            if let Some(c) = weekday_cols[weekday_of(p.timestamp)] {
                records[[i, c]] = 1.0;
            }
        }

        let dataset = DatasetBase::new(records, targets);
        let fitted = LinearRegression::default()
            .fit(&dataset)
            .map_err(|e| SimError::NotTrained(format!("regression fit failed: {e}")))?;
        let params = fitted.params();

        let model = Self {
            origin,
            intercept: fitted.intercept(),
            slope_per_day: if with_trend { params[0] } else { 0.0 },
            hour_effects: bucket_effects(&hours_seen, &hour_cols, params),
            weekday_effects: bucket_effects(&weekdays_seen, &weekday_cols, params),
        };
        let finite = model.intercept.is_finite()
            && model.slope_per_day.is_finite()
            && model.hour_effects.iter().all(|v| v.is_finite())
            && model.weekday_effects.iter().all(|v| v.is_finite());
        if !finite {
            return Err(SimError::NotTrained(
                "regression produced non-finite coefficients".into(),
            ));
        }
        Ok(model)
    }

    fn value_at(&self, ts: NaiveDateTime) -> f64 {
        self.intercept
            + self.slope_per_day * days_since(self.origin, ts)
            + self.hour_effects[hour_of(ts)]
            + self.weekday_effects[weekday_of(ts)]
    }
}

/// Demand forecaster in the style of an additive time-series regression:
/// linear trend plus hour-of-day and day-of-week effects, fitted jointly by
/// ordinary least squares.
///
/// The trend is only fitted once the history spans at least
/// [`MIN_TREND_DAYS`] calendar days. Hours or weekdays never seen in
/// training take the mean effect of the observed ones.
#[derive(Debug, Clone, Default)]
pub struct SeasonalForecaster {
    fitted: Option<(ForecastClock, SeasonalModel)>,
}

impl SeasonalForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// In-sample fitted value at `ts`, if trained.
    pub fn fitted_value(&self, ts: NaiveDateTime) -> Option<f64> {
        self.fitted.as_ref().map(|(_, m)| m.value_at(ts))
    }
}

impl Forecaster for SeasonalForecaster {
    fn train(&mut self, history: &[SeriesPoint]) -> Result<()> {
        self.fitted = None;
        let clock = check_history(history)?;
        let model = SeasonalModel::fit(history)?;
        self.fitted = Some((clock, model));
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<SeriesPoint>> {
        let Some((clock, model)) = &self.fitted else {
            return Err(SimError::NotTrained("predict called before train".into()));
        };
        Ok(clock
            .timestamps(horizon)
            .map(|ts| SeriesPoint::new(ts, model.value_at(ts)))
            .collect())
    }
}
