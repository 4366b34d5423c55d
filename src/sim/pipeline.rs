//! End-to-end simulation pipeline: feed, forecast, dispatch, merge.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Result, SimError};
use crate::feed::{DataFeed, SeriesKind, SeriesPoint};
use crate::forecast::Forecaster;
use crate::sim::optimizer::DispatchOptimizer;
use crate::sim::power_balance::net_load_mw;
use crate::sim::types::{SimulationResult, SimulationRow, TimeSeriesSample};

/// Simulation pipeline owning its feed, forecaster and optimizer.
///
/// Generic over `D: DataFeed` and `F: Forecaster` for static dispatch.
/// Each [`run`](Self::run) retrains the forecaster and builds every output
/// from scratch, so runs never share state.
pub struct SimulationPipeline<D: DataFeed, F: Forecaster> {
    feed: D,
    forecaster: F,
    optimizer: DispatchOptimizer,
    start_date: NaiveDate,
}

impl<D: DataFeed, F: Forecaster> SimulationPipeline<D, F> {
    /// Creates a new pipeline.
    ///
    /// # Arguments
    ///
    /// * `feed` - Source of demand, solar, wind and price series
    /// * `forecaster` - Demand forecaster, trained on each run
    /// * `optimizer` - Battery dispatch optimizer
    /// * `start_date` - First day of the generated history
    pub fn new(
        feed: D,
        forecaster: F,
        optimizer: DispatchOptimizer,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            feed,
            forecaster,
            optimizer,
            start_date,
        }
    }

    /// Returns a reference to the dispatch optimizer.
    pub fn optimizer(&self) -> &DispatchOptimizer {
        &self.optimizer
    }

    /// Returns a reference to the forecaster (trained after a successful run).
    pub fn forecaster(&self) -> &F {
        &self.forecaster
    }

    /// Simulates `days` days after a history of the same length.
    ///
    /// # Returns
    ///
    /// A [`SimulationResult`] with exactly `days * 24` rows.
    ///
    /// # Errors
    ///
    /// - [`SimError::Configuration`] if `days` is zero
    /// - [`SimError::Alignment`] if the feed's series or the forecast do not line up
    /// - [`SimError::NotTrained`] if the forecaster rejects the history
    pub fn run(&mut self, days: usize) -> Result<SimulationResult> {
        if days == 0 {
            return Err(SimError::configuration(
                "simulation.days",
                "must be at least 1",
            ));
        }

        // 1. Generate history + future
        info!(days = days * 2, start = %self.start_date, "generating series");
        let [demand, solar, wind, price] = SeriesKind::ALL
            .map(|kind| self.feed.generate(kind, days * 2, self.start_date));
        let samples = TimeSeriesSample::merge(&demand, &solar, &wind, &price)?;

        let split = days * 24;
        if samples.len() != split * 2 {
            return Err(SimError::Alignment(format!(
                "feed produced {} samples, expected {}",
                samples.len(),
                split * 2
            )));
        }
        let (history, future) = samples.split_at(split);

        // 2. Train on history demand
        info!(points = history.len(), "training forecaster");
        let history_demand: Vec<SeriesPoint> = history
            .iter()
            .map(|s| SeriesPoint::new(s.timestamp, s.demand_mw))
            .collect();
        self.forecaster.train(&history_demand)?;

        // 3. Forecast the future window
        info!(horizon = future.len(), "forecasting demand");
        let forecast = self.forecaster.predict(future.len())?;
        if forecast.len() != future.len() {
            return Err(SimError::Alignment(format!(
                "forecast has {} points, future window has {}",
                forecast.len(),
                future.len()
            )));
        }

        // 4. Net load from actual, not forecast, demand
        let net_load: Vec<f64> = future
            .iter()
            .map(|s| net_load_mw(s.demand_mw, s.solar_mw, s.wind_mw))
            .collect();
        let prices: Vec<f64> = future.iter().map(|s| s.price).collect();

        // 5. Dispatch
        info!(
            steps = net_load.len(),
            policy = ?self.optimizer.policy(),
            "optimizing battery dispatch"
        );
        let plan = self.optimizer.optimize(&net_load, &prices)?;

        // 6. Merge
        let rows: Vec<SimulationRow> = future
            .iter()
            .zip(&plan.steps)
            .zip(&forecast)
            .map(|((sample, step), fc)| SimulationRow {
                timestamp: sample.timestamp,
                actual_demand_mw: sample.demand_mw,
                forecast_demand_mw: fc.value,
                solar_mw: sample.solar_mw,
                wind_mw: sample.wind_mw,
                price: sample.price,
                net_load_mw: step.net_load_mw,
                battery_flow_mw: step.flow_mw,
                soc_mwh: step.soc_mwh,
                grid_import_mw: step.grid_import_mw,
                cost: step.grid_import_mw * sample.price,
            })
            .collect();
        debug!(rows = rows.len(), "merged simulation rows");

        Ok(SimulationResult {
            rows,
            battery: *self.optimizer.battery(),
        })
    }
}
