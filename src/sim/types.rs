//! Core simulation types: hourly samples, result rows, and the result table.

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{Result, SimError};
use crate::feed::SeriesPoint;
use crate::sim::battery::BatteryConfig;

/// Demand, renewables and price observed at one hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesSample {
    pub timestamp: NaiveDateTime,
    /// Electricity demand (MW).
    pub demand_mw: f64,
    /// Solar generation (MW).
    pub solar_mw: f64,
    /// Wind generation (MW).
    pub wind_mw: f64,
    /// Energy price.
    pub price: f64,
}

impl TimeSeriesSample {
    /// Zips four series into samples, checking that they line up.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Alignment`] if the series differ in length or if
    /// any position carries different timestamps.
    pub fn merge(
        demand: &[SeriesPoint],
        solar: &[SeriesPoint],
        wind: &[SeriesPoint],
        price: &[SeriesPoint],
    ) -> Result<Vec<Self>> {
        let n = demand.len();
        for (name, series) in [("solar", solar), ("wind", wind), ("price", price)] {
            if series.len() != n {
                return Err(SimError::Alignment(format!(
                    "demand has {n} points, {name} has {}",
                    series.len()
                )));
            }
        }

        demand
            .iter()
            .zip(solar)
            .zip(wind)
            .zip(price)
            .enumerate()
            .map(|(i, (((d, s), w), p))| {
                let ts = d.timestamp;
                if s.timestamp != ts || w.timestamp != ts || p.timestamp != ts {
                    return Err(SimError::Alignment(format!(
                        "timestamps disagree at index {i} (demand at {ts})"
                    )));
                }
                Ok(Self {
                    timestamp: ts,
                    demand_mw: d.value,
                    solar_mw: s.value,
                    wind_mw: w.value,
                    price: p.value,
                })
            })
            .collect()
    }
}

/// Complete record of one simulated hour.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRow {
    pub timestamp: NaiveDateTime,
    /// Observed demand (MW).
    pub actual_demand_mw: f64,
    /// Forecast demand for the same hour (MW); diagnostic only.
    pub forecast_demand_mw: f64,
    pub solar_mw: f64,
    pub wind_mw: f64,
    pub price: f64,
    /// `actual_demand - (solar + wind)` (MW).
    pub net_load_mw: f64,
    /// Battery flow (MW; positive=charge, negative=discharge).
    pub battery_flow_mw: f64,
    /// Stored energy after this hour (MWh).
    pub soc_mwh: f64,
    /// `net_load + battery_flow` (MW).
    pub grid_import_mw: f64,
    /// `grid_import * price`.
    pub cost: f64,
}

impl fmt::Display for SimulationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | demand={:>7.2} (fc {:>7.2}) solar={:>6.2} wind={:>6.2} | \
             net={:>7.2} bat={:>6.2} SoC={:>6.2} MWh | grid={:>7.2} MW  \
             price={:.3} cost={:>7.2}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.actual_demand_mw,
            self.forecast_demand_mw,
            self.solar_mw,
            self.wind_mw,
            self.net_load_mw,
            self.battery_flow_mw,
            self.soc_mwh,
            self.grid_import_mw,
            self.price,
            self.cost,
        )
    }
}

/// The table a pipeline run produces, together with the battery it was run for.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub rows: Vec<SimulationRow>,
    pub battery: BatteryConfig,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the per-hour cost column.
    pub fn total_cost(&self) -> f64 {
        self.rows.iter().map(|r| r.cost).sum()
    }
}
