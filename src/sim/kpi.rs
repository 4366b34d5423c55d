//! Post-hoc KPI computation from simulation results.

use std::fmt;

use super::types::SimulationRow;

/// Aggregate key performance indicators derived from a complete simulation run.
///
/// Computed post-hoc from the result rows so that reported metrics are always
/// consistent with the table. Steps are one hour long, so MW and MWh coincide
/// per step.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiReport {
    /// Sum of the cost column.
    pub total_cost: f64,
    /// Cost of buying the net load with no battery (`Σ net_load * price`).
    pub baseline_cost: f64,
    /// `baseline_cost - total_cost`.
    pub savings: f64,
    /// Highest grid import (MW).
    pub peak_grid_import_mw: f64,
    /// Highest net load (MW).
    pub peak_net_load_mw: f64,
    /// `peak_net_load - peak_grid_import` (MW).
    pub peak_reduction_mw: f64,
    /// Renewable generation as a share of demand (%).
    pub renewable_share_pct: f64,
    /// Total battery energy throughput (MWh, sum of |flow| * 1 h).
    pub battery_throughput_mwh: f64,
    /// Battery equivalent full cycles (throughput / 2*capacity).
    pub equivalent_full_cycles: f64,
    /// Mean absolute demand forecast error (MW).
    pub forecast_mae_mw: f64,
    /// Root-mean-square demand forecast error (MW).
    pub forecast_rmse_mw: f64,
    /// Mean absolute percentage error over hours with non-zero demand (%).
    pub forecast_mape_pct: f64,
}

impl KpiReport {
    /// Computes all KPIs from the complete row vector.
    ///
    /// # Arguments
    ///
    /// * `rows` - Complete simulation rows
    /// * `battery_capacity_mwh` - Battery capacity for cycle calculation
    ///
    /// # Returns
    ///
    /// A `KpiReport` with all fields populated; all zeros for empty input.
    pub fn from_rows(rows: &[SimulationRow], battery_capacity_mwh: f64) -> Self {
        if rows.is_empty() {
            return Self {
                total_cost: 0.0,
                baseline_cost: 0.0,
                savings: 0.0,
                peak_grid_import_mw: 0.0,
                peak_net_load_mw: 0.0,
                peak_reduction_mw: 0.0,
                renewable_share_pct: 0.0,
                battery_throughput_mwh: 0.0,
                equivalent_full_cycles: 0.0,
                forecast_mae_mw: 0.0,
                forecast_rmse_mw: 0.0,
                forecast_mape_pct: 0.0,
            };
        }

        let n = rows.len() as f64;
        let mut total_cost = 0.0;
        let mut baseline_cost = 0.0;
        let mut peak_import = f64::NEG_INFINITY;
        let mut peak_net = f64::NEG_INFINITY;
        let mut demand_sum = 0.0;
        let mut renewable_sum = 0.0;
        let mut throughput = 0.0;
        let mut abs_err_sum = 0.0;
        let mut sq_err_sum = 0.0;
        let mut pct_err_sum = 0.0;
        let mut pct_count = 0_usize;

        for r in rows {
            total_cost += r.cost;
            baseline_cost += r.net_load_mw * r.price;

            peak_import = peak_import.max(r.grid_import_mw);
            peak_net = peak_net.max(r.net_load_mw);

            demand_sum += r.actual_demand_mw;
            renewable_sum += r.solar_mw + r.wind_mw;

            throughput += r.battery_flow_mw.abs();

            let err = r.forecast_demand_mw - r.actual_demand_mw;
            abs_err_sum += err.abs();
            sq_err_sum += err * err;
            if r.actual_demand_mw != 0.0 {
                pct_err_sum += (err / r.actual_demand_mw).abs();
                pct_count += 1;
            }
        }

        let renewable_share_pct = if demand_sum > 0.0 {
            100.0 * renewable_sum / demand_sum
        } else {
            0.0
        };

        let cycles = if battery_capacity_mwh > 0.0 {
            throughput / (2.0 * battery_capacity_mwh)
        } else {
            0.0
        };

        let forecast_mape_pct = if pct_count > 0 {
            100.0 * pct_err_sum / pct_count as f64
        } else {
            0.0
        };

        Self {
            total_cost,
            baseline_cost,
            savings: baseline_cost - total_cost,
            peak_grid_import_mw: peak_import,
            peak_net_load_mw: peak_net,
            peak_reduction_mw: peak_net - peak_import,
            renewable_share_pct,
            battery_throughput_mwh: throughput,
            equivalent_full_cycles: cycles,
            forecast_mae_mw: abs_err_sum / n,
            forecast_rmse_mw: (sq_err_sum / n).sqrt(),
            forecast_mape_pct,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Total cost:            {:.2}", self.total_cost)?;
        writeln!(f, "Baseline cost:         {:.2}", self.baseline_cost)?;
        writeln!(f, "Savings:               {:.2}", self.savings)?;
        writeln!(f, "Peak grid import:      {:.2} MW", self.peak_grid_import_mw)?;
        writeln!(f, "Peak net load:         {:.2} MW", self.peak_net_load_mw)?;
        writeln!(f, "Peak reduction:        {:.2} MW", self.peak_reduction_mw)?;
        writeln!(f, "Renewable share:       {:.1}%", self.renewable_share_pct)?;
        writeln!(
            f,
            "Battery throughput:    {:.2} MWh ({:.2} equiv. cycles)",
            self.battery_throughput_mwh, self.equivalent_full_cycles
        )?;
        write!(
            f,
            "Forecast error:        MAE {:.2} MW, RMSE {:.2} MW, MAPE {:.2}%",
            self.forecast_mae_mw, self.forecast_rmse_mw, self.forecast_mape_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_row(net_load_mw: f64, flow_mw: f64, price: f64) -> SimulationRow {
        let grid = net_load_mw + flow_mw;
        SimulationRow {
            timestamp: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            actual_demand_mw: net_load_mw + 100.0,
            forecast_demand_mw: net_load_mw + 100.0,
            solar_mw: 60.0,
            wind_mw: 40.0,
            price,
            net_load_mw,
            battery_flow_mw: flow_mw,
            soc_mwh: 50.0,
            grid_import_mw: grid,
            cost: grid * price,
        }
    }

    #[test]
    fn cost_and_savings() {
        // baseline: 10*0.1 + 20*0.2 = 5.0; actual: 15*0.1 + 10*0.2 = 3.5
        let rows = vec![make_row(10.0, 5.0, 0.1), make_row(20.0, -10.0, 0.2)];
        let kpi = KpiReport::from_rows(&rows, 100.0);
        assert!((kpi.baseline_cost - 5.0).abs() < 1e-9);
        assert!((kpi.total_cost - 3.5).abs() < 1e-9);
        assert!((kpi.savings - 1.5).abs() < 1e-9);
    }

    #[test]
    fn peaks_and_reduction() {
        let rows = vec![make_row(10.0, 5.0, 0.1), make_row(40.0, -25.0, 0.1)];
        let kpi = KpiReport::from_rows(&rows, 100.0);
        assert_eq!(kpi.peak_net_load_mw, 40.0);
        assert_eq!(kpi.peak_grid_import_mw, 15.0);
        assert_eq!(kpi.peak_reduction_mw, 25.0);
    }

    #[test]
    fn battery_throughput_and_cycles() {
        // flows: [20, -30, 10, -40] → throughput 100 MWh, 0.5 cycles on 100 MWh
        let rows: Vec<SimulationRow> = [20.0, -30.0, 10.0, -40.0]
            .iter()
            .map(|&b| make_row(50.0, b, 0.1))
            .collect();
        let kpi = KpiReport::from_rows(&rows, 100.0);
        assert!((kpi.battery_throughput_mwh - 100.0).abs() < 1e-9);
        assert!((kpi.equivalent_full_cycles - 0.5).abs() < 1e-9);
    }

    #[test]
    fn renewable_share() {
        // demand 200, renewables 100 → 50%
        let kpi = KpiReport::from_rows(&[make_row(100.0, 0.0, 0.1)], 100.0);
        assert!((kpi.renewable_share_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn forecast_errors() {
        let mut a = make_row(100.0, 0.0, 0.1);
        let mut b = make_row(100.0, 0.0, 0.1);
        a.forecast_demand_mw = a.actual_demand_mw + 10.0;
        b.forecast_demand_mw = b.actual_demand_mw - 30.0;
        let kpi = KpiReport::from_rows(&[a, b], 100.0);
        assert!((kpi.forecast_mae_mw - 20.0).abs() < 1e-9);
        assert!((kpi.forecast_rmse_mw - 500.0_f64.sqrt()).abs() < 1e-9);
        // |10/200| and |30/200| → 10%
        assert!((kpi.forecast_mape_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_rows() {
        let kpi = KpiReport::from_rows(&[], 100.0);
        assert_eq!(kpi.total_cost, 0.0);
        assert_eq!(kpi.peak_grid_import_mw, 0.0);
        assert_eq!(kpi.forecast_mape_pct, 0.0);
    }

    #[test]
    fn display_lists_costs() {
        let kpi = KpiReport::from_rows(&[make_row(10.0, 0.0, 0.1)], 100.0);
        let s = kpi.to_string();
        assert!(s.contains("Total cost:"));
        assert!(s.contains("Peak grid import:"));
    }
}
