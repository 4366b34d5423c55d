//! Rule-based battery dispatch over a net-load / price horizon.
//!
//! The optimizer works in two phases: it first derives per-step
//! [`Thresholds`] from the inputs, then walks the horizon once with the
//! stored energy as the only carried state.

use std::fmt;

use tracing::debug;

use crate::error::{Result, SimError};
use crate::sim::battery::BatteryConfig;
use crate::sim::power_balance::grid_import_mw;
use crate::sim::thresholds::{ThresholdLevels, ThresholdPolicy, Thresholds};

/// Which priority rule produced a step's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchReason {
    /// Surplus generation is absorbed.
    SelfConsumption,
    /// Net load above the peak threshold is shaved.
    PeakShaving,
    /// Price above the high threshold; discharge at full power.
    ArbitrageSell,
    /// Price below the low threshold; charge at full power.
    ArbitrageBuy,
    /// No rule fired.
    Idle,
}

impl fmt::Display for DispatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SelfConsumption => "self-consumption",
            Self::PeakShaving => "peak-shaving",
            Self::ArbitrageSell => "sell",
            Self::ArbitrageBuy => "buy",
            Self::Idle => "idle",
        };
        f.write_str(name)
    }
}

/// One step of a dispatch plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchStep {
    /// Net load the decision was made for (MW).
    pub net_load_mw: f64,
    /// Feasible battery flow (MW; positive=charge, negative=discharge).
    pub flow_mw: f64,
    /// Stored energy after the step (MWh).
    pub soc_mwh: f64,
    /// `net_load_mw + flow_mw`.
    pub grid_import_mw: f64,
    pub reason: DispatchReason,
}

/// Ordered dispatch decisions and the thresholds they were made against.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchPlan {
    pub steps: Vec<DispatchStep>,
    /// One entry per step.
    pub thresholds: Vec<Thresholds>,
}

impl DispatchPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Picks the raw action for one step by strict priority.
///
/// Returns the requested flow before any power or energy limit is applied.
fn raw_action(
    net_load_mw: f64,
    price: f64,
    th: &Thresholds,
    max_power_mw: f64,
) -> (f64, DispatchReason) {
    if net_load_mw < 0.0 {
        (-net_load_mw, DispatchReason::SelfConsumption)
    } else if net_load_mw > th.load_peak {
        (-(net_load_mw - th.load_peak), DispatchReason::PeakShaving)
    } else if price > th.price_high {
        (-max_power_mw, DispatchReason::ArbitrageSell)
    } else if price < th.price_low {
        (max_power_mw, DispatchReason::ArbitrageBuy)
    } else {
        (0.0, DispatchReason::Idle)
    }
}

/// Battery dispatch optimizer.
///
/// A pure function of its inputs: the same net load, prices and battery
/// always give a bit-identical plan.
///
/// # Examples
///
/// ```
/// use microgrid_twin::sim::battery::BatteryConfig;
/// use microgrid_twin::sim::optimizer::DispatchOptimizer;
///
/// let battery = BatteryConfig::new(100.0, 50.0, 0.9).unwrap();
/// let plan = DispatchOptimizer::new(battery)
///     .optimize(&[-20.0, 10.0], &[0.1, 0.1])
///     .unwrap();
/// assert_eq!(plan.steps[0].flow_mw, 20.0);
/// ```
#[derive(Debug, Clone)]
pub struct DispatchOptimizer {
    battery: BatteryConfig,
    policy: ThresholdPolicy,
    levels: ThresholdLevels,
}

impl DispatchOptimizer {
    /// Creates an optimizer using horizon-wide thresholds at the default levels.
    pub fn new(battery: BatteryConfig) -> Self {
        Self {
            battery,
            policy: ThresholdPolicy::default(),
            levels: ThresholdLevels::default(),
        }
    }

    /// Replaces the threshold policy.
    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the percentile levels.
    pub fn with_levels(mut self, levels: ThresholdLevels) -> Self {
        self.levels = levels;
        self
    }

    pub fn battery(&self) -> &BatteryConfig {
        &self.battery
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    /// Computes the dispatch plan for aligned `net_load` and `price` series.
    ///
    /// # Arguments
    ///
    /// * `net_load` - Demand minus renewables per hour (MW; positive=deficit)
    /// * `price` - Energy price per hour
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Alignment`] when the two series differ in length.
    /// An empty horizon is not an error and gives an empty plan.
    pub fn optimize(&self, net_load: &[f64], price: &[f64]) -> Result<DispatchPlan> {
        if net_load.len() != price.len() {
            return Err(SimError::Alignment(format!(
                "net_load has {} values, price has {}",
                net_load.len(),
                price.len()
            )));
        }
        if net_load.is_empty() {
            return Ok(DispatchPlan::default());
        }

        let thresholds = self.policy.thresholds(&self.levels, net_load, price);
        if let Some(first) = thresholds.first() {
            debug!(
                policy = ?self.policy,
                price_low = first.price_low,
                price_high = first.price_high,
                load_peak = first.load_peak,
                "dispatch thresholds"
            );
        }

        let max_power = self.battery.max_power_mw();
        let steps = net_load
            .iter()
            .zip(price)
            .zip(&thresholds)
            .scan(self.battery.initial_soc_mwh(), |soc, ((&load, &p), th)| {
                let (action, reason) = raw_action(load, p, th, max_power);
                let (flow, next_soc) = self.battery.apply(*soc, action);
                *soc = next_soc;
                Some(DispatchStep {
                    net_load_mw: load,
                    flow_mw: flow,
                    soc_mwh: next_soc,
                    grid_import_mw: grid_import_mw(load, flow),
                    reason,
                })
            })
            .collect();

        Ok(DispatchPlan { steps, thresholds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimizer() -> DispatchOptimizer {
        DispatchOptimizer::new(BatteryConfig::new(100.0, 50.0, 0.9).expect("valid battery"))
    }

    #[test]
    fn surplus_is_absorbed() {
        let plan = optimizer()
            .optimize(&[-20.0, 10.0, 10.0, 10.0], &[0.1; 4])
            .unwrap();
        let s = plan.steps[0];
        assert_eq!(s.reason, DispatchReason::SelfConsumption);
        assert_eq!(s.flow_mw, 20.0);
        assert!((s.soc_mwh - 68.0).abs() < 1e-9);
        assert_eq!(s.grid_import_mw, 0.0);
    }

    #[test]
    fn high_price_sells_at_full_power() {
        let plan = optimizer()
            .optimize(&[10.0; 4], &[0.05, 0.10, 0.10, 0.20])
            .unwrap();
        assert_eq!(plan.steps[0].reason, DispatchReason::ArbitrageBuy);
        let last = plan.steps[3];
        assert_eq!(last.reason, DispatchReason::ArbitrageSell);
        assert_eq!(last.flow_mw, -50.0);
        assert_eq!(last.grid_import_mw, -40.0);
    }

    #[test]
    fn cheap_charge_is_limited_by_headroom() {
        let battery = BatteryConfig::with_initial_soc(100.0, 50.0, 0.9, 0.9).unwrap();
        let plan = DispatchOptimizer::new(battery)
            .optimize(&[10.0, 10.0, 10.0, 10.0], &[0.01, 0.10, 0.10, 0.10])
            .unwrap();
        let s = plan.steps[0];
        assert_eq!(s.reason, DispatchReason::ArbitrageBuy);
        assert!((s.flow_mw - 10.0 / 0.9).abs() < 1e-9);
        assert!(s.soc_mwh <= 100.0);
        assert!((s.soc_mwh - 100.0).abs() < 1e-9);
    }

    #[test]
    fn peak_is_shaved_down_to_threshold() {
        let load = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 30.0];
        let plan = optimizer().optimize(&load, &[0.1; 10]).unwrap();
        let th = plan.thresholds[9];
        let s = plan.steps[9];
        assert_eq!(s.reason, DispatchReason::PeakShaving);
        assert!((th.load_peak - 12.0).abs() < 1e-9);
        assert!((s.flow_mw + (30.0 - th.load_peak)).abs() < 1e-9);
    }

    #[test]
    fn self_consumption_beats_arbitrage() {
        // negative net load at the most expensive hour still charges
        let plan = optimizer()
            .optimize(&[5.0, 5.0, 5.0, -5.0], &[0.1, 0.1, 0.1, 0.9])
            .unwrap();
        assert_eq!(plan.steps[3].reason, DispatchReason::SelfConsumption);
        assert!(plan.steps[3].flow_mw > 0.0);
    }

    #[test]
    fn flat_prices_stay_idle() {
        let plan = optimizer().optimize(&[10.0; 6], &[0.1; 6]).unwrap();
        for s in &plan.steps {
            assert_eq!(s.reason, DispatchReason::Idle);
            assert_eq!(s.flow_mw, 0.0);
            assert_eq!(s.soc_mwh, 50.0);
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = optimizer().optimize(&[1.0, 2.0], &[0.1]).unwrap_err();
        assert!(matches!(err, SimError::Alignment(_)));
    }

    #[test]
    fn empty_horizon_gives_empty_plan() {
        let plan = optimizer().optimize(&[], &[]).unwrap();
        assert!(plan.is_empty());
        assert!(plan.thresholds.is_empty());
    }

    #[test]
    fn grid_import_balances_exactly() {
        let load: Vec<f64> = (0..48).map(|i| f64::from(i % 24) * 7.3 - 40.0).collect();
        let price: Vec<f64> = (0..48).map(|i| 0.05 + f64::from(i % 24) * 0.01).collect();
        let plan = optimizer().optimize(&load, &price).unwrap();
        for s in &plan.steps {
            assert_eq!(s.grid_import_mw, s.net_load_mw + s.flow_mw);
            assert!(s.flow_mw.abs() <= 50.0);
            assert!((0.0..=100.0).contains(&s.soc_mwh));
        }
    }

    #[test]
    fn rolling_policy_reacts_to_recent_prices() {
        let load = [10.0; 8];
        let price = [0.1, 0.1, 0.1, 0.1, 0.5, 0.5, 0.5, 0.5];
        let horizon = optimizer().optimize(&load, &price).unwrap();
        let rolling = optimizer()
            .with_policy(ThresholdPolicy::Rolling { window: 4 })
            .optimize(&load, &price)
            .unwrap();
        // the whole-horizon high threshold already includes the later spike
        assert_ne!(horizon.thresholds[0], rolling.thresholds[0]);
        assert_eq!(horizon.steps[4].reason, DispatchReason::Idle);
        assert_eq!(rolling.steps[4].reason, DispatchReason::ArbitrageSell);
    }
}
