use crate::error::{Result, SimError};

/// Validated, read-only battery parameters.
///
/// Constructed once per run through [`BatteryConfig::new`]; there are no
/// setters, so parameters cannot drift mid-run.
///
/// # Power Flow Convention
/// - Positive flow: charging (drawn from the grid / absorbs surplus)
/// - Negative flow: discharging (supplies load)
///
/// # Examples
///
/// ```
/// use microgrid_twin::sim::battery::BatteryConfig;
///
/// let battery = BatteryConfig::new(100.0, 50.0, 0.9).unwrap();
/// assert_eq!(battery.initial_soc_mwh(), 50.0);
/// assert!(BatteryConfig::new(100.0, 50.0, 1.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryConfig {
    capacity_mwh: f64,
    max_power_mw: f64,
    efficiency: f64,
    initial_soc: f64,
}

impl BatteryConfig {
    /// Default starting state of charge as a fraction of capacity.
    pub const DEFAULT_INITIAL_SOC: f64 = 0.5;

    /// Creates a battery starting half-charged.
    ///
    /// # Arguments
    ///
    /// * `capacity_mwh` - Energy capacity in MWh (must be > 0)
    /// * `max_power_mw` - Charge/discharge power rating in MW (must be > 0)
    /// * `efficiency` - One-way efficiency applied on charge and on discharge, in `(0, 1]`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] naming the first invalid parameter.
    pub fn new(capacity_mwh: f64, max_power_mw: f64, efficiency: f64) -> Result<Self> {
        Self::with_initial_soc(
            capacity_mwh,
            max_power_mw,
            efficiency,
            Self::DEFAULT_INITIAL_SOC,
        )
    }

    /// Creates a battery with an explicit starting state of charge fraction in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] naming the first invalid parameter.
    pub fn with_initial_soc(
        capacity_mwh: f64,
        max_power_mw: f64,
        efficiency: f64,
        initial_soc: f64,
    ) -> Result<Self> {
        // NaN fails every comparison below, so it is rejected too
        if !(capacity_mwh > 0.0 && capacity_mwh.is_finite()) {
            return Err(SimError::configuration(
                "battery.capacity_mwh",
                format!("must be a finite value > 0, got {capacity_mwh}"),
            ));
        }
        if !(max_power_mw > 0.0 && max_power_mw.is_finite()) {
            return Err(SimError::configuration(
                "battery.max_power_mw",
                format!("must be a finite value > 0, got {max_power_mw}"),
            ));
        }
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(SimError::configuration(
                "battery.efficiency",
                format!("must be in (0, 1], got {efficiency}"),
            ));
        }
        if !(0.0..=1.0).contains(&initial_soc) {
            return Err(SimError::configuration(
                "battery.initial_soc",
                format!("must be in [0, 1], got {initial_soc}"),
            ));
        }

        Ok(Self {
            capacity_mwh,
            max_power_mw,
            efficiency,
            initial_soc,
        })
    }

    pub fn capacity_mwh(&self) -> f64 {
        self.capacity_mwh
    }

    pub fn max_power_mw(&self) -> f64 {
        self.max_power_mw
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Starting state of charge as a fraction of capacity.
    pub fn initial_soc(&self) -> f64 {
        self.initial_soc
    }

    /// Starting stored energy (MWh).
    pub fn initial_soc_mwh(&self) -> f64 {
        self.capacity_mwh * self.initial_soc
    }

    /// Applies a requested action to the current state of charge.
    ///
    /// Enforces the power rating, then the energy limits with efficiency
    /// applied asymmetrically:
    /// - charging stores `flow * efficiency`
    /// - discharging consumes `|flow| / efficiency` from storage
    ///
    /// # Arguments
    ///
    /// * `soc_mwh` - Stored energy before the step
    /// * `action_mw` - Requested flow (positive = charge, negative = discharge)
    ///
    /// # Returns
    ///
    /// `(flow_mw, soc_mwh)`: the feasible flow and the stored energy after the step,
    /// the latter always within `[0, capacity]`.
    pub fn apply(&self, soc_mwh: f64, action_mw: f64) -> (f64, f64) {
        let cmd_mw = action_mw.clamp(-self.max_power_mw, self.max_power_mw);

        let (flow_mw, next_soc) = if cmd_mw > 0.0 {
            // Charging: limited by remaining headroom
            let max_charge = (self.capacity_mwh - soc_mwh) / self.efficiency;
            let flow = cmd_mw.min(max_charge);
            (flow, soc_mwh + flow * self.efficiency)
        } else if cmd_mw < 0.0 {
            // Discharging: limited by stored energy
            let max_discharge = soc_mwh * self.efficiency;
            let flow = if -cmd_mw > max_discharge {
                -max_discharge
            } else {
                cmd_mw
            };
            (flow, soc_mwh + flow / self.efficiency)
        } else {
            (0.0, soc_mwh)
        };

        (flow_mw, next_soc.clamp(0.0, self.capacity_mwh))
    }
}
