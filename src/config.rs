//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::error::SimError;
use crate::feed::{DemandProfile, PriceProfile, SolarProfile, SyntheticFeed, WindProfile};
use crate::sim::battery::BatteryConfig;
use crate::sim::optimizer::DispatchOptimizer;
use crate::sim::thresholds::{ThresholdLevels, ThresholdPolicy};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length, seed, and forecaster choice.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Battery parameters.
    #[serde(default)]
    pub battery: BatteryParams,
    /// Threshold policy for the dispatch optimizer.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Demand generator.
    #[serde(default)]
    pub demand: DemandProfile,
    /// Solar generator.
    #[serde(default)]
    pub solar: SolarProfile,
    /// Wind generator.
    #[serde(default)]
    pub wind: WindProfile,
    /// Price generator.
    #[serde(default)]
    pub price: PriceProfile,
}

/// Run length, seed, and forecaster choice.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of days to simulate after an equally long history (must be > 0).
    pub days: usize,
    /// Master random seed.
    pub seed: u64,
    /// First day of the generated history.
    pub start_date: NaiveDate,
    /// Forecaster type: `"seasonal"` or `"naive"`.
    pub forecaster: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: 30,
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            forecaster: "seasonal".to_string(),
        }
    }
}

/// Battery parameters as written in a scenario file.
///
/// Converted to a validated [`BatteryConfig`] with [`BatteryParams::to_battery`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryParams {
    /// Energy capacity (MWh).
    pub capacity_mwh: f64,
    /// Charge/discharge power rating (MW).
    pub max_power_mw: f64,
    /// One-way efficiency (0.0-1.0].
    pub efficiency: f64,
    /// Initial state of charge (0.0-1.0).
    pub initial_soc: f64,
}

impl Default for BatteryParams {
    fn default() -> Self {
        Self {
            capacity_mwh: 100.0,
            max_power_mw: 50.0,
            efficiency: 0.9,
            initial_soc: BatteryConfig::DEFAULT_INITIAL_SOC,
        }
    }
}

impl BatteryParams {
    /// Builds the validated battery.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] naming the first invalid parameter.
    pub fn to_battery(&self) -> Result<BatteryConfig, SimError> {
        BatteryConfig::with_initial_soc(
            self.capacity_mwh,
            self.max_power_mw,
            self.efficiency,
            self.initial_soc,
        )
    }
}

/// Threshold policy for the dispatch optimizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// `"horizon"` (whole-horizon statistics) or `"rolling"` (trailing window).
    pub thresholds: String,
    /// Trailing window length for the rolling policy (hours).
    pub window_hours: usize,
    /// Low price percentile.
    pub price_low_pct: f64,
    /// High price percentile.
    pub price_high_pct: f64,
    /// Peak net load percentile.
    pub load_peak_pct: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let levels = ThresholdLevels::default();
        Self {
            thresholds: "horizon".to_string(),
            window_hours: 168,
            price_low_pct: levels.price_low_pct,
            price_high_pct: levels.price_high_pct,
            load_peak_pct: levels.load_peak_pct,
        }
    }
}

impl DispatchConfig {
    /// Threshold policy named by `thresholds`; anything but `"rolling"` is the horizon policy.
    pub fn policy(&self) -> ThresholdPolicy {
        match self.thresholds.as_str() {
            "rolling" => ThresholdPolicy::Rolling {
                window: self.window_hours,
            },
            _ => ThresholdPolicy::Horizon,
        }
    }

    pub fn levels(&self) -> ThresholdLevels {
        ThresholdLevels {
            price_low_pct: self.price_low_pct,
            price_high_pct: self.price_high_pct,
            load_peak_pct: self.load_peak_pct,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the high-renewables preset: larger solar and wind fleet, bigger battery.
    pub fn high_renewables() -> Self {
        Self {
            battery: BatteryParams {
                capacity_mwh: 200.0,
                max_power_mw: 80.0,
                ..BatteryParams::default()
            },
            solar: SolarProfile {
                peak_mw: 350.0,
                sunrise_hour: 5,
                sunset_hour: 19,
                ..SolarProfile::default()
            },
            wind: WindProfile {
                speed_scale: 6.5,
                rated_mw: 250.0,
                ..WindProfile::default()
            },
            ..Self::default()
        }
    }

    /// Returns the volatile-prices preset: wide tariff spread, noisy prices,
    /// and a causal rolling threshold over the last three days.
    pub fn volatile_prices() -> Self {
        Self {
            dispatch: DispatchConfig {
                thresholds: "rolling".to_string(),
                window_hours: 72,
                ..DispatchConfig::default()
            },
            price: PriceProfile {
                off_peak: 0.03,
                mid_peak: 0.12,
                on_peak: 0.35,
                volatility: 0.03,
                ..PriceProfile::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_renewables", "volatile_prices"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_renewables" => Ok(Self::high_renewables()),
            "volatile_prices" => Ok(Self::volatile_prices()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Synthetic feed built from the four generator sections and the seed.
    pub fn feed(&self) -> SyntheticFeed {
        SyntheticFeed::new(
            self.demand.clone(),
            self.solar.clone(),
            self.wind.clone(),
            self.price.clone(),
            self.simulation.seed,
        )
    }

    /// Dispatch optimizer for the battery and dispatch sections.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] if the battery parameters are invalid.
    pub fn optimizer(&self) -> Result<DispatchOptimizer, SimError> {
        Ok(DispatchOptimizer::new(self.battery.to_battery()?)
            .with_policy(self.dispatch.policy())
            .with_levels(self.dispatch.levels()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if s.forecaster != "seasonal" && s.forecaster != "naive" {
            errors.push(ConfigError::new(
                "simulation.forecaster",
                format!(
                    "must be \"seasonal\" or \"naive\", got \"{}\"",
                    s.forecaster
                ),
            ));
        }

        if let Err(SimError::Configuration { field, message }) = self.battery.to_battery() {
            errors.push(ConfigError { field, message });
        }

        let d = &self.dispatch;
        if d.thresholds != "horizon" && d.thresholds != "rolling" {
            errors.push(ConfigError::new(
                "dispatch.thresholds",
                format!(
                    "must be \"horizon\" or \"rolling\", got \"{}\"",
                    d.thresholds
                ),
            ));
        }
        if d.window_hours == 0 {
            errors.push(ConfigError::new("dispatch.window_hours", "must be > 0"));
        }
        for (field, pct) in [
            ("dispatch.price_low_pct", d.price_low_pct),
            ("dispatch.price_high_pct", d.price_high_pct),
            ("dispatch.load_peak_pct", d.load_peak_pct),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                errors.push(ConfigError::new(field, "must be in [0, 100]"));
            }
        }
        if d.price_low_pct > d.price_high_pct {
            errors.push(ConfigError::new(
                "dispatch.price_low_pct",
                "must be <= dispatch.price_high_pct",
            ));
        }

        // negated comparisons so NaN fails them too
        let dem = &self.demand;
        for (field, value) in [
            ("demand.base_mw", dem.base_mw),
            ("demand.daily_amp_mw", dem.daily_amp_mw),
            ("demand.weekend_offset_mw", dem.weekend_offset_mw),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be finite"));
            }
        }
        if !(self.demand.noise_std_mw >= 0.0) {
            errors.push(ConfigError::new("demand.noise_std_mw", "must be >= 0"));
        }

        let sol = &self.solar;
        if !(sol.peak_mw >= 0.0) {
            errors.push(ConfigError::new("solar.peak_mw", "must be >= 0"));
        }
        if sol.sunrise_hour >= sol.sunset_hour {
            errors.push(ConfigError::new(
                "solar.sunrise_hour",
                "must be < solar.sunset_hour",
            ));
        }
        if sol.sunset_hour > 24 {
            errors.push(ConfigError::new("solar.sunset_hour", "must be <= 24"));
        }
        if !(0.0 <= sol.cloud_min && sol.cloud_min <= sol.cloud_max && sol.cloud_max <= 1.0) {
            errors.push(ConfigError::new(
                "solar.cloud_min",
                "must satisfy 0 <= cloud_min <= cloud_max <= 1",
            ));
        }

        let w = &self.wind;
        if !(w.weibull_shape > 0.0) {
            errors.push(ConfigError::new("wind.weibull_shape", "must be > 0"));
        }
        if !(w.speed_scale >= 0.0) {
            errors.push(ConfigError::new("wind.speed_scale", "must be >= 0"));
        }
        if !(w.rated_mw >= 0.0) {
            errors.push(ConfigError::new("wind.rated_mw", "must be >= 0"));
        }

        let p = &self.price;
        for (field, value) in [
            ("price.off_peak", p.off_peak),
            ("price.mid_peak", p.mid_peak),
            ("price.on_peak", p.on_peak),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be finite"));
            }
        }
        if !(p.volatility >= 0.0) {
            errors.push(ConfigError::new("price.volatility", "must be >= 0"));
        }
        if !(p.floor >= 0.0) {
            errors.push(ConfigError::new("price.floor", "must be >= 0"));
        }

        errors
    }
}
