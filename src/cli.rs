//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use microgrid_twin::config::ScenarioConfig;

/// Threshold policy selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThresholdArg {
    /// Statistics over the whole simulated horizon
    Horizon,
    /// Statistics over a trailing window (causal)
    Rolling,
}

impl ThresholdArg {
    fn as_config_str(self) -> &'static str {
        match self {
            Self::Horizon => "horizon",
            Self::Rolling => "rolling",
        }
    }
}

/// Demand forecaster selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ForecasterArg {
    /// Trend plus daily and weekly seasonality
    Seasonal,
    /// Tomorrow repeats today
    Naive,
}

impl ForecasterArg {
    fn as_config_str(self) -> &'static str {
        match self {
            Self::Seasonal => "seasonal",
            Self::Naive => "naive",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "microgrid-twin")]
#[command(version, about = "Microgrid digital twin: synthetic data, demand forecast, battery dispatch")]
#[command(
    long_about = "Generates synthetic demand, solar, wind and price series, forecasts demand,\n\
    dispatches a battery against the net load, and reports cost and KPIs.\n\
    \nIf neither --scenario nor --preset is given, the baseline preset is used.\n\
    \nExamples:\n  \
    microgrid-twin --days 7\n  \
    microgrid-twin --preset volatile_prices --quiet\n  \
    microgrid-twin --scenario scenarios/baseline.toml --output run.csv"
)]
pub struct Cli {
    /// Load scenario from TOML config file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, high_renewables, volatile_prices)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the number of simulated days
    #[arg(long)]
    pub days: Option<usize>,

    /// Override random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the dispatch threshold policy
    #[arg(long, value_enum)]
    pub thresholds: Option<ThresholdArg>,

    /// Override the demand forecaster
    #[arg(long, value_enum)]
    pub forecaster: Option<ForecasterArg>,

    /// Export result rows to CSV
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Suppress per-hour output; print only the KPI report
    #[arg(long, short)]
    pub quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a loaded scenario.
    pub fn apply_overrides(&self, scenario: &mut ScenarioConfig) {
        if let Some(days) = self.days {
            scenario.simulation.days = days;
        }
        if let Some(seed) = self.seed {
            scenario.simulation.seed = seed;
        }
        if let Some(t) = self.thresholds {
            scenario.dispatch.thresholds = t.as_config_str().to_string();
        }
        if let Some(f) = self.forecaster {
            scenario.simulation.forecaster = f.as_config_str().to_string();
        }
    }
}
