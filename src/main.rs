//! Microgrid twin entry point: CLI wiring and config-driven pipeline construction.

mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use microgrid_twin::config::ScenarioConfig;
use microgrid_twin::forecast::{Forecaster, NaiveForecaster, SeasonalForecaster};
use microgrid_twin::io::export_csv;
use microgrid_twin::sim::{KpiReport, SimulationPipeline, SimulationResult};

use cli::Cli;

/// Runs the pipeline for `cfg` with the given forecaster.
fn run_with<F: Forecaster>(cfg: &ScenarioConfig, forecaster: F) -> anyhow::Result<SimulationResult> {
    let optimizer = cfg.optimizer()?;
    let mut pipeline =
        SimulationPipeline::new(cfg.feed(), forecaster, optimizer, cfg.simulation.start_date);
    Ok(pipeline.run(cfg.simulation.days)?)
}

fn load_scenario(cli: &Cli) -> anyhow::Result<ScenarioConfig> {
    // --scenario takes priority, then --preset, then baseline default
    let scenario = if let Some(path) = &cli.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(name) = &cli.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };
    Ok(scenario)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut scenario = load_scenario(&cli)?;
    cli.apply_overrides(&mut scenario);

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }

    info!(
        days = scenario.simulation.days,
        seed = scenario.simulation.seed,
        forecaster = %scenario.simulation.forecaster,
        thresholds = %scenario.dispatch.thresholds,
        "starting simulation"
    );

    let result = match scenario.simulation.forecaster.as_str() {
        "naive" => run_with(&scenario, NaiveForecaster::default())?,
        _ => run_with(&scenario, SeasonalForecaster::new())?,
    };

    if !cli.quiet {
        for r in &result.rows {
            println!("{r}");
        }
        println!();
    }

    let kpi = KpiReport::from_rows(&result.rows, result.battery.capacity_mwh());
    println!("{kpi}");

    if let Some(path) = &cli.output {
        export_csv(&result.rows, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), rows = result.len(), "results written");
    }

    Ok(())
}
