/// Validated battery parameters and the per-step energy model.
pub mod battery;
pub mod kpi;
/// Rule-based dispatch optimizer.
pub mod optimizer;
pub mod pipeline;
pub mod power_balance;
/// Percentile thresholds and the policies that compute them.
pub mod thresholds;
pub mod types;

pub use battery::BatteryConfig;
pub use kpi::KpiReport;
pub use optimizer::{DispatchOptimizer, DispatchPlan, DispatchReason, DispatchStep};
pub use pipeline::SimulationPipeline;
pub use thresholds::{ThresholdLevels, ThresholdPolicy, Thresholds};
pub use types::{SimulationResult, SimulationRow, TimeSeriesSample};
