//! File output for simulation results.

pub mod export;

pub use export::{export_csv, write_csv};
