//! Microgrid digital twin: synthetic series, demand forecasting, and battery dispatch.

pub mod config;
pub mod error;
/// Data feeds and the default synthetic generators.
pub mod feed;
pub mod forecast;
pub mod io;
/// Dispatch optimizer, simulation pipeline, and KPIs.
pub mod sim;

pub use error::{Result, SimError};
