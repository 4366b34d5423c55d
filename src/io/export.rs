//! CSV export for simulation result rows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::SimulationRow;

/// Column header for the simulation table.
pub const HEADER: &str = "timestamp,actual_demand,forecast_demand,solar,wind,price,\
                          net_load,battery_flow,soc,grid_import,cost";

/// Timestamp layout used in the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exports simulation rows to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `rows` - Complete simulation rows
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[SimulationRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes simulation rows as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[SimulationRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.4}", r.actual_demand_mw),
            format!("{:.4}", r.forecast_demand_mw),
            format!("{:.4}", r.solar_mw),
            format!("{:.4}", r.wind_mw),
            format!("{:.4}", r.price),
            format!("{:.4}", r.net_load_mw),
            format!("{:.4}", r.battery_flow_mw),
            format!("{:.4}", r.soc_mwh),
            format!("{:.4}", r.grid_import_mw),
            format!("{:.4}", r.cost),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
