//! Microgrid power balance.
//!
//! Sign convention throughout the crate:
//! - Net load positive = deficit (must be imported), negative = surplus
//! - Battery flow positive = charge, negative = discharge

/// Net load after renewables.
///
/// # Arguments
///
/// * `demand_mw` - Electricity demand (positive)
/// * `solar_mw` - Solar generation (positive)
/// * `wind_mw` - Wind generation (positive)
///
/// # Returns
///
/// `demand - (solar + wind)` in MW
pub fn net_load_mw(demand_mw: f64, solar_mw: f64, wind_mw: f64) -> f64 {
    demand_mw - (solar_mw + wind_mw)
}

/// Power drawn from the grid once the battery flow is added to the net load.
///
/// Negative values are exports.
pub fn grid_import_mw(net_load_mw: f64, battery_flow_mw: f64) -> f64 {
    net_load_mw + battery_flow_mw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renewables_reduce_net_load() {
        assert_eq!(net_load_mw(500.0, 120.0, 30.0), 350.0);
    }

    #[test]
    fn surplus_is_negative() {
        assert_eq!(net_load_mw(100.0, 150.0, 20.0), -70.0);
    }

    #[test]
    fn charging_adds_to_import() {
        assert_eq!(grid_import_mw(10.0, 5.0), 15.0);
    }

    #[test]
    fn discharge_can_export() {
        assert_eq!(grid_import_mw(10.0, -50.0), -40.0);
    }
}
