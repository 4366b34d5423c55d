use chrono::{NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use serde::Deserialize;

use super::types::gaussian_noise;

/// Time-of-use tariff with small random volatility.
///
/// Tiers by hour of day:
/// - on-peak: 16:00-20:00
/// - mid-peak: 06:00-16:00 and 20:00-22:00
/// - off-peak: everything else
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceProfile {
    /// Night tariff.
    pub off_peak: f64,

    /// Daytime tariff.
    pub mid_peak: f64,

    /// Evening tariff.
    pub on_peak: f64,

    /// Standard deviation of the additive Gaussian volatility.
    pub volatility: f64,

    /// Lowest price ever produced.
    pub floor: f64,
}

impl Default for PriceProfile {
    fn default() -> Self {
        Self {
            off_peak: 0.05,
            mid_peak: 0.10,
            on_peak: 0.20,
            volatility: 0.005,
            floor: 0.01,
        }
    }
}

impl PriceProfile {
    /// Tariff tier price for the hour of `timestamp`, before volatility.
    pub fn tier_price(&self, timestamp: NaiveDateTime) -> f64 {
        match timestamp.hour() {
            16..=19 => self.on_peak,
            6..=15 | 20..=21 => self.mid_peak,
            _ => self.off_peak,
        }
    }

    /// Samples the price at `timestamp`, floored at [`PriceProfile::floor`].
    pub fn sample(&self, timestamp: NaiveDateTime, rng: &mut StdRng) -> f64 {
        let noise = gaussian_noise(rng, self.volatility);
        (self.tier_price(timestamp) + noise).max(self.floor)
    }
}
