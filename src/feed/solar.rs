use chrono::{NaiveDateTime, Timelike};
use rand::{Rng, rngs::StdRng};
use serde::Deserialize;

/// Solar generation model driven by the sun's path and random cloud cover.
///
/// ```text
/// S(t) = peak * max(0, sin(pi * (hour - sunrise) / daylight)) * U(cloud_min, cloud_max)
/// ```
///
/// A cloud factor of 1.0 is a clear sky; 0.5 halves the output. Output is
/// always within `[0, peak_mw]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarProfile {
    /// Clear-sky output at solar noon (MW).
    pub peak_mw: f64,

    /// Hour of day when generation starts.
    pub sunrise_hour: u32,

    /// Hour of day when generation ends (exclusive of positive output).
    pub sunset_hour: u32,

    /// Lower bound of the uniform cloud factor.
    pub cloud_min: f64,

    /// Upper bound of the uniform cloud factor.
    pub cloud_max: f64,
}

impl Default for SolarProfile {
    fn default() -> Self {
        Self {
            peak_mw: 200.0,
            sunrise_hour: 6,
            sunset_hour: 18,
            cloud_min: 0.5,
            cloud_max: 1.0,
        }
    }
}

impl SolarProfile {
    /// Fraction of clear-sky peak for the hour of `timestamp`, in `[0, 1]`.
    pub fn daylight_frac(&self, timestamp: NaiveDateTime) -> f64 {
        let hour = f64::from(timestamp.hour());
        let daylight = f64::from(self.sunset_hour.saturating_sub(self.sunrise_hour));
        if daylight <= 0.0 {
            return 0.0;
        }
        let x = std::f64::consts::PI * (hour - f64::from(self.sunrise_hour)) / daylight;
        x.sin().clamp(0.0, 1.0)
    }

    /// Samples generation at `timestamp`.
    ///
    /// The cloud factor is drawn every hour, night included, so the stream of
    /// random numbers does not depend on the day/night split.
    pub fn sample_mw(&self, timestamp: NaiveDateTime, rng: &mut StdRng) -> f64 {
        let cloud: f64 = rng.random_range(self.cloud_min..=self.cloud_max);
        self.peak_mw * self.daylight_frac(timestamp) * cloud
    }
}
