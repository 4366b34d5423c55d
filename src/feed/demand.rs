use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use rand::rngs::StdRng;
use serde::Deserialize;

use super::types::gaussian_noise;

/// Hourly electricity demand model.
///
/// Demand is the superposition of:
/// - a constant base load
/// - a daily sine wave with its trough at midnight and its peak at noon
/// - a fixed weekend offset (lower demand on Saturday and Sunday)
/// - Gaussian noise
///
/// ```text
/// D(t) = base + amp * sin(2*pi*hour/24 - pi/2) + weekend + N(0, noise_std)
/// ```
///
/// The result is floored at zero.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use microgrid_twin::feed::DemandProfile;
///
/// let profile = DemandProfile { noise_std_mw: 0.0, ..DemandProfile::default() };
/// // Monday 2023-01-02: 400 MW at midnight, 600 MW at noon, back to base by 18:00.
/// let day = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
/// let mw = |h| profile.deterministic_mw(day.and_hms_opt(h, 0, 0).unwrap());
/// assert!((mw(0) - 400.0).abs() < 1e-9);
/// assert!((mw(12) - 600.0).abs() < 1e-9);
/// assert!((mw(18) - 500.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandProfile {
    /// Minimum load always present (MW).
    pub base_mw: f64,

    /// Amplitude of the daily sine wave (MW).
    pub daily_amp_mw: f64,

    /// Offset applied on Saturday and Sunday (MW, usually negative).
    pub weekend_offset_mw: f64,

    /// Standard deviation of the Gaussian noise (MW).
    pub noise_std_mw: f64,
}

impl Default for DemandProfile {
    fn default() -> Self {
        Self {
            base_mw: 500.0,
            daily_amp_mw: 100.0,
            weekend_offset_mw: -50.0,
            noise_std_mw: 20.0,
        }
    }
}

impl DemandProfile {
    /// Noise-free demand at `timestamp` (MW, may be negative before flooring).
    pub fn deterministic_mw(&self, timestamp: NaiveDateTime) -> f64 {
        let hour = f64::from(timestamp.hour());
        let angle = 2.0 * std::f64::consts::PI * hour / 24.0 - std::f64::consts::FRAC_PI_2;
        let weekend = match timestamp.weekday() {
            Weekday::Sat | Weekday::Sun => self.weekend_offset_mw,
            _ => 0.0,
        };
        self.base_mw + self.daily_amp_mw * angle.sin() + weekend
    }

    /// Samples demand at `timestamp`; never negative.
    pub fn sample_mw(&self, timestamp: NaiveDateTime, rng: &mut StdRng) -> f64 {
        let noise = gaussian_noise(rng, self.noise_std_mw);
        (self.deterministic_mw(timestamp) + noise).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid timestamp")
    }

    fn quiet() -> DemandProfile {
        DemandProfile {
            noise_std_mw: 0.0,
            ..DemandProfile::default()
        }
    }

    #[test]
    fn midnight_trough_and_noon_peak() {
        let p = quiet();
        // 2023-01-02 is a Monday
        assert!((p.deterministic_mw(at(2023, 1, 2, 0)) - 400.0).abs() < 1e-9);
        assert!((p.deterministic_mw(at(2023, 1, 2, 6)) - 500.0).abs() < 1e-9);
        assert!((p.deterministic_mw(at(2023, 1, 2, 12)) - 600.0).abs() < 1e-9);
        assert!((p.deterministic_mw(at(2023, 1, 2, 18)) - 500.0).abs() < 1e-9);
        let monday = |h| p.deterministic_mw(at(2023, 1, 2, h));
        let peak = (0..24)
            .max_by(|&a, &b| monday(a).total_cmp(&monday(b)))
            .expect("24 hours");
        assert_eq!(peak, 12);
    }

    #[test]
    fn weekend_is_lower() {
        let p = quiet();
        // 2023-01-01 is a Sunday
        let sunday = p.deterministic_mw(at(2023, 1, 1, 12));
        let monday = p.deterministic_mw(at(2023, 1, 2, 12));
        assert!((monday - sunday - 50.0).abs() < 1e-9);
    }

    #[test]
    fn demand_never_negative() {
        let p = DemandProfile {
            base_mw: 0.0,
            noise_std_mw: 50.0,
            ..DemandProfile::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for h in 0..24 {
            assert!(p.sample_mw(at(2023, 1, 1, h), &mut rng) >= 0.0);
        }
    }

    #[test]
    fn deterministic_with_same_seed() {
        let p = DemandProfile::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for h in 0..24 {
            let ts = at(2023, 1, 3, h);
            assert_eq!(p.sample_mw(ts, &mut a), p.sample_mw(ts, &mut b));
        }
    }
}
