use rand::{Rng, rngs::StdRng};
use serde::Deserialize;

/// Wind generation model: Weibull-distributed wind speed through a cubic power curve.
///
/// Wind speed is `scale * W(shape)` where `W` is a unit-scale Weibull draw
/// (shape 2 approximates a Rayleigh distribution). Power is `min(v^3, rated)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindProfile {
    /// Weibull shape parameter `k`.
    pub weibull_shape: f64,

    /// Wind speed scaling factor.
    pub speed_scale: f64,

    /// Rated (maximum) output (MW).
    pub rated_mw: f64,
}

impl Default for WindProfile {
    fn default() -> Self {
        Self {
            weibull_shape: 2.0,
            speed_scale: 5.0,
            rated_mw: 150.0,
        }
    }
}

impl WindProfile {
    /// Draws a wind speed by inverting the Weibull CDF.
    pub fn sample_speed(&self, rng: &mut StdRng) -> f64 {
        let u: f64 = rng.random::<f64>();
        // 1 - u is in (0, 1], so the log is finite
        let unit = (-(1.0 - u).ln()).powf(1.0 / self.weibull_shape);
        unit * self.speed_scale
    }

    /// Simplified power curve: cubic in speed, capped at rated output.
    pub fn power_mw(&self, speed: f64) -> f64 {
        speed.max(0.0).powi(3).min(self.rated_mw)
    }

    /// Samples one hour of wind generation (MW).
    pub fn sample_mw(&self, rng: &mut StdRng) -> f64 {
        let speed = self.sample_speed(rng);
        self.power_mw(speed)
    }
}
