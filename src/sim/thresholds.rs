//! Percentile thresholds that drive the dispatch priority rules.

/// Linear-interpolation percentile (closest-ranks method).
///
/// The rank is `pct / 100 * (n - 1)`; values between ranks are interpolated.
/// Returns `None` for an empty slice. `pct` is clamped to `[0, 100]`.
///
/// # Examples
///
/// ```
/// use microgrid_twin::sim::thresholds::percentile;
///
/// assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 25.0), Some(1.75));
/// assert_eq!(percentile(&[], 50.0), None);
/// ```
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Percentile levels used to derive [`Thresholds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdLevels {
    /// Prices below this percentile are "cheap".
    pub price_low_pct: f64,
    /// Prices above this percentile are "expensive".
    pub price_high_pct: f64,
    /// Net load above this percentile is a peak.
    pub load_peak_pct: f64,
}

impl Default for ThresholdLevels {
    fn default() -> Self {
        Self {
            price_low_pct: 25.0,
            price_high_pct: 75.0,
            load_peak_pct: 90.0,
        }
    }
}

/// Decision thresholds in effect at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub price_low: f64,
    pub price_high: f64,
    pub load_peak: f64,
}

impl Thresholds {
    /// Computes thresholds over the given windows. Both slices must be non-empty.
    fn over(levels: &ThresholdLevels, net_load: &[f64], price: &[f64]) -> Option<Self> {
        Some(Self {
            price_low: percentile(price, levels.price_low_pct)?,
            price_high: percentile(price, levels.price_high_pct)?,
            load_peak: percentile(net_load, levels.load_peak_pct)?,
        })
    }
}

/// Which observations the thresholds at step `i` are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdPolicy {
    /// Statistics over the entire horizon, fixed for every step.
    ///
    /// Not causal: step `i` sees prices and loads from later steps.
    #[default]
    Horizon,
    /// Statistics over the trailing `window` steps ending at `i` (inclusive).
    ///
    /// Causal: step `i` never sees later observations. The first steps use
    /// the shorter history available.
    Rolling { window: usize },
}

impl ThresholdPolicy {
    /// Per-step thresholds for aligned `net_load` and `price` series.
    ///
    /// Returns one entry per step; empty input gives an empty vector.
    /// Callers must pass slices of equal length.
    pub fn thresholds(
        &self,
        levels: &ThresholdLevels,
        net_load: &[f64],
        price: &[f64],
    ) -> Vec<Thresholds> {
        debug_assert_eq!(net_load.len(), price.len());
        match *self {
            Self::Horizon => Thresholds::over(levels, net_load, price)
                .map(|t| vec![t; net_load.len()])
                .unwrap_or_default(),
            Self::Rolling { window } => {
                let window = window.max(1);
                (0..net_load.len())
                    .filter_map(|i| {
                        let start = (i + 1).saturating_sub(window);
                        Thresholds::over(levels, &net_load[start..=i], &price[start..=i])
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_matches_linear_interpolation() {
        let v = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&v, 0.0), Some(1.0));
        assert_eq!(percentile(&v, 50.0), Some(3.0));
        assert_eq!(percentile(&v, 100.0), Some(5.0));
        let p90 = percentile(&v, 90.0).unwrap();
        assert!((p90 - 4.6).abs() < 1e-12);
    }

    #[test]
    fn percentile_single_value() {
        assert_eq!(percentile(&[7.0], 25.0), Some(7.0));
    }

    #[test]
    fn horizon_thresholds_are_constant() {
        let load = [1.0, 2.0, 3.0, 4.0];
        let price = [0.1, 0.2, 0.3, 0.4];
        let th = ThresholdPolicy::Horizon.thresholds(&ThresholdLevels::default(), &load, &price);
        assert_eq!(th.len(), 4);
        assert!(th.iter().all(|t| *t == th[0]));
        assert!((th[0].price_low - 0.175).abs() < 1e-12);
        assert!((th[0].price_high - 0.325).abs() < 1e-12);
        assert!((th[0].load_peak - 3.7).abs() < 1e-12);
    }

    #[test]
    fn rolling_thresholds_ignore_the_future() {
        let levels = ThresholdLevels::default();
        let load = [1.0, 1.0, 1.0, 100.0];
        let price = [0.1, 0.1, 0.1, 9.0];
        let policy = ThresholdPolicy::Rolling { window: 3 };
        let th = policy.thresholds(&levels, &load, &price);
        assert_eq!(th.len(), 4);
        // steps 0..=2 only ever saw the flat prefix
        for t in &th[..3] {
            assert_eq!(t.load_peak, 1.0);
            assert_eq!(t.price_high, 0.1);
        }
        // step 3 sees [1, 1, 100]
        assert!(th[3].load_peak > 1.0);
    }

    #[test]
    fn rolling_prefix_is_stable_under_appending() {
        let levels = ThresholdLevels::default();
        let policy = ThresholdPolicy::Rolling { window: 5 };
        let load: Vec<f64> = (0..10).map(|i| f64::from(i * 7 % 11)).collect();
        let price: Vec<f64> = (0..10).map(|i| f64::from(i * 3 % 5)).collect();
        let short = policy.thresholds(&levels, &load[..6], &price[..6]);
        let long = policy.thresholds(&levels, &load, &price);
        assert_eq!(short, long[..6]);
    }

    #[test]
    fn empty_input_gives_no_thresholds() {
        let levels = ThresholdLevels::default();
        assert!(ThresholdPolicy::Horizon.thresholds(&levels, &[], &[]).is_empty());
        assert!(
            ThresholdPolicy::Rolling { window: 4 }
                .thresholds(&levels, &[], &[])
                .is_empty()
        );
    }
}
