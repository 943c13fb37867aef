use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::config::{NoiseMode, PartyConfig};

/// Source of the multiplicative noise applied to every metric value
///
/// The generator handle is passed explicitly through every metric call, so a
/// seeded source makes a whole table reproducible. Factors are
/// `1 + σ × ξ` with `ξ ~ N(0, 1)`, i.e. normal draws centred on 1.0.
#[derive(Debug, Clone)]
pub enum NoiseSource {
    Gaussian(StdRng),
    Disabled,
}

impl NoiseSource {
    pub fn seeded(seed: u64) -> Self {
        NoiseSource::Gaussian(StdRng::seed_from_u64(seed))
    }

    /// OS-seeded source; output differs from run to run
    pub fn from_entropy() -> Self {
        NoiseSource::Gaussian(StdRng::from_os_rng())
    }

    pub fn disabled() -> Self {
        NoiseSource::Disabled
    }

    pub fn from_config(config: &PartyConfig) -> Self {
        match (config.noise, config.seed) {
            (NoiseMode::Disabled, _) => NoiseSource::Disabled,
            (NoiseMode::Gaussian, Some(seed)) => NoiseSource::seeded(seed),
            (NoiseMode::Gaussian, None) => NoiseSource::from_entropy(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, NoiseSource::Gaussian(_))
    }

    /// Next multiplicative factor for a metric with standard deviation `std_dev`
    ///
    /// A zero standard deviation returns 1.0 without consuming a draw.
    pub fn factor(&mut self, std_dev: f64) -> f64 {
        match self {
            NoiseSource::Disabled => 1.0,
            NoiseSource::Gaussian(_) if std_dev == 0.0 => 1.0,
            NoiseSource::Gaussian(rng) => {
                let xi: f64 = rng.sample(StandardNormal);
                1.0 + std_dev * xi
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_source_is_exactly_one() {
        let mut noise = NoiseSource::disabled();
        for sd in [0.0, 0.04, 0.18, 5.0] {
            assert_eq!(noise.factor(sd), 1.0);
        }
        assert!(!noise.is_enabled());
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = NoiseSource::seeded(42);
        let mut b = NoiseSource::seeded(42);

        for _ in 0..100 {
            assert_eq!(a.factor(0.1), b.factor(0.1));
        }
    }

    #[test]
    fn zero_std_dev_consumes_no_draw() {
        let mut a = NoiseSource::seeded(7);
        let mut b = NoiseSource::seeded(7);

        assert_eq!(a.factor(0.0), 1.0);
        assert_eq!(a.factor(0.1), b.factor(0.1));
    }

    #[test]
    fn gaussian_factor_centred_on_one() {
        let mut noise = NoiseSource::seeded(123);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| noise.factor(0.1)).collect();

        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!((mean - 1.0).abs() < 0.005, "mean was {}", mean);
        assert!((var.sqrt() - 0.1).abs() < 0.005, "std was {}", var.sqrt());
    }

    #[test]
    fn config_selects_source() {
        assert!(!NoiseSource::from_config(&PartyConfig::deterministic()).is_enabled());
        assert!(NoiseSource::from_config(&PartyConfig::seeded(1)).is_enabled());
        assert!(NoiseSource::from_config(&PartyConfig::modem()).is_enabled());
    }
}
