//! Repeated sub-sampling to build an empirical distribution of sample means.
//!
//! Draw `sample_size` observations without replacement, take their mean,
//! and repeat `repetitions` times. By the central limit theorem the
//! resulting means cluster around the population mean with spread close to
//! the standard error σ/√k.
//!
//! The caller owns the random number generator, so a seeded generator
//! gives reproducible runs.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use u_descriptive::sampling::Resampler;
//!
//! let population: Vec<f64> = (0..1000).map(|i| (i % 100) as f64).collect();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let dist = Resampler::new(40, 100).unwrap().run(&population, &mut rng).unwrap();
//! assert_eq!(dist.means.len(), 100);
//! assert!((dist.mean_of_means - 49.5).abs() < 3.0);
//! ```

use rand::Rng;

use crate::descriptive;
use crate::error::{StatsError, StatsResult};

/// Sub-sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampler {
    sample_size: usize,
    repetitions: usize,
}

/// Empirical sampling distribution of the mean.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingDistribution {
    /// One mean per repetition, in draw order.
    pub means: Vec<f64>,
    /// Mean of [`Self::means`].
    pub mean_of_means: f64,
    /// Standard deviation of the sample means. `None` with one repetition.
    pub observed_std_error: Option<f64>,
    /// σ/√k with the finite-population correction √((N − k)/(N − 1)).
    pub expected_std_error: f64,
}

impl Resampler {
    /// # Errors
    ///
    /// `InvalidParameter` if either parameter is zero.
    pub fn new(sample_size: usize, repetitions: usize) -> StatsResult<Self> {
        if sample_size == 0 {
            return Err(StatsError::invalid("sample size must be positive"));
        }
        if repetitions == 0 {
            return Err(StatsError::invalid("repetitions must be positive"));
        }
        Ok(Self {
            sample_size,
            repetitions,
        })
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Draws the sample means.
    ///
    /// # Errors
    ///
    /// `InsufficientData` when the population is smaller than the sample
    /// size (sampling is without replacement), `NonFinite` for NaN values.
    pub fn sample_means<R>(&self, population: &[f64], rng: &mut R) -> StatsResult<Vec<f64>>
    where
        R: Rng + ?Sized,
    {
        descriptive::check(population, self.sample_size)?;

        let mut buf = Vec::with_capacity(self.sample_size);
        (0..self.repetitions)
            .map(|_| {
                buf.clear();
                let picks =
                    rand::seq::index::sample(&mut *rng, population.len(), self.sample_size);
                buf.extend(picks.iter().map(|i| population[i]));
                descriptive::mean(&buf)
            })
            .collect()
    }

    /// Draws the sample means and summarizes them.
    pub fn run<R>(&self, population: &[f64], rng: &mut R) -> StatsResult<SamplingDistribution>
    where
        R: Rng + ?Sized,
    {
        let means = self.sample_means(population, rng)?;
        let mean_of_means = descriptive::mean(&means)?;
        let observed_std_error = descriptive::std_dev(&means).ok();

        let n = population.len() as f64;
        let k = self.sample_size as f64;
        let sigma = descriptive::std_dev(population).unwrap_or(0.0);
        let fpc = if population.len() > 1 {
            ((n - k) / (n - 1.0)).max(0.0).sqrt()
        } else {
            0.0
        };

        Ok(SamplingDistribution {
            means,
            mean_of_means,
            observed_std_error,
            expected_std_error: sigma / k.sqrt() * fpc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution, Normal};

    fn normal_population(n: usize, mean: f64, sd: f64, seed: u64) -> Vec<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let dist = Normal::new(mean, sd).expect("valid normal");
        (0..n).map(|_| dist.sample(&mut rng)).collect()
    }

    #[test]
    fn rejects_zero_parameters() {
        assert!(Resampler::new(0, 10).is_err());
        assert!(Resampler::new(10, 0).is_err());
    }

    #[test]
    fn sample_larger_than_population() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let r = Resampler::new(5, 3).expect("valid");
        assert_eq!(
            r.sample_means(&[1.0, 2.0], &mut rng),
            Err(StatsError::insufficient(5, 2))
        );
        assert_eq!(
            r.sample_means(&[], &mut rng),
            Err(StatsError::insufficient(5, 0))
        );
    }

    #[test]
    fn full_population_sample_is_exact() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let dist = Resampler::new(4, 5).expect("valid").run(&data, &mut rng).expect("ok");
        assert!(dist.means.iter().all(|m| (m - 2.5).abs() < 1e-12));
        assert!(dist.expected_std_error.abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_means() {
        let pop = normal_population(500, 100.0, 5.0, 3);
        let r = Resampler::new(40, 20).expect("valid");
        let a = r.sample_means(&pop, &mut ChaCha8Rng::seed_from_u64(11)).expect("ok");
        let b = r.sample_means(&pop, &mut ChaCha8Rng::seed_from_u64(11)).expect("ok");
        assert_eq!(a, b);
    }

    /// Mean of sample means converges to the population mean.
    #[test]
    fn clt_mean_of_means() {
        let pop = normal_population(1500, 100.0, 5.0, 42);
        let pop_mean = descriptive::mean(&pop).expect("non-empty");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let dist = Resampler::new(40, 400).expect("valid").run(&pop, &mut rng).expect("ok");
        // SE of the mean of 400 means ≈ 5/√40/√400 ≈ 0.04
        assert!(
            (dist.mean_of_means - pop_mean).abs() < 0.25,
            "{} vs {}",
            dist.mean_of_means,
            pop_mean
        );
        let observed = dist.observed_std_error.expect("many repetitions");
        assert!(
            (observed - dist.expected_std_error).abs() < 0.3,
            "observed SE {observed} vs expected {}",
            dist.expected_std_error
        );
    }

    #[test]
    fn single_repetition_has_no_observed_spread() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let dist = Resampler::new(2, 1)
            .expect("valid")
            .run(&[1.0, 2.0, 3.0], &mut rng)
            .expect("ok");
        assert!(dist.observed_std_error.is_none());
    }
}
