//! Synthetic manufacturing parts.
//!
//! Each part gets a batch, a sequential part id, a normally distributed
//! weight, a machine and a shift. Columns are independent of each other.

use std::fmt;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::ManufacturingConfig;
use crate::error::{StatsError, StatsResult};

/// Production shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shift {
    Morning,
    Evening,
    Night,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Evening, Shift::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Evening => "Evening",
            Shift::Night => "Night",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One manufactured part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartRecord {
    pub batch_id: u32,
    pub part_id: u32,
    /// Weight in grams.
    pub weight: f64,
    pub machine_id: u32,
    pub shift: Shift,
}

/// Generates `config.parts` records.
///
/// Batch ids are uniform in `1..=batches`, machine ids uniform in
/// `1..=machines`, weights ~ N(`mean_weight`, `sigma`²), shifts uniform.
///
/// # Errors
///
/// `InvalidParameter` if the weight distribution cannot be built (σ not
/// positive/finite) or a categorical range is empty.
pub fn generate_parts<R>(config: &ManufacturingConfig, rng: &mut R) -> StatsResult<Vec<PartRecord>>
where
    R: Rng + ?Sized,
{
    if config.batches == 0 || config.machines == 0 {
        return Err(StatsError::invalid("batch and machine counts must be positive"));
    }
    let weight = Normal::new(config.mean_weight, config.sigma)
        .map_err(|e| StatsError::invalid(format!("weight distribution: {e}")))?;

    let parts = u32::try_from(config.parts)
        .map_err(|_| StatsError::invalid(format!("part count {} exceeds u32 ids", config.parts)))?;

    Ok((1..=parts)
        .map(|part_id| PartRecord {
            batch_id: rng.random_range(1..=config.batches),
            part_id,
            weight: weight.sample(&mut *rng),
            machine_id: rng.random_range(1..=config.machines),
            shift: Shift::ALL[rng.random_range(0..Shift::ALL.len())],
        })
        .collect())
}

/// The weight column.
pub fn weights(parts: &[PartRecord]) -> Vec<f64> {
    parts.iter().map(|p| p.weight).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptive;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generates_requested_shape() {
        let config = ManufacturingConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let parts = generate_parts(&config, &mut rng).expect("valid config");

        assert_eq!(parts.len(), 1500);
        for (i, p) in parts.iter().enumerate() {
            assert_eq!(p.part_id as usize, i + 1);
            assert!((1..=20).contains(&p.batch_id));
            assert!((1..=5).contains(&p.machine_id));
            assert!(p.weight.is_finite());
        }
        for shift in Shift::ALL {
            assert!(parts.iter().any(|p| p.shift == shift), "{shift} missing");
        }
    }

    /// Sample mean and std of the weights converge to the parameters.
    #[test]
    fn weights_match_distribution() {
        let config = ManufacturingConfig {
            parts: 20_000,
            ..ManufacturingConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let w = weights(&generate_parts(&config, &mut rng).expect("valid"));
        let mean = descriptive::mean(&w).expect("non-empty");
        let sd = descriptive::std_dev(&w).expect("n >= 2");
        // SE(mean) = 5 / √20000 ≈ 0.035
        assert!((mean - 100.0).abs() < 0.15, "mean = {mean}");
        assert!((sd - 5.0).abs() < 0.15, "sd = {sd}");
    }

    #[test]
    fn part_count_beyond_u32_ids_rejected() {
        let config = ManufacturingConfig {
            parts: u32::MAX as usize + 1,
            ..ManufacturingConfig::default()
        };
        let err = generate_parts(&config, &mut ChaCha8Rng::seed_from_u64(1)).expect_err("too many parts");
        assert!(matches!(err, StatsError::InvalidParameter(_)), "{err}");
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = ManufacturingConfig {
            parts: 50,
            ..ManufacturingConfig::default()
        };
        let a = generate_parts(&config, &mut ChaCha8Rng::seed_from_u64(1)).expect("valid");
        let b = generate_parts(&config, &mut ChaCha8Rng::seed_from_u64(1)).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_sigma() {
        let config = ManufacturingConfig {
            sigma: f64::NAN,
            ..ManufacturingConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(generate_parts(&config, &mut rng).is_err());
    }
}
