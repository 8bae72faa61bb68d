//! Manufacturing part-weight analysis.

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::chart::TextHistogram;
use super::{optional_histogram, Flagged, HEAD};
use crate::config::ManufacturingConfig;
use crate::dataset::manufacturing::{generate_parts, weights, PartRecord};
use crate::descriptive::{self, Summary};
use crate::detection::{assess_stability, Stability, StabilityAssessment, ZScoreDetector};
use crate::error::StatsResult;
use crate::histogram::{histogram, Histogram};
use crate::normal::{expected_beyond, NormalModel};
use crate::sampling::{Resampler, SamplingDistribution};

/// Results of one manufacturing run.
#[derive(Debug, Clone)]
pub struct ManufacturingReport {
    pub head: Vec<PartRecord>,
    pub summary: Summary,
    /// The specified process N(mean_weight, sigma²), used for probabilities.
    pub process: NormalModel,
    /// Empirical mean with the process σ: the overlay and z-score reference.
    pub fitted: NormalModel,
    pub weight_histogram: Histogram,
    /// Fitted density at each weight-histogram bin center.
    pub overlay: Vec<f64>,
    /// Fitted density over `[min, max]` of the weights.
    pub curve: Vec<(f64, f64)>,
    /// `(x, P(X < x))`.
    pub below: (f64, f64),
    /// `(lo, hi, P(lo < X < hi))`.
    pub between: (f64, f64, f64),
    pub sampling: SamplingDistribution,
    pub sampling_histogram: Option<Histogram>,
    pub threshold: f64,
    pub defective: Vec<Flagged<PartRecord>>,
    /// Defects a normal process would produce beyond the threshold by chance.
    pub expected_defective: f64,
    pub stability: StabilityAssessment,
}

impl ManufacturingReport {
    /// Runs the analysis. The seed drives both synthesis and resampling.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_descriptive::config::ManufacturingConfig;
    /// use u_descriptive::report::ManufacturingReport;
    ///
    /// let report = ManufacturingReport::run(&ManufacturingConfig::default(), 42).unwrap();
    /// assert_eq!(report.summary.count, 1500);
    /// assert!((report.below.1 - 0.0228).abs() < 1e-3);
    /// ```
    pub fn run(config: &ManufacturingConfig, seed: u64) -> StatsResult<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        info!(parts = config.parts, seed, "generating manufacturing dataset");
        let parts = generate_parts(config, &mut rng)?;
        let w = weights(&parts);

        let summary = descriptive::summarize(&w)?;
        debug!(
            mean = summary.mean,
            median = summary.median,
            std_dev = summary.std_dev,
            "weight summary"
        );

        let process = NormalModel::new(config.mean_weight, config.sigma)?;
        let fitted = NormalModel::new(summary.mean, config.sigma)?;

        let weight_histogram = histogram(&w, config.histogram_bins)?;
        let overlay = weight_histogram
            .centers()
            .iter()
            .map(|&x| fitted.pdf(x))
            .collect();
        let curve = fitted.curve(summary.min, summary.max, config.curve_points)?;

        let below = (config.below, process.prob_below(config.below));
        let (lo, hi) = config.between;
        let between = (lo, hi, process.prob_between(lo, hi)?);

        info!(
            sample_size = config.clt_sample_size,
            repetitions = config.clt_repetitions,
            "resampling for the sampling distribution of the mean"
        );
        let sampling = Resampler::new(config.clt_sample_size, config.clt_repetitions)?
            .run(&w, &mut rng)?;
        let sampling_histogram = optional_histogram(&sampling.means, config.clt_bins)?;
        debug!(mean_of_means = sampling.mean_of_means, "sampling distribution");

        let detector = ZScoreDetector::new(fitted, config.anomaly_threshold)?;
        let defective: Vec<Flagged<PartRecord>> = detector
            .detect(&w)
            .into_iter()
            .map(|a| Flagged {
                record: parts[a.index].clone(),
                z: a.z,
            })
            .collect();
        let expected_defective = expected_beyond(config.anomaly_threshold, parts.len());

        let stability = assess_stability(defective.len(), parts.len(), config.stability_ratio)?;
        match stability.verdict {
            Stability::Stable => info!(defects = defective.len(), "process stable"),
            Stability::NeedsInvestigation => warn!(
                defects = defective.len(),
                ratio = stability.defect_ratio,
                "defect ratio at or above the stability limit"
            ),
        }

        Ok(Self {
            head: parts.iter().take(HEAD).cloned().collect(),
            summary,
            process,
            fitted,
            weight_histogram,
            overlay,
            curve,
            below,
            between,
            sampling,
            sampling_histogram,
            threshold: config.anomaly_threshold,
            defective,
            expected_defective,
            stability,
        })
    }

    /// Console rendering; `charts` toggles the text histograms.
    pub fn display(&self, charts: bool) -> impl fmt::Display + '_ {
        View {
            report: self,
            charts,
        }
    }
}

struct View<'a> {
    report: &'a ManufacturingReport,
    charts: bool,
}

fn write_parts(f: &mut fmt::Formatter<'_>, parts: &[PartRecord], z: Option<&[f64]>) -> fmt::Result {
    write!(f, "{:>8} {:>7} {:>9} {:>10} {:>8}", "batch_id", "part_id", "weight", "machine_id", "shift")?;
    if z.is_some() {
        write!(f, " {:>8}", "z_score")?;
    }
    writeln!(f)?;
    for (i, p) in parts.iter().enumerate() {
        write!(
            f,
            "{:>8} {:>7} {:>9.4} {:>10} {:>8}",
            p.batch_id, p.part_id, p.weight, p.machine_id, p.shift
        )?;
        if let Some(z) = z {
            write!(f, " {:>8.4}", z[i])?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;

        writeln!(f, "\nFirst {} Manufacturing Records:", r.head.len())?;
        write_parts(f, &r.head, None)?;

        writeln!(f, "\nMean: {:.2}", r.summary.mean)?;
        writeln!(f, "Median: {:.2}", r.summary.median)?;
        writeln!(f, "Std Dev: {:.2}", r.summary.std_dev)?;

        if self.charts {
            writeln!(f)?;
            let title = format!(
                "Histogram with Normal Curve (N({:.2}, {:.2}²), * = density)",
                r.fitted.mean(),
                r.fitted.sigma()
            );
            write!(
                f,
                "{}",
                TextHistogram::new(&title, &r.weight_histogram).with_overlay(&r.overlay)
            )?;
            if let Some((x, d)) = r
                .curve
                .iter()
                .copied()
                .fold(None, |best: Option<(f64, f64)>, p| match best {
                    Some(b) if b.1 >= p.1 => Some(b),
                    _ => Some(p),
                })
            {
                writeln!(f, "Curve peak: density {d:.4} at {x:.2} ({} points)", r.curve.len())?;
            }
        }

        writeln!(f, "\nP(weight < {}): {:.4}", r.below.0, r.below.1)?;
        writeln!(f, "P({} < weight < {}): {:.4}", r.between.0, r.between.1, r.between.2)?;

        if self.charts {
            if let Some(h) = &r.sampling_histogram {
                writeln!(f)?;
                write!(f, "{}", TextHistogram::new("Sampling Distribution (CLT)", h))?;
            }
        }
        writeln!(f, "\nMean of Sample Means: {:.2}", r.sampling.mean_of_means)?;
        if let Some(se) = r.sampling.observed_std_error {
            writeln!(
                f,
                "Std Error: {se:.3} observed, {:.3} expected",
                r.sampling.expected_std_error
            )?;
        }

        writeln!(f, "\nNumber of Defective Parts (|Z| > {}): {}", r.threshold, r.defective.len())?;
        writeln!(f, "Expected under normality: {:.1}", r.expected_defective)?;
        if !r.defective.is_empty() {
            writeln!(f, "\nSample Defective Parts:")?;
            let shown: Vec<&Flagged<PartRecord>> = r.defective.iter().take(HEAD).collect();
            let parts: Vec<PartRecord> = shown.iter().map(|d| d.record.clone()).collect();
            let z: Vec<f64> = shown.iter().map(|d| d.z).collect();
            write_parts(f, &parts, Some(&z))?;
        }

        writeln!(f, "\n{}", r.stability.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ManufacturingReport {
        ManufacturingReport::run(&ManufacturingConfig::default(), 42).expect("default run")
    }

    #[test]
    fn default_run_matches_process() {
        let r = report();
        assert_eq!(r.head.len(), HEAD);
        assert_eq!(r.summary.count, 1500);
        assert!((r.summary.mean - 100.0).abs() < 0.5, "mean = {}", r.summary.mean);
        assert!((r.summary.std_dev - 5.0).abs() < 0.4, "sd = {}", r.summary.std_dev);
        assert!((r.between.2 - 0.6827).abs() < 1e-3);
        assert_eq!(r.weight_histogram.n_bins(), 30);
        assert_eq!(r.overlay.len(), 30);
        assert_eq!(r.curve.len(), 100);
        assert_eq!(r.sampling.means.len(), 100);
        assert!((r.sampling.mean_of_means - r.summary.mean).abs() < 0.5);
    }

    #[test]
    fn defects_are_beyond_threshold() {
        let r = report();
        for d in &r.defective {
            assert!(d.z.abs() > r.threshold);
            let z = r.fitted.z(d.record.weight);
            assert!((z - d.z).abs() < 1e-12);
        }
        // ~18.6 expected; stay well inside sampling noise
        assert!(r.defective.len() < 45, "defects = {}", r.defective.len());
        assert_eq!(r.stability.defects, r.defective.len());
    }

    #[test]
    fn same_seed_same_report() {
        let a = report();
        let b = report();
        assert_eq!(a.head, b.head);
        assert_eq!(a.sampling.means, b.sampling.means);
        assert_eq!(a.defective, b.defective);
    }

    #[test]
    fn tight_threshold_needs_investigation() {
        let config = ManufacturingConfig {
            anomaly_threshold: 1.0,
            ..ManufacturingConfig::default()
        };
        let r = ManufacturingReport::run(&config, 1).expect("valid");
        assert_eq!(r.stability.verdict, Stability::NeedsInvestigation);
    }

    #[test]
    fn rendering_includes_sections() {
        let r = report();
        let text = r.display(true).to_string();
        assert!(text.contains("Mean:"));
        assert!(text.contains("P(weight < 90):"));
        assert!(text.contains("Mean of Sample Means:"));
        assert!(text.contains("Histogram with Normal Curve"));
        assert!(text.contains("Process"));

        let plain = r.display(false).to_string();
        assert!(!plain.contains("Histogram with Normal Curve"));
        assert!(!plain.contains("Sampling Distribution (CLT)"));
    }

    #[test]
    fn invalid_config_propagates() {
        let config = ManufacturingConfig {
            clt_sample_size: 2000,
            ..ManufacturingConfig::default()
        };
        assert!(ManufacturingReport::run(&config, 42).is_err());
    }
}
