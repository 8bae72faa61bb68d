//! University marks analysis.

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::chart::TextHistogram;
use super::{optional_histogram, Flagged, HEAD};
use crate::config::UniversityConfig;
use crate::dataset::university::{generate_marks, marks, Department, Layout, MarkRecord};
use crate::detection::{share_above, PercentileSelector, TopSelection, ZScoreDetector};
use crate::error::StatsResult;
use crate::grouping::{best_by_mean, group_values, max_variation, summarize_groups, GroupSummary};
use crate::histogram::Histogram;
use crate::normal::NormalModel;

/// `(student_id, name)`.
pub type StudentKey = (u32, String);

/// Results of one university run.
#[derive(Debug, Clone)]
pub struct UniversityReport {
    pub layout: Layout,
    pub head: Vec<MarkRecord>,
    pub departments: Vec<GroupSummary<Department>>,
    pub best_department: Option<Department>,
    pub max_variation: Option<Department>,
    pub subjects: Vec<GroupSummary<String>>,
    pub top_percentile: f64,
    pub top_students: TopSelection<StudentKey>,
    /// Overall mean and sample σ of all marks.
    pub overall: NormalModel,
    pub threshold: f64,
    pub abnormal: Vec<Flagged<MarkRecord>>,
    pub band_sigmas: f64,
    /// `mean + band_sigmas · σ`.
    pub band_cutoff: f64,
    /// Percentage of marks strictly above [`Self::band_cutoff`].
    pub share_above_band: f64,
    pub marks_histogram: Option<Histogram>,
}

impl UniversityReport {
    /// Runs the analysis for the configured layout.
    pub fn run(config: &UniversityConfig, seed: u64) -> StatsResult<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        info!(students = config.students, layout = ?config.layout, seed, "generating marks");
        let records = generate_marks(config, &mut rng)?;
        let m = marks(&records);

        let departments = summarize_groups(&group_values(
            records.iter().map(|r| (r.department, f64::from(r.marks))),
        ))?;
        for d in departments.iter().filter(|d| d.std_dev.is_none()) {
            warn!(department = %d.key, count = d.count, "department too small for a spread estimate");
        }
        let best_department = best_by_mean(&departments).map(|g| g.key);
        let widest = max_variation(&departments).map(|g| g.key);
        debug!(best = ?best_department, widest = ?widest, "department comparison");

        let mut subjects = summarize_groups(&group_values(
            records.iter().map(|r| (r.subject.clone(), f64::from(r.marks))),
        ))?;
        in_first_seen_order(&mut subjects, records.iter().map(|r| r.subject.as_str()));

        let student_means: Vec<(StudentKey, f64)> = summarize_groups(&group_values(
            records
                .iter()
                .map(|r| ((r.student_id, r.name.clone()), f64::from(r.marks))),
        ))?
        .into_iter()
        .map(|g| (g.key, g.mean))
        .collect();
        let top_students = PercentileSelector::new(config.top_percentile)?.select(&student_means)?;
        debug!(
            threshold = top_students.threshold,
            selected = top_students.selected.len(),
            "top students"
        );

        let detector = ZScoreDetector::from_sample(&m, config.anomaly_threshold)?;
        let overall = *detector.reference();
        let abnormal: Vec<Flagged<MarkRecord>> = detector
            .detect(&m)
            .into_iter()
            .map(|a| Flagged {
                record: records[a.index].clone(),
                z: a.z,
            })
            .collect();
        info!(abnormal = abnormal.len(), threshold = config.anomaly_threshold, "z-score scan");

        let band_cutoff = overall.mean() + config.band_sigmas * overall.sigma();
        let share_above_band = share_above(&m, band_cutoff)?;

        Ok(Self {
            layout: config.layout,
            head: records.iter().take(HEAD).cloned().collect(),
            departments,
            best_department,
            max_variation: widest,
            subjects,
            top_percentile: config.top_percentile,
            top_students,
            overall,
            threshold: config.anomaly_threshold,
            abnormal,
            band_sigmas: config.band_sigmas,
            band_cutoff,
            share_above_band,
            marks_histogram: optional_histogram(&m, config.histogram_bins)?,
        })
    }

    /// Console rendering; `charts` toggles the marks histogram.
    pub fn display(&self, charts: bool) -> impl fmt::Display + '_ {
        View {
            report: self,
            charts,
        }
    }
}

/// Reorders summaries by where their key first occurs in `keys`.
fn in_first_seen_order<'k>(summaries: &mut [GroupSummary<String>], keys: impl Iterator<Item = &'k str>) {
    let mut seen: Vec<&str> = Vec::new();
    for key in keys {
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    summaries.sort_by_key(|g| seen.iter().position(|k| *k == g.key).unwrap_or(usize::MAX));
}

struct View<'a> {
    report: &'a UniversityReport,
    charts: bool,
}

fn write_marks(f: &mut fmt::Formatter<'_>, rows: &[MarkRecord], z: Option<&[f64]>) -> fmt::Result {
    write!(
        f,
        "{:>10} {:<12} {:<10} {:<16} {:>5}",
        "student_id", "name", "department", "subject", "marks"
    )?;
    if z.is_some() {
        write!(f, " {:>8}", "z_score")?;
    }
    writeln!(f)?;
    for (i, r) in rows.iter().enumerate() {
        write!(
            f,
            "{:>10} {:<12} {:<10} {:<16} {:>5}",
            r.student_id, r.name, r.department, r.subject, r.marks
        )?;
        if let Some(z) = z {
            write!(f, " {:>8.4}", z[i])?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn or_na(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;

        let layout = match r.layout {
            Layout::Flat => "flat",
            Layout::Normalized => "joined",
        };
        writeln!(f, "\nSample University Data ({layout}):")?;
        write_marks(f, &r.head, None)?;

        writeln!(f, "\nDepartment Mean Marks:")?;
        for d in &r.departments {
            writeln!(f, "{:<6} {:.2}", d.key, d.mean)?;
        }
        if let Some(best) = r.best_department {
            writeln!(f, "\nBest Performing Department: {best}")?;
        }

        writeln!(f, "\nDepartment Standard Deviation:")?;
        for d in &r.departments {
            writeln!(f, "{:<6} {}", d.key, or_na(d.std_dev))?;
        }
        if let Some(widest) = r.max_variation {
            writeln!(f, "\nDepartment with Maximum Variation: {widest}")?;
        }

        writeln!(f, "\nSkewness by Subject:")?;
        for s in &r.subjects {
            writeln!(f, "{} : {}", s.key, or_na(s.skewness))?;
        }

        writeln!(
            f,
            "\nTop {:.0}% Students (average >= {:.2}):",
            100.0 - r.top_percentile,
            r.top_students.threshold
        )?;
        writeln!(f, "{:>10} {:<12} {:>7}", "student_id", "name", "marks")?;
        for ((id, name), avg) in &r.top_students.selected {
            writeln!(f, "{id:>10} {name:<12} {avg:>7.2}")?;
        }

        writeln!(f, "\nAbnormal Performances (|Z| > {}): {}", r.threshold, r.abnormal.len())?;
        if !r.abnormal.is_empty() {
            let rows: Vec<MarkRecord> = r.abnormal.iter().map(|a| a.record.clone()).collect();
            let z: Vec<f64> = r.abnormal.iter().map(|a| a.z).collect();
            write_marks(f, &rows, Some(&z))?;
        }

        writeln!(
            f,
            "\nPercentage Above {} Standard Deviation: {:.2} %",
            r.band_sigmas, r.share_above_band
        )?;

        if self.charts {
            if let Some(h) = &r.marks_histogram {
                writeln!(f)?;
                write!(f, "{}", TextHistogram::new("Overall Marks Distribution", h))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::university::{CATALOG, FLAT_SUBJECTS};
    use crate::descriptive;

    fn report(layout: Layout) -> UniversityReport {
        let config = UniversityConfig {
            layout,
            ..UniversityConfig::default()
        };
        UniversityReport::run(&config, 42).expect("default run")
    }

    fn marks_of(r: &UniversityReport) -> Vec<f64> {
        let config = UniversityConfig {
            layout: r.layout,
            ..UniversityConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        marks(&generate_marks(&config, &mut rng).expect("valid"))
    }

    #[test]
    fn normalized_run_shape() {
        let r = report(Layout::Normalized);
        assert_eq!(r.head.len(), HEAD);
        assert_eq!(r.departments.len(), 3);
        let names: Vec<&str> = r.subjects.iter().map(|g| g.key.as_str()).collect();
        let catalog: Vec<&str> = CATALOG.iter().map(|&(name, _)| name).collect();
        assert_eq!(names, catalog);
        assert!(r.best_department.is_some());
        assert!(r.max_variation.is_some());
        // 100 students: roughly 5 at or above the 95th percentile
        let n = r.top_students.selected.len();
        assert!((5..=7).contains(&n), "top students = {n}");
    }

    #[test]
    fn flat_run_shape() {
        let r = report(Layout::Flat);
        let names: Vec<&str> = r.subjects.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(names, FLAT_SUBJECTS.to_vec());
        let total: usize = r.departments.iter().map(|d| d.count).sum();
        assert_eq!(total, 500);
    }

    #[test]
    fn best_department_has_highest_mean() {
        let r = report(Layout::Normalized);
        let best = r.best_department.expect("departments present");
        let best_mean = r
            .departments
            .iter()
            .find(|d| d.key == best)
            .expect("present")
            .mean;
        assert!(r.departments.iter().all(|d| d.mean <= best_mean));
    }

    #[test]
    fn abnormal_marks_are_beyond_threshold() {
        let r = report(Layout::Flat);
        for a in &r.abnormal {
            assert!(a.z.abs() > r.threshold);
            let z = r.overall.z(f64::from(a.record.marks));
            assert!((z - a.z).abs() < 1e-12);
        }
    }

    #[test]
    fn band_share_is_consistent() {
        let r = report(Layout::Normalized);
        // Uniform marks on [40, 100): about 1 - (0.5 + 1/√12) ≈ 21% lie above mean + σ
        assert!(
            (10.0..35.0).contains(&r.share_above_band),
            "share = {}",
            r.share_above_band
        );
        let expected = r.overall.mean() + r.overall.sigma();
        assert!((r.band_cutoff - expected).abs() < 1e-12);
    }

    #[test]
    fn department_means_pool_to_overall() {
        let r = report(Layout::Flat);
        let pooled = crate::grouping::weighted_mean(&r.departments).expect("non-empty");
        let overall = descriptive::mean(&marks_of(&r)).expect("non-empty");
        assert!((pooled - r.overall.mean()).abs() < 1e-9);
        assert!((overall - r.overall.mean()).abs() < 1e-9);
    }

    #[test]
    fn skewness_rows_follow_catalog_order() {
        let text = report(Layout::Normalized).display(false).to_string();
        let at = |name: &str| text.find(&format!("{name} : ")).expect("subject row");
        assert!(at("Data Structures") < at("Signals"));
        assert!(at("Thermodynamics") < at("Algorithms"));
        assert!(at("Microprocessors") < at("Machine Design"));
    }

    #[test]
    fn rendering_includes_sections() {
        let r = report(Layout::Normalized);
        let text = r.display(true).to_string();
        for section in [
            "Department Mean Marks:",
            "Best Performing Department:",
            "Department with Maximum Variation:",
            "Skewness by Subject:",
            "Top 5% Students",
            "Abnormal Performances (|Z| > 2):",
            "Percentage Above 1 Standard Deviation:",
            "Overall Marks Distribution",
        ] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(!r.display(false).to_string().contains("Overall Marks Distribution"));
    }
}
