//! Synthetic university marks.
//!
//! Two layouts are supported:
//!
//! - [`Layout::Flat`]: one table of `(student, department, subject, marks)`
//!   rows where the department is drawn independently for every row.
//! - [`Layout::Normalized`]: separate `students`, `subjects` and `marks`
//!   tables linked by id. Each student belongs to one department and every
//!   student is marked in every subject. [`Campus::join`] flattens them with
//!   an in-memory inner hash join.
//!
//! Both layouts produce the same [`MarkRecord`] shape for analysis.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::UniversityConfig;
use crate::error::{StatsError, StatsResult};

/// Academic department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Department {
    Cse,
    Ece,
    Mech,
}

impl Department {
    pub const ALL: [Department; 3] = [Department::Cse, Department::Ece, Department::Mech];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Cse => "CSE",
            Department::Ece => "ECE",
            Department::Mech => "MECH",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Table layout used to synthesize marks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Flat,
    #[default]
    Normalized,
}

/// Subjects of the flat layout.
pub const FLAT_SUBJECTS: [&str; 5] = [
    "Data Structures",
    "Signals",
    "Thermodynamics",
    "Algorithms",
    "Microprocessors",
];

/// Subjects of the normalized layout with their owning department.
pub const CATALOG: [(&str, Department); 6] = [
    ("Data Structures", Department::Cse),
    ("Signals", Department::Ece),
    ("Thermodynamics", Department::Mech),
    ("Algorithms", Department::Cse),
    ("Microprocessors", Department::Ece),
    ("Machine Design", Department::Mech),
];

/// One mark, flattened for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkRecord {
    pub student_id: u32,
    pub name: String,
    pub department: Department,
    pub subject: String,
    pub marks: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub student_id: u32,
    pub name: String,
    pub department: Department,
    /// Year of study, `1..=4`.
    pub year: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub subject_id: u32,
    pub name: String,
    pub department: Department,
}

/// A row of the normalized `marks` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkRow {
    pub student_id: u32,
    pub subject_id: u32,
    pub marks: u32,
}

/// Normalized tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Campus {
    pub students: Vec<Student>,
    pub subjects: Vec<Subject>,
    pub marks: Vec<MarkRow>,
}

impl Campus {
    /// Inner join `students ⋈ marks ⋈ subjects`, in `marks` order.
    ///
    /// Mark rows pointing at an unknown student or subject are dropped.
    pub fn join(&self) -> Vec<MarkRecord> {
        let students: HashMap<u32, &Student> =
            self.students.iter().map(|s| (s.student_id, s)).collect();
        let subjects: HashMap<u32, &Subject> =
            self.subjects.iter().map(|s| (s.subject_id, s)).collect();

        let joined: Vec<MarkRecord> = self
            .marks
            .iter()
            .filter_map(|m| {
                let student = students.get(&m.student_id)?;
                let subject = subjects.get(&m.subject_id)?;
                Some(MarkRecord {
                    student_id: student.student_id,
                    name: student.name.clone(),
                    department: student.department,
                    subject: subject.name.clone(),
                    marks: m.marks,
                })
            })
            .collect();

        if joined.len() < self.marks.len() {
            debug!(
                dropped = self.marks.len() - joined.len(),
                "join dropped mark rows without a matching student or subject"
            );
        }
        joined
    }
}

fn student_name(id: u32) -> String {
    format!("Student_{id}")
}

fn check_range(config: &UniversityConfig) -> StatsResult<()> {
    if config.marks_low >= config.marks_high {
        return Err(StatsError::invalid(format!(
            "marks range [{}, {}) is empty",
            config.marks_low, config.marks_high
        )));
    }
    Ok(())
}

fn pick_department<R: Rng + ?Sized>(rng: &mut R) -> Department {
    Department::ALL[rng.random_range(0..Department::ALL.len())]
}

/// Flat layout: every student gets one mark per [`FLAT_SUBJECTS`] entry,
/// with a department drawn per row.
pub fn generate_flat<R>(config: &UniversityConfig, rng: &mut R) -> StatsResult<Vec<MarkRecord>>
where
    R: Rng + ?Sized,
{
    check_range(config)?;
    let mut records = Vec::with_capacity(config.students as usize * FLAT_SUBJECTS.len());
    for student_id in 1..=config.students {
        for subject in FLAT_SUBJECTS {
            records.push(MarkRecord {
                student_id,
                name: student_name(student_id),
                department: pick_department(rng),
                subject: subject.to_string(),
                marks: rng.random_range(config.marks_low..config.marks_high),
            });
        }
    }
    Ok(records)
}

/// Normalized layout: students with one department and a year, the
/// [`CATALOG`] of subjects, and a mark for every student × subject pair.
pub fn generate_campus<R>(config: &UniversityConfig, rng: &mut R) -> StatsResult<Campus>
where
    R: Rng + ?Sized,
{
    check_range(config)?;

    let students: Vec<Student> = (1..=config.students)
        .map(|student_id| Student {
            student_id,
            name: student_name(student_id),
            department: pick_department(rng),
            year: rng.random_range(1..=4),
        })
        .collect();

    let subjects: Vec<Subject> = CATALOG
        .iter()
        .zip(1..)
        .map(|(&(name, department), subject_id)| Subject {
            subject_id,
            name: name.to_string(),
            department,
        })
        .collect();

    let mut marks = Vec::with_capacity(students.len() * subjects.len());
    for student in &students {
        for subject in &subjects {
            marks.push(MarkRow {
                student_id: student.student_id,
                subject_id: subject.subject_id,
                marks: rng.random_range(config.marks_low..config.marks_high),
            });
        }
    }

    Ok(Campus {
        students,
        subjects,
        marks,
    })
}

/// Generates marks in the configured layout, flattened.
pub fn generate_marks<R>(config: &UniversityConfig, rng: &mut R) -> StatsResult<Vec<MarkRecord>>
where
    R: Rng + ?Sized,
{
    match config.layout {
        Layout::Flat => generate_flat(config, rng),
        Layout::Normalized => Ok(generate_campus(config, rng)?.join()),
    }
}

/// The marks column as `f64`.
pub fn marks(records: &[MarkRecord]) -> Vec<f64> {
    records.iter().map(|r| f64::from(r.marks)).collect()
}
