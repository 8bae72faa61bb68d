//! Seeded synthetic datasets.
//!
//! - [`manufacturing`]: part weights with batch, machine and shift columns
//! - [`university`]: exam marks, flat or normalized (students/subjects/marks)
//!
//! All generators take the random number generator by reference, so one
//! seeded generator drives a whole analysis run.

pub mod manufacturing;
pub mod university;

pub use manufacturing::{generate_parts, PartRecord, Shift};
pub use university::{generate_marks, Campus, Department, Layout, MarkRecord};
