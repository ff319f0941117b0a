//! Aggregations over a filtered set of result rows.
//!
//! Every function here is pure: it takes the selected rows, derives what it
//! needs (including the per-row pass flag) and returns a fresh table.

pub mod arrears;
pub mod averages;
pub mod departments;
pub mod grades;
pub mod student;
pub mod subjects;
pub mod types;
pub mod utility;

pub use arrears::arrear_distribution;
pub use averages::subject_averages;
pub use departments::department_pass_fail;
pub use grades::grade_distribution;
pub use student::{pass_fail_summary, student_status};
pub use subjects::subject_pass_fail;
