//! Derived tables produced by the aggregation pipeline.
//!
//! Field renames are the column labels the chart layer reads.

use serde::Serialize;
use std::fmt;

use crate::table::Grade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn from_passed(passed: bool) -> Self {
        if passed { Status::Pass } else { Status::Fail }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => f.write_str("Pass"),
            Status::Fail => f.write_str("Fail"),
        }
    }
}

/// One student's overall result across every row in the selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStatus {
    #[serde(rename = "REGNO")]
    pub regno: String,
    #[serde(rename = "Pass")]
    pub passed: bool,
    #[serde(rename = "Status")]
    pub status: Status,
}

/// Student head-count for one outcome, with its share of all students.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassFailCount {
    #[serde(rename = "Status")]
    pub status: Status,
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectGradeCount {
    #[serde(rename = "SUBCODE")]
    pub subject_code: String,
    #[serde(rename = "GRADE")]
    pub grade: Grade,
    #[serde(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrearCount {
    #[serde(rename = "Subjects Failed")]
    pub subjects_failed: usize,
    #[serde(rename = "Student Count")]
    pub student_count: usize,
}

/// Mean marks for one subject. `None` when no cell in the column was numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAverage {
    #[serde(rename = "SUBJECT CODE")]
    pub subject_code: String,
    #[serde(rename = "INTERNAL")]
    pub internal: Option<f64>,
    #[serde(rename = "EXTERNAL")]
    pub external: Option<f64>,
    #[serde(rename = "TOTAL")]
    pub total: Option<f64>,
}

/// Row-level outcomes for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectPassFail {
    #[serde(rename = "SUBJECT CODE")]
    pub subject_code: String,
    #[serde(rename = "Fail")]
    pub fail: usize,
    #[serde(rename = "Pass")]
    pub pass: usize,
}

/// Student-level outcomes for one department code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentPassFail {
    #[serde(rename = "DEPNAME_SHORT")]
    pub department: String,
    #[serde(rename = "Pass")]
    pub pass: usize,
    #[serde(rename = "Fail")]
    pub fail: usize,
}
