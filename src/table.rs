//! Row model for the student result sheet.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Header names every result sheet must carry, in projection order.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "DEPNAME", "BRNAME", "SEM", "REGNO", "SUBCODE", "SUBTYPE", "SESMARK", "ESEM", "TOTMARK",
    "GRADE",
];

/// Letter grade. `U` is the only failing grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "O")]
    O,
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "U")]
    U,
}

impl Grade {
    pub const ORDER: [Grade; 7] = [
        Grade::O,
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::C,
        Grade::U,
    ];

    pub fn parse(s: &str) -> Option<Grade> {
        match s.trim() {
            "O" => Some(Grade::O),
            "A+" => Some(Grade::APlus),
            "A" => Some(Grade::A),
            "B+" => Some(Grade::BPlus),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "U" => Some(Grade::U),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::O => "O",
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::U => "U",
        }
    }

    pub fn is_fail(self) -> bool {
        self == Grade::U
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student-subject result record.
///
/// Mark columns keep the sheet's raw text; numeric coercion happens where
/// the marks are averaged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "DEPNAME")]
    pub department: String,
    #[serde(rename = "BRNAME")]
    pub branch: String,
    #[serde(rename = "SEM")]
    pub semester: Option<u32>,
    #[serde(rename = "REGNO")]
    pub regno: String,
    #[serde(rename = "SUBCODE")]
    pub subject_code: String,
    #[serde(rename = "SUBTYPE")]
    pub subject_type: String,
    #[serde(rename = "SESMARK")]
    pub internal_mark: String,
    #[serde(rename = "ESEM")]
    pub external_mark: String,
    #[serde(rename = "TOTMARK")]
    pub total_mark: String,
    #[serde(rename = "GRADE")]
    pub grade: String,
}

impl ResultRow {
    /// Builds a row from cells already projected into [`REQUIRED_COLUMNS`] order.
    pub fn from_cells(cells: [String; 10]) -> Self {
        let [
            department,
            branch,
            semester,
            regno,
            subject_code,
            subject_type,
            internal_mark,
            external_mark,
            total_mark,
            grade,
        ] = cells.map(|c| c.trim().to_string());

        ResultRow {
            department,
            branch,
            semester: parse_semester(&semester),
            regno,
            subject_code,
            subject_type,
            internal_mark,
            external_mark,
            total_mark,
            grade,
        }
    }

    /// Row-level pass flag: anything other than grade `U` passes.
    pub fn passed(&self) -> bool {
        self.grade != Grade::U.as_str()
    }

    pub fn grade(&self) -> Option<Grade> {
        Grade::parse(&self.grade)
    }
}

fn parse_semester(text: &str) -> Option<u32> {
    if let Ok(n) = text.parse::<u32>() {
        return Some(n);
    }
    // Workbooks sometimes store integers as "5.0".
    match text.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => Some(f as u32),
        _ => None,
    }
}

/// Parses a mark cell, returning `None` for anything non-numeric.
pub fn parse_mark(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A validated result sheet, restricted to the required columns.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    sheet: String,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(sheet: impl Into<String>, rows: Vec<ResultRow>) -> Self {
        Self {
            sheet: sheet.into(),
            rows,
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct department names, sorted.
    pub fn departments(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.department.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct branch names within `department`, sorted.
    pub fn branches(&self, department: &str) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| r.department == department)
            .map(|r| r.branch.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
