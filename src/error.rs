//! Error taxonomy for loading, validating and filtering result sheets.
//!
//! Every variant is terminal for the current render: nothing downstream is
//! computed once one of these is returned.

use std::fmt::Display;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The payload could not be read as a workbook or CSV file.
    #[error("Error loading file: {source}")]
    Load {
        #[source]
        source: BoxError,
    },

    /// One or more required columns are absent from the header row.
    #[error("Excel file is missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// The selected department/branch/semester matched no rows.
    #[error("No data available for {department} - {branch} in Semester {semester}")]
    EmptyResult {
        department: String,
        branch: String,
        semester: String,
    },

    /// A selector string could not be interpreted.
    #[error("Invalid selection: {0}")]
    Selection(String),

    /// The institutional configuration file is unreadable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn load(source: impl Into<BoxError>) -> Self {
        DashboardError::Load {
            source: source.into(),
        }
    }

    pub fn empty_result(
        department: impl Display,
        branch: impl Display,
        semester: impl Display,
    ) -> Self {
        DashboardError::EmptyResult {
            department: department.to_string(),
            branch: branch.to_string(),
            semester: semester.to_string(),
        }
    }
}
