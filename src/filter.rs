//! Department / branch / semester selection and the open-elective rule.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::config::InstitutionConfig;
use crate::error::DashboardError;
use crate::table::{ResultRow, ResultTable};

pub const OVERALL: &str = "Overall";
pub const OPEN_ELECTIVE: &str = "Others (Open Elective)";
pub const ALL_BRANCHES: &str = "All";

static ANY_BRANCH: BranchSelector = BranchSelector::All;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DepartmentSelector {
    #[default]
    Overall,
    OpenElective,
    Named(String),
}

impl FromStr for DepartmentSelector {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            OVERALL => DepartmentSelector::Overall,
            OPEN_ELECTIVE => DepartmentSelector::OpenElective,
            "" => return Err(DashboardError::Selection("empty department".into())),
            name => DepartmentSelector::Named(name.to_string()),
        })
    }
}

impl fmt::Display for DepartmentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartmentSelector::Overall => f.write_str(OVERALL),
            DepartmentSelector::OpenElective => f.write_str(OPEN_ELECTIVE),
            DepartmentSelector::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BranchSelector {
    #[default]
    All,
    Named(String),
}

impl FromStr for BranchSelector {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            ALL_BRANCHES => BranchSelector::All,
            "" => return Err(DashboardError::Selection("empty branch".into())),
            name => BranchSelector::Named(name.to_string()),
        })
    }
}

impl fmt::Display for BranchSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchSelector::All => f.write_str(ALL_BRANCHES),
            BranchSelector::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SemesterSelector {
    #[default]
    Overall,
    Semester(u32),
}

impl FromStr for SemesterSelector {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == OVERALL {
            return Ok(SemesterSelector::Overall);
        }
        s.parse::<u32>()
            .map(SemesterSelector::Semester)
            .map_err(|_| DashboardError::Selection(format!("unknown semester '{s}'")))
    }
}

impl fmt::Display for SemesterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemesterSelector::Overall => f.write_str(OVERALL),
            SemesterSelector::Semester(n) => write!(f, "{n}"),
        }
    }
}

/// The three selector values driving one render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub department: DepartmentSelector,
    pub branch: BranchSelector,
    pub semester: SemesterSelector,
}

impl Selection {
    pub fn new(department: &str, branch: &str, semester: &str) -> Result<Self, DashboardError> {
        Ok(Self {
            department: department.parse()?,
            branch: branch.parse()?,
            semester: semester.parse()?,
        })
    }

    /// The branch actually in effect; only a named department narrows by branch.
    pub fn effective_branch(&self) -> &BranchSelector {
        match self.department {
            DepartmentSelector::Named(_) => &self.branch,
            _ => &ANY_BRANCH,
        }
    }

    /// Returns the rows matching this selection, in table order.
    ///
    /// # Errors
    ///
    /// [`DashboardError::EmptyResult`] when nothing matches.
    pub fn apply<'a>(
        &self,
        table: &'a ResultTable,
        config: &InstitutionConfig,
    ) -> Result<Vec<&'a ResultRow>, DashboardError> {
        let branch = self.effective_branch();

        let rows: Vec<&ResultRow> = table
            .rows()
            .iter()
            .filter(|r| match &self.department {
                DepartmentSelector::Overall => true,
                DepartmentSelector::OpenElective => is_open_elective(&r.subject_code, config),
                DepartmentSelector::Named(name) => &r.department == name,
            })
            .filter(|r| match branch {
                BranchSelector::All => true,
                BranchSelector::Named(name) => &r.branch == name,
            })
            .filter(|r| match self.semester {
                SemesterSelector::Overall => true,
                SemesterSelector::Semester(n) => r.semester == Some(n),
            })
            .collect();

        debug!(
            department = %self.department,
            branch = %branch,
            semester = %self.semester,
            matched = rows.len(),
            "Selection applied"
        );

        if rows.is_empty() {
            return Err(DashboardError::empty_result(
                &self.department,
                branch,
                self.semester,
            ));
        }
        Ok(rows)
    }
}

/// A subject is an open elective when no department owns its prefix, or
/// when it is listed as a supplementary elective.
pub fn is_open_elective(code: &str, config: &InstitutionConfig) -> bool {
    !config.owned_prefixes().any(|p| code.starts_with(p)) || config.is_listed_elective(code)
}

/// Choices offered by the department, branch and semester selectors.
#[derive(Debug, Clone, Serialize)]
pub struct SelectorOptions {
    pub departments: Vec<String>,
    pub branches: Vec<(String, Vec<String>)>,
    pub semesters: Vec<String>,
}

impl SelectorOptions {
    pub fn from_table(table: &ResultTable, config: &InstitutionConfig) -> Self {
        let names = table.departments();

        let branches = names
            .iter()
            .map(|d| {
                let mut opts = vec![ALL_BRANCHES.to_string()];
                opts.extend(table.branches(d));
                (d.clone(), opts)
            })
            .collect();

        let mut departments = vec![OVERALL.to_string(), OPEN_ELECTIVE.to_string()];
        departments.extend(names);

        let mut semesters = vec![OVERALL.to_string()];
        semesters.extend(config.semesters.iter().map(u32::to_string));

        Self {
            departments,
            branches,
            semesters,
        }
    }
}
