//! One render cycle: apply the selection, then run every aggregation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analyzers::types::{
    ArrearCount, DepartmentPassFail, PassFailCount, StudentStatus, SubjectAverage,
    SubjectGradeCount, SubjectPassFail,
};
use crate::analyzers::{
    arrear_distribution, department_pass_fail, grade_distribution, pass_fail_summary,
    student_status, subject_averages, subject_pass_fail,
};
use crate::config::InstitutionConfig;
use crate::error::DashboardError;
use crate::filter::{DepartmentSelector, Selection};
use crate::table::ResultTable;

/// Which page layout a selection renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Overall,
    OpenElective,
    Department,
}

impl View {
    pub fn of(selection: &Selection) -> Self {
        match selection.department {
            DepartmentSelector::Overall => View::Overall,
            DepartmentSelector::OpenElective => View::OpenElective,
            DepartmentSelector::Named(_) => View::Department,
        }
    }

    /// Panels shown for this view, top to bottom.
    pub fn panels(self) -> &'static [Panel] {
        match self {
            View::Overall => &[Panel::PassFail, Panel::DepartmentPassFail, Panel::Arrears],
            View::OpenElective => &[
                Panel::SubjectPassFail,
                Panel::SubjectAverages,
                Panel::GradeDistribution,
            ],
            View::Department => &[
                Panel::PassFail,
                Panel::SubjectPassFail,
                Panel::SubjectAverages,
                Panel::GradeDistribution,
                Panel::Arrears,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Panel {
    PassFail,
    DepartmentPassFail,
    Arrears,
    SubjectPassFail,
    SubjectAverages,
    GradeDistribution,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Panel::PassFail => "Pass/Fail Count",
            Panel::DepartmentPassFail => "Department-wise Pass/Fail Count",
            Panel::Arrears => "Semester-wise Arrear Count Distribution",
            Panel::SubjectPassFail => "Subject-wise Pass/Fail Count",
            Panel::SubjectAverages => "Average Marks per Subject",
            Panel::GradeDistribution => "Grade Distribution per Subject",
        }
    }

    /// File stem used when the panel's table is written to disk.
    pub fn slug(self) -> &'static str {
        match self {
            Panel::PassFail => "pass_fail",
            Panel::DepartmentPassFail => "department_pass_fail",
            Panel::Arrears => "arrears",
            Panel::SubjectPassFail => "subject_pass_fail",
            Panel::SubjectAverages => "subject_averages",
            Panel::GradeDistribution => "grade_distribution",
        }
    }
}

/// Every derived table for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub department: String,
    pub branch: String,
    pub semester: String,
    pub view: View,
    pub row_count: usize,
    pub students: Vec<StudentStatus>,
    pub pass_fail: Vec<PassFailCount>,
    pub department_pass_fail: Vec<DepartmentPassFail>,
    pub subject_pass_fail: Vec<SubjectPassFail>,
    pub subject_averages: Vec<SubjectAverage>,
    pub grade_distribution: Vec<SubjectGradeCount>,
    pub arrears: Vec<ArrearCount>,
}

impl DashboardReport {
    /// Filters `table` by `selection` and computes every aggregate.
    ///
    /// # Errors
    ///
    /// [`DashboardError::EmptyResult`] when the selection matches no rows;
    /// no aggregation runs in that case.
    #[tracing::instrument(skip_all, fields(department = %selection.department, semester = %selection.semester))]
    pub fn build(
        table: &ResultTable,
        selection: &Selection,
        config: &InstitutionConfig,
    ) -> Result<Self, DashboardError> {
        let rows = selection.apply(table, config)?;

        let students = student_status(&rows);
        let pass_fail = pass_fail_summary(&students);

        let report = DashboardReport {
            generated_at: Utc::now(),
            department: selection.department.to_string(),
            branch: selection.effective_branch().to_string(),
            semester: selection.semester.to_string(),
            view: View::of(selection),
            row_count: rows.len(),
            pass_fail,
            department_pass_fail: department_pass_fail(&rows, config),
            subject_pass_fail: subject_pass_fail(&rows),
            subject_averages: subject_averages(&rows),
            grade_distribution: grade_distribution(&rows),
            arrears: arrear_distribution(&rows),
            students,
        };

        info!(
            rows = report.row_count,
            students = report.students.len(),
            subjects = report.subject_pass_fail.len(),
            "Dashboard report built"
        );
        Ok(report)
    }

    pub fn panels(&self) -> &'static [Panel] {
        self.view.panels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::row;

    fn table() -> ResultTable {
        ResultTable::new(
            "UG",
            vec![
                row("AEROSPACE ENGINEERING", "1", "AE101", "O"),
                row("AEROSPACE ENGINEERING", "1", "AE102", "U"),
                row("AEROSPACE ENGINEERING", "2", "AE101", "A"),
            ],
        )
    }

    #[test]
    fn test_report_for_overall() {
        let config = InstitutionConfig::default();
        let report = DashboardReport::build(&table(), &Selection::default(), &config).unwrap();

        assert_eq!(report.view, View::Overall);
        assert_eq!(report.row_count, 3);
        assert_eq!(report.students.len(), 2);
        assert_eq!(report.pass_fail[0].count, 1);
        assert_eq!(report.pass_fail[1].count, 1);
        assert_eq!(report.department_pass_fail[0].department, "AERO");
        assert_eq!(report.grade_distribution.len(), 14);
        assert_eq!(report.arrears.len(), 1);
        assert_eq!(
            report.panels(),
            &[Panel::PassFail, Panel::DepartmentPassFail, Panel::Arrears]
        );
    }

    #[test]
    fn test_empty_selection_stops_pipeline() {
        let config = InstitutionConfig::default();
        let selection = Selection::new("Overall", "All", "7").unwrap();
        let err = DashboardReport::build(&table(), &selection, &config).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyResult { .. }));
    }

    #[test]
    fn test_rebuild_is_identical() {
        let config = InstitutionConfig::default();
        let table = table();
        let selection = Selection::new("AEROSPACE ENGINEERING", "All", "5").unwrap();

        let a = DashboardReport::build(&table, &selection, &config).unwrap();
        let b = DashboardReport::build(&table, &selection, &config).unwrap();
        assert_eq!(a.students, b.students);
        assert_eq!(a.pass_fail, b.pass_fail);
        assert_eq!(a.department_pass_fail, b.department_pass_fail);
        assert_eq!(a.subject_pass_fail, b.subject_pass_fail);
        assert_eq!(a.grade_distribution, b.grade_distribution);
        assert_eq!(a.subject_averages, b.subject_averages);
        assert_eq!(a.arrears, b.arrears);
        assert_eq!(a.view, View::Department);
        assert_eq!(a.panels().len(), 5);
    }

    #[test]
    fn test_panel_titles() {
        assert_eq!(Panel::Arrears.title(), "Semester-wise Arrear Count Distribution");
        assert_eq!(View::OpenElective.panels()[0].slug(), "subject_pass_fail");
    }
}
