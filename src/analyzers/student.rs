use std::collections::BTreeMap;

use crate::analyzers::types::{PassFailCount, Status, StudentStatus};
use crate::analyzers::utility::pct;
use crate::table::ResultRow;

/// A student passes only if none of their rows carries grade `U`.
///
/// One entry per distinct registration id, sorted by id: numerically when
/// every id is a number, as text otherwise.
pub fn student_status(rows: &[&ResultRow]) -> Vec<StudentStatus> {
    let mut students: BTreeMap<&str, bool> = BTreeMap::new();
    for row in rows {
        let passed = students.entry(row.regno.as_str()).or_insert(true);
        *passed &= row.passed();
    }

    let mut statuses: Vec<StudentStatus> = students
        .into_iter()
        .map(|(regno, passed)| StudentStatus {
            regno: regno.to_string(),
            passed,
            status: Status::from_passed(passed),
        })
        .collect();

    let numeric: Option<Vec<u64>> = statuses.iter().map(|s| s.regno.trim().parse().ok()).collect();
    if let Some(ids) = numeric {
        let mut keyed: Vec<_> = ids.into_iter().zip(statuses).collect();
        keyed.sort_by_key(|(id, _)| *id);
        statuses = keyed.into_iter().map(|(_, s)| s).collect();
    }
    statuses
}

/// Pass and Fail head-counts, always both present and in that order.
pub fn pass_fail_summary(students: &[StudentStatus]) -> Vec<PassFailCount> {
    let total = students.len();
    let pass = students.iter().filter(|s| s.passed).count();

    [(Status::Pass, pass), (Status::Fail, total - pass)]
        .into_iter()
        .map(|(status, count)| PassFailCount {
            status,
            count,
            percentage: pct(count, total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::row;

    #[test]
    fn test_any_failed_row_fails_student() {
        let rows = [
            row("AERO", "1", "AE101", "O"),
            row("AERO", "1", "AE102", "U"),
            row("AERO", "2", "AE101", "A"),
        ];
        let refs: Vec<_> = rows.iter().collect();

        let statuses = student_status(&refs);
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].regno, "1");
        assert_eq!(statuses[0].status, Status::Fail);
        assert!(!statuses[0].passed);
        assert_eq!(statuses[1].regno, "2");
        assert_eq!(statuses[1].status, Status::Pass);
    }

    #[test]
    fn test_numeric_ids_sort_numerically() {
        let rows = [
            row("AERO", "10", "AE101", "O"),
            row("AERO", "9", "AE101", "U"),
            row("AERO", "100", "AE101", "A"),
        ];
        let refs: Vec<_> = rows.iter().collect();

        let ids: Vec<_> = student_status(&refs).into_iter().map(|s| s.regno).collect();
        assert_eq!(ids, vec!["9", "10", "100"]);
    }

    #[test]
    fn test_mixed_ids_sort_as_text() {
        let rows = [
            row("AERO", "10", "AE101", "O"),
            row("AERO", "9", "AE101", "O"),
            row("AERO", "LE-01", "AE101", "O"),
        ];
        let refs: Vec<_> = rows.iter().collect();

        let ids: Vec<_> = student_status(&refs).into_iter().map(|s| s.regno).collect();
        assert_eq!(ids, vec!["10", "9", "LE-01"]);
    }

    #[test]
    fn test_no_rows_no_students() {
        assert!(student_status(&[]).is_empty());
    }

    #[test]
    fn test_summary_has_both_outcomes() {
        let rows = [row("AERO", "1", "AE101", "O"), row("AERO", "2", "AE101", "B")];
        let refs: Vec<_> = rows.iter().collect();
        let summary = pass_fail_summary(&student_status(&refs));

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].status, Status::Pass);
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[0].percentage, 100.0);
        assert_eq!(summary[1].status, Status::Fail);
        assert_eq!(summary[1].count, 0);
        assert_eq!(summary[1].percentage, 0.0);
    }

    #[test]
    fn test_summary_of_nobody() {
        let summary = pass_fail_summary(&[]);
        assert!(summary.iter().all(|c| c.count == 0 && c.percentage == 0.0));
    }
}
