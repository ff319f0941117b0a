use std::collections::{BTreeMap, HashMap};

use crate::analyzers::types::ArrearCount;
use crate::table::ResultRow;

/// Histogram of failed-subject counts over students with at least one arrear,
/// ordered by the number of subjects failed.
pub fn arrear_distribution(rows: &[&ResultRow]) -> Vec<ArrearCount> {
    let mut per_student: HashMap<&str, usize> = HashMap::new();
    for row in rows.iter().filter(|r| !r.passed()) {
        *per_student.entry(row.regno.as_str()).or_default() += 1;
    }

    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for failed in per_student.into_values() {
        *histogram.entry(failed).or_default() += 1;
    }

    histogram
        .into_iter()
        .map(|(subjects_failed, student_count)| ArrearCount {
            subjects_failed,
            student_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::row;

    #[test]
    fn test_single_arrear() {
        let rows = [
            row("AERO", "1", "AE101", "O"),
            row("AERO", "1", "AE102", "U"),
            row("AERO", "2", "AE101", "A"),
        ];
        let refs: Vec<_> = rows.iter().collect();
        assert_eq!(
            arrear_distribution(&refs),
            vec![ArrearCount {
                subjects_failed: 1,
                student_count: 1
            }]
        );
    }

    #[test]
    fn test_histogram_sorted_and_sums_to_failing_students() {
        let rows = [
            row("ECE", "1", "EC1", "U"),
            row("ECE", "1", "EC2", "U"),
            row("ECE", "1", "EC3", "U"),
            row("ECE", "2", "EC1", "U"),
            row("ECE", "3", "EC2", "U"),
            row("ECE", "4", "EC1", "B"),
        ];
        let refs: Vec<_> = rows.iter().collect();
        let dist = arrear_distribution(&refs);

        let pairs: Vec<_> = dist
            .iter()
            .map(|a| (a.subjects_failed, a.student_count))
            .collect();
        assert_eq!(pairs, vec![(1, 2), (3, 1)]);
        assert_eq!(dist.iter().map(|a| a.student_count).sum::<usize>(), 3);
    }

    #[test]
    fn test_no_failures_empty() {
        let rows = [row("ECE", "1", "EC1", "O")];
        let refs: Vec<_> = rows.iter().collect();
        assert!(arrear_distribution(&refs).is_empty());
    }
}
