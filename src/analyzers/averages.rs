use std::collections::BTreeMap;

use crate::analyzers::types::SubjectAverage;
use crate::analyzers::utility::mean;
use crate::table::{ResultRow, parse_mark};

/// Mean internal, external and total marks per subject, sorted by subject
/// code. Non-numeric cells are left out of the mean rather than counted as
/// zero.
pub fn subject_averages(rows: &[&ResultRow]) -> Vec<SubjectAverage> {
    let mut by_subject: BTreeMap<&str, Vec<&ResultRow>> = BTreeMap::new();
    for row in rows {
        by_subject
            .entry(row.subject_code.as_str())
            .or_default()
            .push(*row);
    }

    by_subject
        .into_iter()
        .map(|(code, rows)| SubjectAverage {
            subject_code: code.to_string(),
            internal: mean(rows.iter().map(|r| parse_mark(&r.internal_mark))),
            external: mean(rows.iter().map(|r| parse_mark(&r.external_mark))),
            total: mean(rows.iter().map(|r| parse_mark(&r.total_mark))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::row;

    #[test]
    fn test_non_numeric_marks_excluded() {
        let mut rows = vec![
            row("IT", "1", "IT502", "A"),
            row("IT", "2", "IT501", "B"),
            row("IT", "3", "IT501", "U"),
        ];
        rows[1].internal_mark = "40".into();
        rows[1].external_mark = "60".into();
        rows[1].total_mark = "100".into();
        rows[2].internal_mark = "20".into();
        rows[2].external_mark = "AB".into();
        rows[2].total_mark = "20".into();
        let refs: Vec<_> = rows.iter().collect();

        let avgs = subject_averages(&refs);
        assert_eq!(avgs.len(), 2);
        assert_eq!(avgs[0].subject_code, "IT501");
        assert_eq!(avgs[0].internal, Some(30.0));
        assert_eq!(avgs[0].external, Some(60.0));
        assert_eq!(avgs[0].total, Some(60.0));
        assert_eq!(avgs[1].subject_code, "IT502");
        assert_eq!(avgs[1].total, Some(80.0));
    }

    #[test]
    fn test_all_missing_is_none() {
        let mut rows = vec![row("IT", "1", "IT501", "U")];
        rows[0].external_mark = "AB".into();
        let refs: Vec<_> = rows.iter().collect();

        let avgs = subject_averages(&refs);
        assert_eq!(avgs[0].external, None);
        assert_eq!(avgs[0].internal, Some(30.0));
    }
}
