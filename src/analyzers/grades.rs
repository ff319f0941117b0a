use std::collections::HashMap;

use crate::analyzers::types::SubjectGradeCount;
use crate::table::{Grade, ResultRow};

/// Counts rows per (subject, grade), densified so every subject carries all
/// seven grades in [`Grade::ORDER`].
///
/// Subjects appear in the order they are first seen. Grade text outside the
/// fixed set is not counted.
pub fn grade_distribution(rows: &[&ResultRow]) -> Vec<SubjectGradeCount> {
    let mut subjects: Vec<&str> = Vec::new();
    let mut counts: HashMap<(&str, Grade), usize> = HashMap::new();

    for row in rows {
        let code = row.subject_code.as_str();
        if !subjects.contains(&code) {
            subjects.push(code);
        }
        if let Some(grade) = row.grade() {
            *counts.entry((code, grade)).or_default() += 1;
        }
    }

    let counts = &counts;
    subjects
        .into_iter()
        .flat_map(|code| {
            Grade::ORDER.iter().map(move |&grade| SubjectGradeCount {
                subject_code: code.to_string(),
                grade,
                count: counts.get(&(code, grade)).copied().unwrap_or(0),
            })
        })
        .collect()
}
