use std::collections::BTreeMap;

use crate::analyzers::types::SubjectPassFail;
use crate::table::ResultRow;

/// Row-level pass and fail counts per subject, sorted by subject code.
/// Both counts are always present, zero included.
pub fn subject_pass_fail(rows: &[&ResultRow]) -> Vec<SubjectPassFail> {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for row in rows {
        let (fail, pass) = counts.entry(row.subject_code.as_str()).or_default();
        if row.passed() {
            *pass += 1;
        } else {
            *fail += 1;
        }
    }

    counts
        .into_iter()
        .map(|(code, (fail, pass))| SubjectPassFail {
            subject_code: code.to_string(),
            fail,
            pass,
        })
        .collect()
}
