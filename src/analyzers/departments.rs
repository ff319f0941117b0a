use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::analyzers::student::student_status;
use crate::analyzers::types::DepartmentPassFail;
use crate::config::{InstitutionConfig, UnmappedDepartmentPolicy};
use crate::table::ResultRow;

/// Student-level pass and fail counts per short department code.
///
/// Each student is attributed to the department on their first row. A
/// student whose rows name several departments stays with the first one.
/// Department names without an abbreviation follow
/// [`InstitutionConfig::unmapped_department`].
pub fn department_pass_fail(
    rows: &[&ResultRow],
    config: &InstitutionConfig,
) -> Vec<DepartmentPassFail> {
    let mut home: HashMap<&str, &str> = HashMap::new();
    let mut conflicting = 0usize;
    for row in rows {
        let department = *home
            .entry(row.regno.as_str())
            .or_insert(row.department.as_str());
        if department != row.department {
            conflicting += 1;
        }
    }
    if conflicting > 0 {
        warn!(
            rows = conflicting,
            "Students span several departments; using each student's first department"
        );
    }

    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut excluded = 0usize;
    for student in student_status(rows) {
        let Some(department) = home.get(student.regno.as_str()) else {
            continue;
        };
        let code = match (config.abbreviation(department), config.unmapped_department) {
            (Some(code), _) => code.to_string(),
            (None, UnmappedDepartmentPolicy::PassThrough) => department.to_string(),
            (None, UnmappedDepartmentPolicy::Exclude) => {
                excluded += 1;
                continue;
            }
        };

        let (pass, fail) = counts.entry(code).or_default();
        if student.passed {
            *pass += 1;
        } else {
            *fail += 1;
        }
    }
    if excluded > 0 {
        warn!(
            students = excluded,
            "Students in departments without an abbreviation were left out"
        );
    }

    counts
        .into_iter()
        .map(|(department, (pass, fail))| DepartmentPassFail {
            department,
            pass,
            fail,
        })
        .collect()
}
