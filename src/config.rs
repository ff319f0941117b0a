use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DashboardError;

/// What to do with a department whose full name has no abbreviation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedDepartmentPolicy {
    /// Use the raw department name as its code.
    #[default]
    PassThrough,
    /// Leave the department's students out of the department chart.
    Exclude,
}

/// Institution-specific lookup tables consumed by the filters and
/// aggregations.
///
/// Stored as a JSON object on disk; every field is optional and falls back
/// to [`InstitutionConfig::default`]:
/// ```json
/// {
///   "sheet_name": "UG",
///   "department_abbreviations": { "INFORMATION TECHNOLOGY": "IT" },
///   "department_prefixes": { "Information Tech": "IT" },
///   "elective_codes": { "IT": ["HU5174", "EC5797"] },
///   "semesters": [5, 7],
///   "unmapped_department": "pass_through"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionConfig {
    pub sheet_name: String,
    /// Full department name -> short chart label.
    pub department_abbreviations: BTreeMap<String, String>,
    /// Department -> subject-code prefix it owns.
    pub department_prefixes: BTreeMap<String, String>,
    /// Department -> extra subject codes counted as open electives.
    pub elective_codes: BTreeMap<String, Vec<String>>,
    pub semesters: Vec<u32>,
    pub unmapped_department: UnmappedDepartmentPolicy,
}

impl InstitutionConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self, DashboardError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{path}: {e}")))?;
        serde_json::from_str(&content).map_err(|e| DashboardError::Config(format!("{path}: {e}")))
    }

    /// Returns the short code for a full department name, if one is configured.
    pub fn abbreviation(&self, department: &str) -> Option<&str> {
        self.department_abbreviations
            .get(department)
            .map(String::as_str)
    }

    /// Iterates over every subject-code prefix owned by some department.
    pub fn owned_prefixes(&self) -> impl Iterator<Item = &str> {
        self.department_prefixes.values().map(String::as_str)
    }

    /// True when `code` appears in any department's supplementary elective list.
    pub fn is_listed_elective(&self, code: &str) -> bool {
        self.elective_codes
            .values()
            .any(|codes| codes.iter().any(|c| c == code))
    }
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn lists(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(k, codes)| (k.to_string(), codes.iter().map(|c| c.to_string()).collect()))
        .collect()
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            sheet_name: "UG".to_string(),
            department_abbreviations: table(&[
                ("AEROSPACE ENGINEERING", "AERO"),
                ("AUTOMOBILE ENGINEERING", "AUTO"),
                ("ELECTRONICS ENGINEERING", "ECE"),
                ("INFORMATION TECHNOLOGY", "IT"),
                ("INSTRUMENTATION ENGINEERING", "E&I"),
                ("PRODUCTION TECHNOLOGY", "PT"),
                ("RUBBER AND PLASTICS TECHNOLOGY", "RPT"),
            ]),
            department_prefixes: table(&[
                ("Aerospace", "AE"),
                ("Automobile", "AU"),
                ("Electronics Comm", "EC"),
                ("Artificial Intelligence", "AZ"),
                ("Information Tech", "IT"),
                ("Inst Eng", "EI"),
                ("Mech", "ME"),
                ("Production", "PR"),
                ("Robotics", "RO"),
                ("Rubber and Plastics", "RP"),
            ]),
            elective_codes: lists(&[
                (
                    "Aeronautical",
                    &[
                        "HM5503", "EC5797", "PR5791", "EC5796", "RP5591", "EI5791", "AU5791",
                        "ME5796", "IT5794",
                    ],
                ),
                (
                    "Automobile",
                    &[
                        "GE5552", "IT5794", "GE5451", "ITM503", "ITM505", "EC5796", "EC5797",
                        "PR5791", "RP5591", "AE5795", "ME5796",
                    ],
                ),
                (
                    "ECE",
                    &[
                        "HU5176", "IT5794", "MG5451", "PH5202", "EI5791", "HU5172", "HU5171",
                        "ME5796", "HU5173", "PR5791", "HU5177", "AU5791", "AE5795", "HU5174",
                        "RP5591",
                    ],
                ),
                ("AI", &["HU5173", "HU5176", "HU5171", "HU5172", "HU5177"]),
                (
                    "IT",
                    &[
                        "HU5174", "HU5177", "HU5172", "HU5173", "HU5176", "HU5171", "EC5797",
                        "EC5796", "AE5795", "AU5791", "EI5791", "ME5796", "PR5791", "RP5591",
                    ],
                ),
                (
                    "EI",
                    &[
                        "HM5501", "ME5796", "RP5591", "EC5796", "EC5797", "IT5794", "PR5791",
                        "AE5795",
                    ],
                ),
                (
                    "Mech",
                    &["ITM503", "ITM505", "AU5791", "AE5795", "GE5152", "MA5252"],
                ),
                (
                    "Production",
                    &[
                        "GE5551", "HS5151", "ITM503", "ITM505", "EEM504", "EEM503", "EI5791",
                        "EC5796", "IT5794", "AE5795",
                    ],
                ),
                ("Robo", &["EE5402", "ITM503", "ITM505", "MA5158"]),
                (
                    "Rubber",
                    &[
                        "HU5171", "HU5176", "HU5172", "ITM503", "ITM505", "HU5177", "HU5174",
                        "GE5451", "ME5796", "EC5797", "AE5795", "AU5791", "EC5796",
                    ],
                ),
            ]),
            semesters: vec![5, 7],
            unmapped_department: UnmappedDepartmentPolicy::PassThrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let config = InstitutionConfig::default();
        assert_eq!(config.sheet_name, "UG");
        assert_eq!(config.abbreviation("INFORMATION TECHNOLOGY"), Some("IT"));
        assert_eq!(config.abbreviation("CIVIL ENGINEERING"), None);
        assert_eq!(config.owned_prefixes().count(), 10);
        assert!(config.is_listed_elective("AE5795"));
        assert!(!config.is_listed_elective("AE5101"));
        assert_eq!(config.semesters, vec![5, 7]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: InstitutionConfig =
            serde_json::from_str(r#"{ "semesters": [3], "unmapped_department": "exclude" }"#)
                .unwrap();
        assert_eq!(config.semesters, vec![3]);
        assert_eq!(config.unmapped_department, UnmappedDepartmentPolicy::Exclude);
        assert_eq!(config.sheet_name, "UG");
        assert_eq!(config.abbreviation("AEROSPACE ENGINEERING"), Some("AERO"));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = InstitutionConfig::load("/nonexistent/institution.json").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
