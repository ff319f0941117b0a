//! Reads an uploaded result sheet and validates its columns.
//!
//! Workbooks (xlsx/xls/ods) are read with `calamine`, CSV exports with
//! `csv`. The caller states which one it is handing over.

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::InstitutionConfig;
use crate::error::DashboardError;
use crate::table::{REQUIRED_COLUMNS, ResultRow, ResultTable};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Sheet label given to tables read from CSV, which has no sheets.
pub const CSV_SHEET: &str = "csv";

/// Container format of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceFormat {
    #[default]
    Workbook,
    Csv,
}

impl SourceFormat {
    /// Picks the format from a file name or URL extension, if it names one.
    pub fn from_extension(name: &str) -> Option<Self> {
        let name = name.split(['?', '#']).next().unwrap_or(name);
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(SourceFormat::Workbook),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" | "xls" | "ods" | "workbook" => Ok(SourceFormat::Workbook),
            "csv" => Ok(SourceFormat::Csv),
            other => Err(format!("unknown format '{other}' (expected xlsx or csv)")),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Workbook => f.write_str("workbook"),
            SourceFormat::Csv => f.write_str("csv"),
        }
    }
}

/// Decodes a result sheet from raw upload bytes.
///
/// # Errors
///
/// [`DashboardError::Load`] when the payload is not a readable `format`
/// file or the configured sheet is missing, [`DashboardError::Schema`]
/// when required columns are absent.
#[tracing::instrument(skip(bytes, config), fields(bytes = bytes.len(), sheet = %config.sheet_name))]
pub fn load_table(
    bytes: &[u8],
    format: SourceFormat,
    config: &InstitutionConfig,
) -> Result<ResultTable, DashboardError> {
    let (grid, sheet) = match format {
        SourceFormat::Workbook => (
            read_workbook(bytes, &config.sheet_name)?,
            config.sheet_name.as_str(),
        ),
        SourceFormat::Csv => (read_csv(bytes)?, CSV_SHEET),
    };

    let table = project(grid, sheet)?;
    info!(rows = table.len(), "Result sheet loaded");
    Ok(table)
}

/// Reads `path` from disk and decodes it with [`load_table`], taking the
/// format from the file extension.
pub fn load_path(path: &str, config: &InstitutionConfig) -> Result<ResultTable, DashboardError> {
    let format = SourceFormat::from_extension(path).ok_or_else(|| {
        DashboardError::load(format!("cannot tell the format of '{path}' from its extension"))
    })?;
    let bytes = std::fs::read(path).map_err(DashboardError::load)?;
    load_table(&bytes, format, config)
}

fn is_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
}

/// Header row followed by data rows, all rendered as text.
struct Grid {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_workbook(bytes: &[u8], sheet: &str) -> Result<Grid, DashboardError> {
    if !is_workbook(bytes) {
        return Err(DashboardError::load("payload is not an xlsx, xls or ods workbook"));
    }
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(DashboardError::load)?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(DashboardError::load)?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DashboardError::load(format!("sheet '{sheet}' has no header row")))?
        .iter()
        .map(cell_text)
        .collect();
    let rows = rows.map(|r| r.iter().map(cell_text).collect()).collect();

    Ok(Grid { header, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // registration numbers and marks come through as floats
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

fn read_csv(bytes: &[u8]) -> Result<Grid, DashboardError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = rdr
        .headers()
        .map_err(DashboardError::load)?
        .iter()
        .map(str::to_string)
        .collect();
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(DashboardError::load("file has no header row"));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(DashboardError::load)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Grid { header, rows })
}

/// Validates the header and projects every row onto [`REQUIRED_COLUMNS`].
fn project(grid: Grid, sheet: &str) -> Result<ResultTable, DashboardError> {
    let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|col| grid.header.iter().position(|h| h.trim() == *col))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(&positions)
        .filter(|(_, pos)| pos.is_none())
        .map(|(col, _)| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::Schema { missing });
    }

    let positions: Vec<usize> = positions.into_iter().flatten().collect();
    let mut rows = Vec::with_capacity(grid.rows.len());
    let mut blank = 0usize;

    for raw in grid.rows {
        let cells: [String; 10] =
            std::array::from_fn(|i| raw.get(positions[i]).cloned().unwrap_or_default());
        if cells.iter().all(|c| c.trim().is_empty()) {
            blank += 1;
            continue;
        }
        rows.push(ResultRow::from_cells(cells));
    }

    if blank > 0 {
        debug!(blank, "Skipped blank rows");
    }

    Ok(ResultTable::new(sheet, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "DEPNAME,BRNAME,SEM,REGNO,SUBCODE,SUBTYPE,SESMARK,ESEM,TOTMARK,GRADE";

    fn load_csv(csv: &str) -> Result<ResultTable, DashboardError> {
        load_table(csv.as_bytes(), SourceFormat::Csv, &InstitutionConfig::default())
    }

    #[test]
    fn test_load_csv_projects_required_columns() {
        let csv = format!(
            "EXTRA,{HEADER}\nx,INFORMATION TECHNOLOGY,B.Tech IT,5,1001,IT5501,T,35,40,75,A\n"
        );
        let table = load_csv(&csv).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.sheet(), CSV_SHEET);
        let row = &table.rows()[0];
        assert_eq!(row.department, "INFORMATION TECHNOLOGY");
        assert_eq!(row.regno, "1001");
        assert_eq!(row.semester, Some(5));
        assert_eq!(row.grade, "A");
    }

    #[test]
    fn test_load_path_reads_file() {
        let path = format!("{}/results_analyzer_loader.csv", std::env::temp_dir().display());
        std::fs::write(&path, format!("{HEADER}\nECE,B.E.,5,7,EC5501,T,1,2,3,U\n")).unwrap();

        let table = load_path(&path, &InstitutionConfig::default()).unwrap();
        assert_eq!(table.sheet(), CSV_SHEET);
        assert_eq!(table.len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_path_unknown_extension_is_load_error() {
        let err = load_path("results.json", &InstitutionConfig::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("UG.XLSX"), Some(SourceFormat::Workbook));
        assert_eq!(SourceFormat::from_extension("old/results.xls"), Some(SourceFormat::Workbook));
        assert_eq!(
            SourceFormat::from_extension("https://host/export.csv?token=1"),
            Some(SourceFormat::Csv)
        );
        assert_eq!(SourceFormat::from_extension("notes.txt"), None);
        assert_eq!(SourceFormat::from_extension("results"), None);
        assert_eq!("CSV".parse::<SourceFormat>(), Ok(SourceFormat::Csv));
        assert!("pdf".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let csv = "DEPNAME,BRNAME,SEM,REGNO,SUBCODE,SUBTYPE,SESMARK,ESEM\nA,B,5,1,X1,T,1,2\n";
        match load_csv(csv).unwrap_err() {
            DashboardError::Schema { missing } => assert_eq!(missing, vec!["TOTMARK", "GRADE"]),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_payload_is_load_error() {
        let config = InstitutionConfig::default();
        for format in [SourceFormat::Csv, SourceFormat::Workbook] {
            let err = load_table(b"", format, &config).unwrap_err();
            assert!(matches!(err, DashboardError::Load { .. }), "{format}");
        }
    }

    #[test]
    fn test_corrupt_workbook_is_load_error() {
        let bytes = b"PK\x03\x04not really a zip archive";
        let err = load_table(bytes, SourceFormat::Workbook, &InstitutionConfig::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
    }

    #[test]
    fn test_wrong_format_workbook_upload_is_load_error() {
        let config = InstitutionConfig::default();
        let payloads: [&[u8]; 3] = [
            b"{\"students\": [1, 2, 3]}",
            b"<html><body><table><tr><td>GRADE</td></tr></table></body></html>",
            b"just some notes\n",
        ];
        for bytes in payloads {
            let err = load_table(bytes, SourceFormat::Workbook, &config).unwrap_err();
            assert!(
                matches!(err, DashboardError::Load { .. }),
                "expected load error, got {err:?}"
            );
        }
    }

    #[test]
    fn test_blank_rows_skipped() {
        let csv = format!("{HEADER}\n,,,,,,,,,\nECE,B.E.,7,2,EC7001,T,20,30,50,B\n");
        let table = load_csv(&csv).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].subject_code, "EC7001");
    }

    #[test]
    fn test_cell_text_renders_integral_floats() {
        assert_eq!(cell_text(&Data::Float(2021506018.0)), "2021506018");
        assert_eq!(cell_text(&Data::Float(37.5)), "37.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("AB".into())), "AB");
    }
}
