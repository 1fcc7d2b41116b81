/// Multi-sheet report assembly.
///
/// Takes the reduced profiles for every group of one job and writes a
/// single `.xlsx` artifact: one sheet per group in declaration order, each
/// sheet an "Hour"-indexed 24-row table with one column per output label.
/// Missing values become blank cells.
///
/// The write is atomic from the caller's perspective: the workbook is saved
/// to a temporary sibling path and renamed over the destination only after
/// every sheet has been assembled, so a failed job never leaves a partial
/// artifact behind.

use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{HOURS_PER_DAY, HourlyProfile, JobError};

// ---------------------------------------------------------------------------
// Sheets
// ---------------------------------------------------------------------------

/// One labeled output column within a sheet.
#[derive(Debug, Clone)]
pub struct ReportColumn {
    pub label: String,
    pub profile: HourlyProfile,
}

/// One finished sheet: a group name and its columns in mapping order.
#[derive(Debug, Clone)]
pub struct ReportSheet {
    pub name: String,
    pub columns: Vec<ReportColumn>,
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Label of the hour index column on every sheet.
const HOUR_INDEX_LABEL: &str = "Hour";

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write all sheets for one job to `path`.
pub fn write_report(path: &Path, sheets: &[ReportSheet]) -> Result<(), JobError> {
    let output_err = |detail: String| JobError::OutputUnwritable {
        path: path.display().to_string(),
        detail,
    };

    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .map_err(|e| output_err(e.to_string()))?;

        worksheet
            .write_string(0, 0, HOUR_INDEX_LABEL)
            .map_err(|e| output_err(e.to_string()))?;
        for (col_idx, column) in sheet.columns.iter().enumerate() {
            worksheet
                .write_string(0, (col_idx + 1) as u16, &column.label)
                .map_err(|e| output_err(e.to_string()))?;
        }

        for hour in 0..HOURS_PER_DAY {
            let row = (hour + 1) as u32;
            worksheet
                .write_number(row, 0, hour as f64)
                .map_err(|e| output_err(e.to_string()))?;

            for (col_idx, column) in sheet.columns.iter().enumerate() {
                if let Some(value) = column.profile.get(hour) {
                    worksheet
                        .write_number(row, (col_idx + 1) as u16, value)
                        .map_err(|e| output_err(e.to_string()))?;
                }
            }
        }
    }

    let staged = staging_path(path);
    workbook
        .save(&staged)
        .map_err(|e| output_err(e.to_string()))?;
    fs::rename(&staged, path).map_err(|e| output_err(e.to_string()))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_path_is_a_sibling_of_the_destination() {
        let staged = staging_path(Path::new("out/Result_P11.xlsx"));
        assert_eq!(staged, Path::new("out/Result_P11.xlsx.tmp"));
    }

    #[test]
    fn test_write_and_reread_roundtrips_sheets_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.xlsx");

        let mut values = [None; HOURS_PER_DAY];
        values[0] = Some(1.5);
        values[23] = Some(0.0);

        let sheets = vec![
            ReportSheet {
                name: "February".to_string(),
                columns: vec![ReportColumn {
                    label: "بار".to_string(),
                    profile: HourlyProfile::from_values(values),
                }],
            },
            ReportSheet {
                name: "May".to_string(),
                columns: vec![ReportColumn {
                    label: "بار".to_string(),
                    profile: HourlyProfile::missing(),
                }],
            },
        ];

        write_report(&path, &sheets).expect("write should succeed");
        assert!(path.exists());
        assert!(!staging_path(&path).exists(), "staging file must be gone");

        use calamine::{Data, Reader, Xlsx, open_workbook};
        let mut workbook: Xlsx<_> = open_workbook(&path).expect("reopen");
        assert_eq!(workbook.sheet_names().to_vec(), vec!["February", "May"]);

        let range = workbook.worksheet_range("February").expect("range");
        // Header row: index label then the Unicode output label.
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("Hour".to_string())));
        assert_eq!(range.get_value((0, 1)), Some(&Data::String("بار".to_string())));
        // Hour 0 row: index 0, value 1.5.
        assert_eq!(range.get_value((1, 0)), Some(&Data::Float(0.0)));
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(1.5)));
        // A real zero is written, not blanked.
        assert_eq!(range.get_value((24, 1)), Some(&Data::Float(0.0)));
        // A missing hour is a blank cell.
        let hour_5_value = range.get_value((6, 1));
        assert!(
            hour_5_value.is_none() || hour_5_value == Some(&Data::Empty),
            "missing slot must be blank, got {:?}",
            hour_5_value
        );
    }

    #[test]
    fn test_unwritable_destination_is_a_job_error() {
        let sheets = vec![ReportSheet {
            name: "February".to_string(),
            columns: vec![],
        }];
        let result = write_report(Path::new("/nonexistent-dir/report.xlsx"), &sheets);
        assert!(matches!(result, Err(JobError::OutputUnwritable { .. })));
    }
}
