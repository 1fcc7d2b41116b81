/// HOMER `.xlsx` export reading.
///
/// Loads the first worksheet of a workbook into a `RawTable`: repaired
/// header names, leniently-parsed timestamps, and numeric value columns.
/// Cell-level problems degrade to missing values; only an unreadable
/// workbook or an absent timestamp column is fatal for the job.

use calamine::{Data, DataType, Reader, Xlsx, open_workbook};
use chrono::NaiveDateTime;
use std::path::Path;

use crate::model::JobError;

// ---------------------------------------------------------------------------
// Raw table
// ---------------------------------------------------------------------------

/// One loaded worksheet, prior to canonical ordering.
///
/// `column_names` excludes the timestamp column and carries repaired header
/// text. `columns` is parallel to `column_names`; every inner vector has one
/// entry per data row, as does `timestamps`.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub column_names: Vec<String>,
    pub timestamps: Vec<Option<NaiveDateTime>>,
    pub columns: Vec<Vec<Option<f64>>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }
}

// ---------------------------------------------------------------------------
// Header repair
// ---------------------------------------------------------------------------

/// Repair header text that was decoded under the wrong encoding.
///
/// HOMER exports carry UTF-8 headers, but the export path decodes them as
/// Latin-1, turning multi-byte sequences into runs of accented characters.
/// Reinterpretation: re-encode each character back to its Latin-1 byte and
/// re-decode the byte string as UTF-8, dropping byte sequences that do not
/// decode (drop-and-continue, never fail).
///
/// A name containing any character above U+00FF cannot have come through a
/// Latin-1 decode and passes through unchanged.
pub fn repair_header_text(raw: &str) -> String {
    if raw.chars().any(|c| c as u32 > 0xFF) {
        return raw.to_string();
    }

    let bytes: Vec<u8> = raw.chars().map(|c| c as u8).collect();

    let mut repaired = String::with_capacity(bytes.len());
    let mut rest = bytes.as_slice();
    loop {
        match std::str::from_utf8(rest) {
            Ok(tail) => {
                repaired.push_str(tail);
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                if let Ok(prefix) = std::str::from_utf8(valid) {
                    repaired.push_str(prefix);
                }
                match err.error_len() {
                    // Skip the offending sequence and keep decoding.
                    Some(len) => rest = &after[len..],
                    // Truncated sequence at the end of the name.
                    None => break,
                }
            }
        }
    }
    repaired
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Header cell to column name. Strings get the encoding repair; anything
/// else passes through via its display form.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => repair_header_text(s),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Lenient timestamp parsing. Unparseable cells become `None` rather than
/// an error; rows with `None` timestamps are later excluded from grouping.
fn parse_timestamp_cell(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::String(s) => parse_timestamp_text(s),
        other => other.as_datetime(),
    }
}

fn parse_timestamp_text(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];

    let trimmed = text.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Numeric cell conversion. Empty cells, markers like "null", and anything
/// non-numeric become `None` — the explicit missing marker, not zero.
fn parse_value_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(v) => Some(*v),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                None
            } else {
                trimmed.parse().ok()
            }
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Workbook loading
// ---------------------------------------------------------------------------

/// Load the first worksheet of `path` into a `RawTable`.
///
/// The first row is the header; `timestamp_column` is matched against the
/// repaired header names. Rows that are entirely empty are skipped.
pub fn load_table(path: &Path, timestamp_column: &str) -> Result<RawTable, JobError> {
    let input_err = |detail: String| JobError::InputUnreadable {
        path: path.display().to_string(),
        detail,
    };

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: calamine::XlsxError| input_err(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| input_err("workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| input_err(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| input_err(format!("sheet '{}' is empty", first_sheet)))?;

    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let timestamp_idx = headers
        .iter()
        .position(|h| h == timestamp_column)
        .ok_or_else(|| JobError::TimestampColumnMissing {
            column: timestamp_column.to_string(),
        })?;

    let column_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != timestamp_idx)
        .map(|(_, name)| name.clone())
        .collect();

    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); column_names.len()];

    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        timestamps.push(row.get(timestamp_idx).and_then(parse_timestamp_cell));

        let mut column_slot = 0;
        for idx in 0..headers.len() {
            if idx == timestamp_idx {
                continue;
            }
            let value = row.get(idx).and_then(parse_value_cell);
            columns[column_slot].push(value);
            column_slot += 1;
        }
    }

    Ok(RawTable {
        column_names,
        timestamps,
        columns,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Header repair ------------------------------------------------------

    #[test]
    fn test_ascii_header_is_unchanged() {
        assert_eq!(
            repair_header_text("Total Electrical Load Served"),
            "Total Electrical Load Served"
        );
    }

    #[test]
    fn test_mis_decoded_persian_header_is_restored() {
        // UTF-8 bytes of "بار" read back as Latin-1.
        let mangled = "\u{00D8}\u{00A8}\u{00D8}\u{00A7}\u{00D8}\u{00B1}";
        assert_eq!(repair_header_text(mangled), "بار");
    }

    #[test]
    fn test_undecodable_byte_sequence_is_dropped() {
        // 0xE9 alone is not a valid UTF-8 sequence; the trailing byte is
        // dropped and the decodable prefix survives.
        let mangled = "Load \u{00E9}";
        assert_eq!(repair_header_text(mangled), "Load ");
    }

    #[test]
    fn test_undecodable_interior_sequence_drops_and_continues() {
        // Invalid byte between two valid ASCII runs: decoding continues
        // past the dropped sequence.
        let mangled = "AC\u{00FF}Load";
        assert_eq!(repair_header_text(mangled), "ACLoad");
    }

    #[test]
    fn test_already_unicode_header_passes_through() {
        // Real Persian text (chars above U+00FF) must never be reinterpreted.
        assert_eq!(repair_header_text("بار"), "بار");
    }

    // --- Timestamp parsing --------------------------------------------------

    #[test]
    fn test_parse_timestamp_standard_format() {
        let ts = parse_timestamp_text("2023-02-15 05:00:00").expect("should parse");
        use chrono::{Datelike, Timelike};
        assert_eq!(ts.month(), 2);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 5);
    }

    #[test]
    fn test_parse_timestamp_without_seconds() {
        assert!(parse_timestamp_text("2023-02-15 05:00").is_some());
    }

    #[test]
    fn test_unparseable_timestamp_yields_none() {
        assert!(parse_timestamp_text("not-a-time").is_none());
        assert!(parse_timestamp_text("").is_none());
    }

    // --- Value parsing ------------------------------------------------------

    #[test]
    fn test_numeric_cells_parse_to_values() {
        assert_eq!(parse_value_cell(&Data::Float(1.25)), Some(1.25));
        assert_eq!(parse_value_cell(&Data::Int(3)), Some(3.0));
        assert_eq!(parse_value_cell(&Data::String("2.5".to_string())), Some(2.5));
    }

    #[test]
    fn test_non_numeric_cells_are_missing_not_zero() {
        assert_eq!(parse_value_cell(&Data::Empty), None);
        assert_eq!(parse_value_cell(&Data::String("null".to_string())), None);
        assert_eq!(parse_value_cell(&Data::String("".to_string())), None);
        assert_eq!(parse_value_cell(&Data::Bool(true)), None);
    }
}
