/// The canonical timestamp-sorted series.
///
/// Parallel storage in the shape the reducers consume: one timestamp slot
/// per row (with an explicit invalid marker) and one value vector per named
/// column. Built once per job from a `RawTable` and never mutated — every
/// downstream stage borrows it.

use chrono::NaiveDateTime;
use std::cmp::Ordering;

use crate::ingest::excel::RawTable;

// ---------------------------------------------------------------------------
// Canonical series
// ---------------------------------------------------------------------------

/// One named value column, parallel to the series timestamps.
#[derive(Debug, Clone)]
struct SeriesColumn {
    name: String,
    values: Vec<Option<f64>>,
}

/// A normalized table: rows stable-sorted by timestamp, invalid-timestamp
/// rows kept but placed after all valid rows in original file order.
///
/// Invariant: column names are repaired text (the ingest layer runs the
/// encoding repair before the series is built), and every column has exactly
/// `len()` values.
#[derive(Debug, Clone)]
pub struct CanonicalSeries {
    timestamps: Vec<Option<NaiveDateTime>>,
    columns: Vec<SeriesColumn>,
}

impl CanonicalSeries {
    /// Normalize a raw table: stable-sort rows by timestamp.
    ///
    /// Rows whose timestamp failed to parse are not dropped — they stay in
    /// the table (and in every column's value vector) but sort after all
    /// valid rows, and the grouper never selects them.
    pub fn from_raw(raw: RawTable) -> Self {
        let mut order: Vec<usize> = (0..raw.timestamps.len()).collect();
        order.sort_by(|&a, &b| match (raw.timestamps[a], raw.timestamps[b]) {
            (Some(ta), Some(tb)) => ta.cmp(&tb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        let timestamps = order.iter().map(|&i| raw.timestamps[i]).collect();
        let columns = raw
            .column_names
            .into_iter()
            .zip(raw.columns)
            .map(|(name, values)| SeriesColumn {
                name,
                values: order.iter().map(|&i| values[i]).collect(),
            })
            .collect();

        Self { timestamps, columns }
    }

    /// Number of rows, including invalid-timestamp rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of rows with a parseable timestamp.
    pub fn valid_timestamp_count(&self) -> usize {
        self.timestamps.iter().filter(|t| t.is_some()).count()
    }

    pub fn timestamps(&self) -> &[Option<NaiveDateTime>] {
        &self.timestamps
    }

    /// Values of the named column, or `None` if no such column exists.
    /// Column absence is an expected condition, not an error.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
    }

    fn raw(timestamps: Vec<Option<NaiveDateTime>>, values: Vec<Option<f64>>) -> RawTable {
        RawTable {
            column_names: vec!["Load".to_string()],
            timestamps,
            columns: vec![values],
        }
    }

    #[test]
    fn test_rows_are_sorted_by_timestamp() {
        let series = CanonicalSeries::from_raw(raw(
            vec![ts(2, 0), ts(1, 0), ts(3, 0)],
            vec![Some(2.0), Some(1.0), Some(3.0)],
        ));

        let load = series.column("Load").expect("Load column should exist");
        assert_eq!(load, &[Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(series.timestamps()[0], ts(1, 0));
    }

    #[test]
    fn test_invalid_timestamps_sort_last_but_are_kept() {
        let series = CanonicalSeries::from_raw(raw(
            vec![None, ts(1, 0), None],
            vec![Some(9.0), Some(1.0), Some(8.0)],
        ));

        assert_eq!(series.len(), 3, "invalid-timestamp rows must not be dropped");
        assert_eq!(series.valid_timestamp_count(), 1);
        assert_eq!(series.timestamps()[0], ts(1, 0));
        // Stable: the two invalid rows keep their original relative order.
        let load = series.column("Load").unwrap();
        assert_eq!(load, &[Some(1.0), Some(9.0), Some(8.0)]);
    }

    #[test]
    fn test_equal_timestamps_keep_file_order() {
        let series = CanonicalSeries::from_raw(raw(
            vec![ts(1, 0), ts(1, 0)],
            vec![Some(10.0), Some(20.0)],
        ));
        let load = series.column("Load").unwrap();
        assert_eq!(load, &[Some(10.0), Some(20.0)]);
    }

    #[test]
    fn test_absent_column_is_none_not_error() {
        let series = CanonicalSeries::from_raw(raw(vec![ts(1, 0)], vec![Some(1.0)]));
        assert!(series.column("Grid Sales").is_none());
        assert!(!series.has_column("Grid Sales"));
        assert!(series.has_column("Load"));
    }

    #[test]
    fn test_empty_table_normalizes_to_empty_series() {
        let series = CanonicalSeries::from_raw(raw(vec![], vec![]));
        assert!(series.is_empty());
        assert_eq!(series.valid_timestamp_count(), 0);
        assert_eq!(series.column("Load").unwrap().len(), 0);
    }
}
