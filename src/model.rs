/// Core data types for the energy-profile extraction pipeline.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small accessors, no I/O, and no external
/// dependencies — only types.

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Source column vocabulary
// ---------------------------------------------------------------------------

/// HOMER column name for photovoltaic array output, in kW.
pub const COL_PV_OUTPUT: &str = "Generic flat plate PV Power Output";

/// HOMER column name for wind turbine output, in kW.
pub const COL_WIND_OUTPUT: &str = "Generic 3 kW Power Output";

/// HOMER column name for battery charge/discharge flow, in kW.
pub const COL_BATTERY_INPUT: &str = "Generic 1kWh Lead Acid Input Power";

/// HOMER column name for the electrical load actually served, in kW.
pub const COL_LOAD_SERVED: &str = "Total Electrical Load Served";

/// HOMER column name for production beyond load and storage, in kW.
pub const COL_EXCESS_PRODUCTION: &str = "Excess Electrical Production";

/// HOMER column name for energy bought from the grid, in kW.
pub const COL_GRID_PURCHASES: &str = "Grid Purchases";

/// HOMER column name for energy sold to the grid, in kW.
pub const COL_GRID_SALES: &str = "Grid Sales";

/// Every source column the shipped configurations draw from. Other column
/// names are accepted (the mapper only checks presence), but `verify` flags
/// configured sources outside this vocabulary as likely typos.
pub const KNOWN_SOURCE_COLUMNS: &[&str] = &[
    COL_PV_OUTPUT,
    COL_WIND_OUTPUT,
    COL_BATTERY_INPUT,
    COL_LOAD_SERVED,
    COL_EXCESS_PRODUCTION,
    COL_GRID_PURCHASES,
    COL_GRID_SALES,
];

/// Default name of the timestamp column in HOMER exports.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "Time";

// ---------------------------------------------------------------------------
// Temporal grouping
// ---------------------------------------------------------------------------

/// Day-of-month used by representative-day grouping. Fixed, not configurable.
pub const REPRESENTATIVE_DAY: u32 = 15;

/// Number of hour slots in every emitted profile.
pub const HOURS_PER_DAY: usize = 24;

/// One target month in representative-day mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    /// Calendar month number, 1-12.
    pub month: u32,
    /// Sheet name for this group, e.g. "February".
    pub name: String,
}

/// One named season in season mode. The month set may be non-contiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonGroup {
    /// Sheet name for this group, e.g. "Winter".
    pub name: String,
    /// Calendar month numbers belonging to the season, each 1-12.
    pub months: Vec<u32>,
}

/// How one job partitions the canonical series into groups.
///
/// The two modes are mutually exclusive and fix the reduction policy:
/// representative-day groups take the first 24 samples of the 15th of the
/// target month, season groups average by hour-of-day across the season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingMode {
    RepresentativeDay { months: Vec<MonthGroup> },
    Season { seasons: Vec<SeasonGroup> },
}

impl GroupingMode {
    /// Number of declared groups.
    pub fn group_count(&self) -> usize {
        match self {
            GroupingMode::RepresentativeDay { months } => months.len(),
            GroupingMode::Season { seasons } => seasons.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// One source-to-output column mapping entry. Output columns appear in the
/// artifact in declaration order; labels are unique within a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name as it appears in the input header (after repair).
    pub source: String,
    /// Output label, arbitrary Unicode (Persian in the shipped configs).
    pub label: String,
}

// ---------------------------------------------------------------------------
// Job definition
// ---------------------------------------------------------------------------

/// One fully-validated extraction job: input, output, mapping, grouping.
/// Produced by `config::load_jobs`; consumed by `pipeline::run_job`.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Short identifier used in diagnostics, e.g. "P11".
    pub name: String,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Header name of the timestamp column, usually "Time".
    pub timestamp_column: String,
    pub columns: Vec<ColumnSpec>,
    pub grouping: GroupingMode,
}

// ---------------------------------------------------------------------------
// Hourly profile
// ---------------------------------------------------------------------------

/// Exactly 24 hour-indexed values for one output column in one group.
///
/// `None` is the explicit missing marker. It is distinct from `Some(0.0)` at
/// every stage: an empty input cell, an hour with no contributing rows, and
/// a column absent from the input all reduce to `None`, never to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyProfile {
    values: [Option<f64>; HOURS_PER_DAY],
}

impl HourlyProfile {
    /// A profile with every hour slot missing.
    pub fn missing() -> Self {
        Self {
            values: [None; HOURS_PER_DAY],
        }
    }

    pub fn from_values(values: [Option<f64>; HOURS_PER_DAY]) -> Self {
        Self { values }
    }

    /// Value at `hour` (0-23). Panics on an out-of-range hour, which would
    /// be a caller bug rather than a data condition.
    pub fn get(&self, hour: usize) -> Option<f64> {
        self.values[hour]
    }

    pub fn values(&self) -> &[Option<f64>; HOURS_PER_DAY] {
        &self.values
    }

    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Fatal-per-job failures. Anything recoverable (unparseable timestamps,
/// unrepairable header bytes, missing source columns, short groups) never
/// reaches this type — those degrade locally and surface as diagnostics.
#[derive(Debug, PartialEq)]
pub enum JobError {
    /// The input workbook could not be opened, or contained no usable sheet.
    InputUnreadable { path: String, detail: String },
    /// The configured timestamp column was absent from the input header.
    TimestampColumnMissing { column: String },
    /// The output artifact could not be assembled or written.
    OutputUnwritable { path: String, detail: String },
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobError::InputUnreadable { path, detail } => {
                write!(f, "input {} is unreadable: {}", path, detail)
            }
            JobError::TimestampColumnMissing { column } => {
                write!(f, "timestamp column '{}' not found in input header", column)
            }
            JobError::OutputUnwritable { path, detail } => {
                write!(f, "output {} is unwritable: {}", path, detail)
            }
        }
    }
}

impl std::error::Error for JobError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
