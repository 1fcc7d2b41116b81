/// Hourly energy-profile extraction from HOMER-style simulation exports.
///
/// The pipeline reads one hourly `.xlsx` export per configured job,
/// normalizes it into a timestamp-sorted canonical series, partitions the
/// series into temporal groups (a representative day per month, or a named
/// multi-month season), reduces each group to a fixed 24-row hourly profile
/// per mapped column, and writes one multi-sheet workbook per job.
///
/// Modules:
/// - `model`    — shared domain types; no logic, no I/O.
/// - `config`   — TOML job-file loading and validation.
/// - `ingest`   — workbook reading, header repair, lenient cell parsing.
/// - `series`   — the canonical timestamp-sorted series.
/// - `analysis` — temporal grouping and hourly reduction (the core).
/// - `report`   — multi-sheet artifact assembly and atomic write.
/// - `pipeline` — the per-job pipeline and the batch driver.
/// - `verify`   — offline preflight checks for configured jobs.
/// - `logging`  — leveled diagnostics channel.
pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod series;
pub mod verify;
