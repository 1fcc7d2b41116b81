/// Extraction core for the profile pipeline.
///
/// This module holds the only real logic in the repository: partitioning
/// the canonical series into temporal groups and reducing each group to a
/// fixed 24-slot hourly profile. Everything here is pure — no I/O, no
/// logging — so callers decide how diagnostics surface.
///
/// Submodules:
/// - `grouping` — representative-day and season partitioning.
/// - `profile`  — take-first-24 and average-by-hour reduction.

pub mod grouping;
pub mod profile;
