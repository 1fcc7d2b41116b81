/// Input loading for the profile extraction pipeline.
///
/// Everything in here is the mechanical I/O boundary: opening workbooks,
/// repairing mis-encoded header text, and lenient cell conversion. No
/// grouping or reduction logic lives here.
///
/// Submodules:
/// - `excel` — HOMER `.xlsx` export reading via calamine.

pub mod excel;
