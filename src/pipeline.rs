/// The per-job pipeline and the batch driver.
///
/// `run_job` threads one immutable value through the stages:
/// load → normalize → group → reduce → assemble. `run_batch` runs every
/// configured job in order; a failure in one job is logged and never
/// blocks the others — the jobs share no state.

use crate::analysis::grouping::{self, TemporalGroup};
use crate::analysis::profile::{self, DayProfileOutcome};
use crate::config;
use crate::ingest::excel;
use crate::logging::{self, Stage};
use crate::model::{GroupingMode, HourlyProfile, Job, JobError};
use crate::report::{self, ReportColumn, ReportSheet};
use crate::series::CanonicalSeries;
use std::path::Path;

// ---------------------------------------------------------------------------
// Single job
// ---------------------------------------------------------------------------

/// Run one extraction job end to end.
pub fn run_job(job: &Job) -> Result<(), JobError> {
    let raw = excel::load_table(&job.input, &job.timestamp_column)?;
    logging::debug(
        Stage::Ingest,
        Some(&job.name),
        &format!("loaded {} rows from {}", raw.row_count(), job.input.display()),
    );

    let series = CanonicalSeries::from_raw(raw);

    // Resolve the column mapping once per job. A source column absent from
    // the input is expected: it gets the not-found diagnostic exactly once
    // here, and a fully-missing column in every sheet below.
    let resolved: Vec<(&str, Option<&[Option<f64>]>)> = job
        .columns
        .iter()
        .map(|spec| {
            let values = series.column(&spec.source);
            if values.is_none() {
                logging::warn(
                    Stage::Analysis,
                    Some(&job.name),
                    &format!("The {} column is not found.", spec.source),
                );
            }
            (spec.label.as_str(), values)
        })
        .collect();

    let sheets: Vec<ReportSheet> = grouping::groups(&series, &job.grouping)
        .map(|group| assemble_sheet(job, &series, &group, &resolved))
        .collect();

    report::write_report(&job.output, &sheets)?;
    logging::info(
        Stage::Report,
        Some(&job.name),
        &format!(
            "wrote {} sheets to {}",
            sheets.len(),
            job.output.display()
        ),
    );
    Ok(())
}

/// Reduce every mapped column for one group and label the result.
fn assemble_sheet(
    job: &Job,
    series: &CanonicalSeries,
    group: &TemporalGroup,
    resolved: &[(&str, Option<&[Option<f64>]>)],
) -> ReportSheet {
    let columns = resolved
        .iter()
        .map(|&(label, values)| {
            let profile = match values {
                Some(values) => reduce_column(job, group, series, values, label),
                None => HourlyProfile::missing(),
            };
            ReportColumn {
                label: label.to_string(),
                profile,
            }
        })
        .collect();

    ReportSheet {
        name: group.name.clone(),
        columns,
    }
}

fn reduce_column(
    job: &Job,
    group: &TemporalGroup,
    series: &CanonicalSeries,
    values: &[Option<f64>],
    label: &str,
) -> HourlyProfile {
    match &job.grouping {
        GroupingMode::RepresentativeDay { .. } => {
            let (profile, outcome) =
                profile::reduce_day_profile(series.timestamps(), values, &group.rows);
            match outcome {
                DayProfileOutcome::Complete => {}
                DayProfileOutcome::Shortfall { available } => {
                    logging::warn(
                        Stage::Analysis,
                        Some(&job.name),
                        &format!(
                            "Just {} values are available for {} in {}",
                            available, label, group.name
                        ),
                    );
                }
                DayProfileOutcome::Misaligned => {
                    logging::warn(
                        Stage::Analysis,
                        Some(&job.name),
                        &format!(
                            "hours of {} in {} do not run 0-23 in row order; \
                             values kept positionally",
                            label, group.name
                        ),
                    );
                }
            }
            profile
        }
        GroupingMode::Season { .. } => {
            profile::reduce_hourly_mean(series.timestamps(), values, &group.rows)
        }
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Outcome counts for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Run every job in order, isolating failures per job.
pub fn run_batch(jobs: &[Job]) -> BatchSummary {
    let mut succeeded = 0;
    let mut failed = 0;

    for job in jobs {
        match run_job(job) {
            Ok(()) => succeeded += 1,
            Err(err) => {
                failed += 1;
                logging::error(Stage::System, Some(&job.name), &err.to_string());
            }
        }
    }

    logging::log_batch_summary(jobs.len(), succeeded, failed);
    BatchSummary {
        total: jobs.len(),
        succeeded,
        failed,
    }
}

/// Convenience for the CLI: load a job file and run it.
pub fn run_job_file(path: &Path) -> Result<BatchSummary, config::ConfigError> {
    let jobs = config::load_jobs(path)?;
    logging::info(
        Stage::Config,
        None,
        &format!("loaded {} jobs from {}", jobs.len(), path.display()),
    );
    Ok(run_batch(&jobs))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
