//! Job Verification Module
//!
//! Framework for testing a job configuration against its input files to
//! determine which configured jobs are runnable and how much data each
//! temporal group would actually receive.
//!
//! Use this before a batch run to catch renamed columns, empty exports,
//! and months the input does not cover — without writing any artifact.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::grouping;
use crate::ingest::excel;
use crate::model::{GroupingMode, HOURS_PER_DAY, Job, KNOWN_SOURCE_COLUMNS};
use crate::series::CanonicalSeries;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<JobVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub partial: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobVerification {
    pub job_name: String,
    pub input: String,
    pub status: VerificationStatus,
    pub input_readable: bool,
    pub row_count: usize,
    pub valid_timestamps: usize,
    pub columns_available: Vec<String>,
    pub columns_missing: Vec<String>,
    /// Configured sources outside the known HOMER vocabulary — usually typos.
    pub unknown_sources: Vec<String>,
    pub group_coverage: Vec<GroupCoverage>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCoverage {
    pub group: String,
    pub rows: usize,
    /// Whether the group holds enough rows for its reduction policy:
    /// 24 for a representative day, at least one for a season.
    pub sufficient: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Per-Job Verification
// ============================================================================

pub fn verify_job(job: &Job) -> JobVerification {
    let mut result = JobVerification {
        job_name: job.name.clone(),
        input: job.input.display().to_string(),
        status: VerificationStatus::Failed,
        input_readable: false,
        row_count: 0,
        valid_timestamps: 0,
        columns_available: Vec::new(),
        columns_missing: Vec::new(),
        unknown_sources: Vec::new(),
        group_coverage: Vec::new(),
        error_message: None,
    };

    for spec in &job.columns {
        if !KNOWN_SOURCE_COLUMNS.contains(&spec.source.as_str()) {
            result.unknown_sources.push(spec.source.clone());
        }
    }

    let raw = match excel::load_table(&job.input, &job.timestamp_column) {
        Ok(raw) => raw,
        Err(err) => {
            result.error_message = Some(err.to_string());
            return result;
        }
    };

    result.input_readable = true;
    result.row_count = raw.row_count();

    let series = CanonicalSeries::from_raw(raw);
    result.valid_timestamps = series.valid_timestamp_count();

    for spec in &job.columns {
        if series.has_column(&spec.source) {
            result.columns_available.push(spec.source.clone());
        } else {
            result.columns_missing.push(spec.source.clone());
        }
    }

    let required_rows = match &job.grouping {
        GroupingMode::RepresentativeDay { .. } => HOURS_PER_DAY,
        GroupingMode::Season { .. } => 1,
    };
    for group in grouping::groups(&series, &job.grouping) {
        result.group_coverage.push(GroupCoverage {
            group: group.name,
            rows: group.rows.len(),
            sufficient: group.rows.len() >= required_rows,
        });
    }

    let all_columns_present = result.columns_missing.is_empty();
    let all_groups_covered = result.group_coverage.iter().all(|g| g.sufficient);

    result.status = if all_columns_present && all_groups_covered {
        VerificationStatus::Success
    } else {
        // Runnable, but some output columns or sheets will be missing-filled.
        VerificationStatus::PartialSuccess
    };

    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn run_full_verification(jobs: &[Job]) -> VerificationReport {
    let mut results = Vec::new();
    let mut summary = VerificationSummary {
        total: jobs.len(),
        passed: 0,
        partial: 0,
        failed: 0,
    };

    println!("Verifying {} configured jobs...", jobs.len());

    for job in jobs {
        print!("  {} ... ", job.name);
        let result = verify_job(job);

        match result.status {
            VerificationStatus::Success => {
                println!("OK ({} rows)", result.row_count);
                summary.passed += 1;
            }
            VerificationStatus::PartialSuccess => {
                println!(
                    "Partial (missing columns: {}, thin groups: {})",
                    result.columns_missing.len(),
                    result
                        .group_coverage
                        .iter()
                        .filter(|g| !g.sufficient)
                        .count()
                );
                summary.partial += 1;
            }
            VerificationStatus::Failed => {
                println!(
                    "FAILED: {}",
                    result.error_message.as_deref().unwrap_or("Unknown")
                );
                summary.failed += 1;
            }
        }

        results.push(result);
    }

    VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        results,
        summary,
    }
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!(
        "Jobs:    {}/{} fully runnable  ({} partial, {} failed)",
        report.summary.passed, report.summary.total, report.summary.partial, report.summary.failed
    );

    for result in &report.results {
        if !result.columns_missing.is_empty() {
            println!(
                "  {}: missing columns {:?}",
                result.job_name, result.columns_missing
            );
        }
        if !result.unknown_sources.is_empty() {
            println!(
                "  {}: sources outside the known vocabulary {:?}",
                result.job_name, result.unknown_sources
            );
        }
        for group in result.group_coverage.iter().filter(|g| !g.sufficient) {
            println!(
                "  {}: group '{}' has only {} rows",
                result.job_name, group.group, group.rows
            );
        }
    }

    println!("═══════════════════════════════════════════════════════════");
}

// ============================================================================
// Tests
// ============================================================================
