/// Job configuration loading.
///
/// A job file is a TOML document holding an ordered list of extraction
/// jobs — the data-driven replacement for one hand-written pipeline per
/// dataset. Each entry names its input and output workbooks, the ordered
/// source-to-label column mapping, and the grouping mode with its group
/// definitions. Shipped configurations live under `config/`.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::model::{ColumnSpec, GroupingMode, Job, MonthGroup, SeasonGroup};

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JobFile {
    #[serde(rename = "job", default)]
    jobs: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
struct JobEntry {
    name: String,
    input: String,
    output: String,
    #[serde(default = "default_timestamp_column")]
    timestamp_column: String,
    #[serde(default)]
    columns: Vec<ColumnEntry>,
    grouping: GroupingEntry,
}

fn default_timestamp_column() -> String {
    crate::model::DEFAULT_TIMESTAMP_COLUMN.to_string()
}

#[derive(Debug, Deserialize)]
struct ColumnEntry {
    source: String,
    label: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
enum GroupingEntry {
    RepresentativeDay { months: Vec<MonthEntry> },
    Season { seasons: Vec<SeasonEntry> },
}

#[derive(Debug, Deserialize)]
struct MonthEntry {
    month: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SeasonEntry {
    name: String,
    months: Vec<u32>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The job file could not be read from disk.
    Io { path: String, detail: String },
    /// The job file is not valid TOML for the expected schema.
    Parse { path: String, detail: String },
    /// The job file parsed but violates a structural rule.
    Invalid { job: String, detail: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, detail } => {
                write!(f, "cannot read job file {}: {}", path, detail)
            }
            ConfigError::Parse { path, detail } => {
                write!(f, "cannot parse job file {}: {}", path, detail)
            }
            ConfigError::Invalid { job, detail } => {
                write!(f, "invalid job '{}': {}", job, detail)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate every job in a TOML job file, preserving file order.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    parse_jobs(&text, path)
}

/// Parse job definitions from TOML text. Split from `load_jobs` so tests
/// can exercise validation without touching the filesystem.
pub fn parse_jobs(text: &str, path: &Path) -> Result<Vec<Job>, ConfigError> {
    let file: JobFile = toml::from_str(text).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;

    if file.jobs.is_empty() {
        return Err(ConfigError::Parse {
            path: path.display().to_string(),
            detail: "job file declares no [[job]] entries".to_string(),
        });
    }

    file.jobs.into_iter().map(validate_job).collect()
}

fn validate_job(entry: JobEntry) -> Result<Job, ConfigError> {
    let invalid = |detail: String| ConfigError::Invalid {
        job: entry.name.clone(),
        detail,
    };

    if entry.name.trim().is_empty() {
        return Err(ConfigError::Invalid {
            job: "<unnamed>".to_string(),
            detail: "job name must not be empty".to_string(),
        });
    }
    if entry.columns.is_empty() {
        return Err(invalid("job declares no columns".to_string()));
    }

    let mut labels = HashSet::new();
    for column in &entry.columns {
        if !labels.insert(column.label.as_str()) {
            return Err(invalid(format!(
                "duplicate output label '{}'",
                column.label
            )));
        }
    }

    let grouping = match entry.grouping {
        GroupingEntry::RepresentativeDay { months } => {
            if months.is_empty() {
                return Err(invalid("representative-day mode declares no months".to_string()));
            }
            let mut seen = HashSet::new();
            for month in &months {
                check_month(month.month).map_err(&invalid)?;
                if !seen.insert(month.month) {
                    return Err(invalid(format!("month {} declared twice", month.month)));
                }
            }
            check_unique_group_names(months.iter().map(|m| m.name.as_str())).map_err(&invalid)?;
            GroupingMode::RepresentativeDay {
                months: months
                    .into_iter()
                    .map(|m| MonthGroup {
                        month: m.month,
                        name: m.name,
                    })
                    .collect(),
            }
        }
        GroupingEntry::Season { seasons } => {
            if seasons.is_empty() {
                return Err(invalid("season mode declares no seasons".to_string()));
            }
            for season in &seasons {
                if season.months.is_empty() {
                    return Err(invalid(format!("season '{}' has no months", season.name)));
                }
                for &month in &season.months {
                    check_month(month).map_err(&invalid)?;
                }
            }
            check_unique_group_names(seasons.iter().map(|s| s.name.as_str())).map_err(&invalid)?;
            GroupingMode::Season {
                seasons: seasons
                    .into_iter()
                    .map(|s| SeasonGroup {
                        name: s.name,
                        months: s.months,
                    })
                    .collect(),
            }
        }
    };

    Ok(Job {
        name: entry.name,
        input: PathBuf::from(entry.input),
        output: PathBuf::from(entry.output),
        timestamp_column: entry.timestamp_column,
        columns: entry
            .columns
            .into_iter()
            .map(|c| ColumnSpec {
                source: c.source,
                label: c.label,
            })
            .collect(),
        grouping,
    })
}

fn check_month(month: u32) -> Result<(), String> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(format!("month {} is outside 1-12", month))
    }
}

fn check_unique_group_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(format!("group name '{}' declared twice", name));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_JOB: &str = r#"
        [[job]]
        name = "P11"
        input = "RES_P11.xlsx"
        output = "Result_P11.xlsx"
        columns = [
            { source = "Total Electrical Load Served", label = "بار" },
        ]

        [job.grouping]
        mode = "representative-day"
        months = [
            { month = 2, name = "February" },
            { month = 5, name = "May" },
        ]
    "#;

    const SEASON_JOB: &str = r#"
        [[job]]
        name = "P112"
        input = "RES_P112.xlsx"
        output = "Result_P112.xlsx"
        columns = [
            { source = "Grid Purchases", label = "خرید از شبکه" },
        ]

        [job.grouping]
        mode = "season"
        seasons = [
            { name = "Winter", months = [1, 2, 3] },
            { name = "Autumn", months = [10, 11, 12] },
        ]
    "#;

    fn parse(text: &str) -> Result<Vec<Job>, ConfigError> {
        parse_jobs(text, Path::new("jobs.toml"))
    }

    #[test]
    fn test_day_job_parses_with_defaults() {
        let jobs = parse(DAY_JOB).expect("valid job file");
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.name, "P11");
        assert_eq!(job.timestamp_column, "Time");
        assert_eq!(job.columns[0].label, "بار");
        match &job.grouping {
            GroupingMode::RepresentativeDay { months } => {
                assert_eq!(months.len(), 2);
                assert_eq!(months[0].name, "February");
            }
            other => panic!("expected representative-day mode, got {:?}", other),
        }
    }

    #[test]
    fn test_season_job_parses_month_sets() {
        let jobs = parse(SEASON_JOB).expect("valid job file");
        match &jobs[0].grouping {
            GroupingMode::Season { seasons } => {
                assert_eq!(seasons[0].months, vec![1, 2, 3]);
                assert_eq!(seasons[1].name, "Autumn");
            }
            other => panic!("expected season mode, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_labels_are_rejected() {
        let text = r#"
            [[job]]
            name = "P11"
            input = "in.xlsx"
            output = "out.xlsx"
            columns = [
                { source = "Grid Sales", label = "فروش به شبکه" },
                { source = "Excess Electrical Production", label = "فروش به شبکه" },
            ]

            [job.grouping]
            mode = "representative-day"
            months = [{ month = 2, name = "February" }]
        "#;
        let err = parse(text).expect_err("duplicate labels must be rejected");
        assert!(matches!(err, ConfigError::Invalid { .. }), "got {:?}", err);
    }

    #[test]
    fn test_month_out_of_range_is_rejected() {
        let text = r#"
            [[job]]
            name = "P11"
            input = "in.xlsx"
            output = "out.xlsx"
            columns = [{ source = "Grid Sales", label = "x" }]

            [job.grouping]
            mode = "representative-day"
            months = [{ month = 13, name = "Undecimber" }]
        "#;
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_season_without_months_is_rejected() {
        let text = r#"
            [[job]]
            name = "P11"
            input = "in.xlsx"
            output = "out.xlsx"
            columns = [{ source = "Grid Sales", label = "x" }]

            [job.grouping]
            mode = "season"
            seasons = [{ name = "Winter", months = [] }]
        "#;
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_empty_job_file_is_rejected() {
        assert!(parse("").is_err());
    }

    #[test]
    fn test_job_order_is_preserved() {
        let text = format!("{}\n{}", DAY_JOB, SEASON_JOB);
        let jobs = parse(&text).expect("valid job file");
        let names: Vec<_> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["P11", "P112"]);
    }

    #[test]
    fn test_custom_timestamp_column_overrides_default() {
        let text = r#"
            [[job]]
            name = "P11"
            input = "in.xlsx"
            output = "out.xlsx"
            timestamp_column = "Zeit"
            columns = [{ source = "Grid Sales", label = "x" }]

            [job.grouping]
            mode = "representative-day"
            months = [{ month = 2, name = "February" }]
        "#;
        let jobs = parse(text).expect("valid job file");
        assert_eq!(jobs[0].timestamp_column, "Zeit");
    }
}
