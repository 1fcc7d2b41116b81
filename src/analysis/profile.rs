/// Hourly reduction: one group and one column in, 24 slots out.
///
/// Two policies, matching the two grouping modes. Both always produce
/// exactly `HOURS_PER_DAY` slots no matter how much data the group holds,
/// and both are pure — outcomes are returned to the caller, which owns the
/// diagnostics channel.

use chrono::{NaiveDateTime, Timelike};

use crate::model::{HOURS_PER_DAY, HourlyProfile};

// ---------------------------------------------------------------------------
// Representative-day policy
// ---------------------------------------------------------------------------

/// How a representative-day reduction went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayProfileOutcome {
    /// 24 rows taken, parsed hours ran 0..23 as assumed.
    Complete,
    /// 24 rows taken positionally, but their parsed hours did not run
    /// 0..23 — the source skipped or duplicated an hour within the day.
    /// Values are preserved positionally; callers should warn.
    Misaligned,
    /// Fewer than 24 qualifying rows; the profile is entirely missing.
    Shortfall { available: usize },
}

/// Take-first-24 reduction.
///
/// Requires at least 24 qualifying rows. The first 24 in timestamp order
/// are used positionally as hours 0-23; individual cells may still be
/// missing. With fewer than 24 rows the whole profile is missing and the
/// shortfall count is reported.
///
/// The positional mapping deliberately mirrors shipped behavior: the hour
/// slots come from row order, not from each row's parsed hour. When the two
/// disagree the outcome says so instead of silently reindexing.
pub fn reduce_day_profile(
    timestamps: &[Option<NaiveDateTime>],
    values: &[Option<f64>],
    rows: &[usize],
) -> (HourlyProfile, DayProfileOutcome) {
    if rows.len() < HOURS_PER_DAY {
        return (
            HourlyProfile::missing(),
            DayProfileOutcome::Shortfall {
                available: rows.len(),
            },
        );
    }

    let mut slots = [None; HOURS_PER_DAY];
    let mut aligned = true;
    for (hour, &row) in rows.iter().take(HOURS_PER_DAY).enumerate() {
        slots[hour] = values[row];
        let parsed_hour = timestamps[row].map(|ts| ts.hour() as usize);
        if parsed_hour != Some(hour) {
            aligned = false;
        }
    }

    let outcome = if aligned {
        DayProfileOutcome::Complete
    } else {
        DayProfileOutcome::Misaligned
    };
    (HourlyProfile::from_values(slots), outcome)
}

// ---------------------------------------------------------------------------
// Season policy
// ---------------------------------------------------------------------------

/// Average-by-hour reduction.
///
/// Buckets the group's rows by parsed hour-of-day and takes the arithmetic
/// mean of the present values in each bucket. An hour with no contributing
/// present values gets the missing marker — never a computed zero.
pub fn reduce_hourly_mean(
    timestamps: &[Option<NaiveDateTime>],
    values: &[Option<f64>],
    rows: &[usize],
) -> HourlyProfile {
    let mut sums = [0.0_f64; HOURS_PER_DAY];
    let mut counts = [0_usize; HOURS_PER_DAY];

    for &row in rows {
        let hour = match timestamps[row] {
            Some(ts) => ts.hour() as usize,
            None => continue,
        };
        if let Some(value) = values[row] {
            sums[hour] += value;
            counts[hour] += 1;
        }
    }

    let mut slots = [None; HOURS_PER_DAY];
    for hour in 0..HOURS_PER_DAY {
        if counts[hour] > 0 {
            slots[hour] = Some(sums[hour] / counts[hour] as f64);
        }
    }
    HourlyProfile::from_values(slots)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
