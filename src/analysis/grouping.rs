/// Temporal partitioning of the canonical series.
///
/// A grouping mode declares a fixed set of named groups; `groups` yields
/// them lazily in declaration order, each holding the row indices that
/// belong to it. Rows whose timestamp failed to parse match no group.

use chrono::Datelike;

use crate::model::{GroupingMode, REPRESENTATIVE_DAY};
use crate::series::CanonicalSeries;

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// One named partition of the series: the group's sheet name plus the
/// indices of its member rows, in series (timestamp) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalGroup {
    pub name: String,
    pub rows: Vec<usize>,
}

impl TemporalGroup {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Membership rule for one declared group.
#[derive(Debug, Clone)]
enum GroupSelector {
    /// Representative day: month matches and day-of-month is the 15th.
    MonthDay { month: u32 },
    /// Season: month is a member of the (possibly non-contiguous) set.
    Months(Vec<u32>),
}

impl GroupSelector {
    fn matches(&self, timestamp: chrono::NaiveDateTime) -> bool {
        match self {
            GroupSelector::MonthDay { month } => {
                timestamp.month() == *month && timestamp.day() == REPRESENTATIVE_DAY
            }
            GroupSelector::Months(months) => months.contains(&timestamp.month()),
        }
    }
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Yield the declared groups in declaration order.
///
/// The sequence is lazy (each group's membership is computed when the
/// iterator reaches it), finite, and restartable — calling `groups` again
/// rebuilds the identical sequence. Groups only cover the configured set:
/// months absent from the configuration contribute rows to no group.
pub fn groups<'a>(
    series: &'a CanonicalSeries,
    mode: &GroupingMode,
) -> impl Iterator<Item = TemporalGroup> + 'a {
    let declared: Vec<(String, GroupSelector)> = match mode {
        GroupingMode::RepresentativeDay { months } => months
            .iter()
            .map(|m| (m.name.clone(), GroupSelector::MonthDay { month: m.month }))
            .collect(),
        GroupingMode::Season { seasons } => seasons
            .iter()
            .map(|s| (s.name.clone(), GroupSelector::Months(s.months.clone())))
            .collect(),
    };

    declared.into_iter().map(move |(name, selector)| {
        let rows = series
            .timestamps()
            .iter()
            .enumerate()
            .filter_map(|(row, ts)| match ts {
                Some(ts) if selector.matches(*ts) => Some(row),
                _ => None,
            })
            .collect();
        TemporalGroup { name, rows }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
