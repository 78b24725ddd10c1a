use serde::{Deserialize, Serialize};

use crate::models::{FieldSeries, ObservedField};

/// A maximal contiguous span of absent values within a field series.
///
/// `before` and `after` are the nearest present values on either side of the
/// run; they are `None` only when the run touches the start or end of the
/// year, in which case the fill strategies cannot repair it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingRun {
    pub start: usize,
    pub len: usize,
    pub before: Option<f64>,
    pub after: Option<f64>,
}

impl MissingRun {
    /// Index one past the last missing hour.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }

    pub fn touches_boundary(&self) -> bool {
        self.before.is_none() || self.after.is_none()
    }
}

/// Result of scanning one field series for missing runs.
#[derive(Debug, Clone, PartialEq)]
pub struct GapScan {
    pub field: ObservedField,
    pub runs: Vec<MissingRun>,
    pub total_missing: usize,
    pub max_run_len: usize,
}

/// Scan a field series and return every maximal missing run in
/// chronological order, along with whole-series missing counts.
///
/// Single forward pass, O(H).
pub fn scan_series(series: &FieldSeries) -> GapScan {
    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut last_present: Option<f64> = None;

    for (index, value) in series.values.iter().enumerate() {
        match value {
            Some(v) => {
                if let Some(start) = run_start.take() {
                    runs.push(MissingRun {
                        start,
                        len: index - start,
                        before: last_present,
                        after: Some(*v),
                    });
                }
                last_present = Some(*v);
            }
            None => {
                if run_start.is_none() {
                    run_start = Some(index);
                }
            }
        }
    }

    // A run still open at the end of the series has no following value.
    if let Some(start) = run_start {
        runs.push(MissingRun {
            start,
            len: series.len() - start,
            before: last_present,
            after: None,
        });
    }

    let total_missing = runs.iter().map(|r| r.len).sum();
    let max_run_len = runs.iter().map(|r| r.len).max().unwrap_or(0);

    GapScan {
        field: series.field,
        runs,
        total_missing,
        max_run_len,
    }
}
