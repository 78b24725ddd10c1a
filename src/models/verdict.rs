use serde::{Deserialize, Serialize};

use crate::models::ObservedField;

/// Per-field missing-data measurements, as reported by the gap scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGapStats {
    pub field: ObservedField,
    pub total_missing: usize,
    pub max_consecutive_missing: usize,
}

/// Which acceptance threshold a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    TooManyMissing { measured: usize, limit: usize },
    RunTooLong { measured: usize, limit: usize },
}

impl RejectionReason {
    pub fn describe(&self) -> String {
        match self {
            RejectionReason::TooManyMissing { measured, limit } => {
                format!("{measured} missing rows, but maximum allowed is {limit}")
            }
            RejectionReason::RunTooLong { measured, limit } => {
                format!("{measured} consecutive missing rows, but maximum allowed is {limit}")
            }
        }
    }
}

/// One threshold violation, carrying enough detail for a batch-level
/// diagnostics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub field: ObservedField,
    pub reason: RejectionReason,
}

/// Outcome of the quality gate for one station-year.
///
/// Rejection is an expected, reportable result, not an error: callers
/// distinguish it from hard fill failures and keep processing their batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub accepted: bool,
    pub field_stats: Vec<FieldGapStats>,
    pub rejections: Vec<Rejection>,
}

impl QualityVerdict {
    pub fn stats_for(&self, field: ObservedField) -> Option<&FieldGapStats> {
        self.field_stats.iter().find(|s| s.field == field)
    }

    /// Human-readable summary of why the station-year was rejected.
    pub fn rejection_summary(&self) -> String {
        self.rejections
            .iter()
            .map(|r| format!("{}: {}", r.field, r.reason.describe()))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
