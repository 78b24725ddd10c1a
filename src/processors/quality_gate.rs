use tracing::{debug, warn};

use crate::config::Thresholds;
use crate::models::{FieldGapStats, QualityVerdict, Rejection, RejectionReason};
use crate::processors::gap_detector::GapScan;

/// Accepts or rejects a station-year before any fill work is attempted.
///
/// A station-year passes only if every substituted field stays within both
/// the total-missing and the max-consecutive-missing limits. Limits are
/// inclusive: a field sitting exactly on a threshold is accepted.
pub struct QualityGate {
    max_missing_rows: usize,
    max_consecutive_missing_rows: usize,
}

impl QualityGate {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            max_missing_rows: thresholds.max_missing_rows,
            max_consecutive_missing_rows: thresholds.max_consecutive_missing_rows,
        }
    }

    pub fn evaluate(&self, scans: &[GapScan]) -> QualityVerdict {
        let mut field_stats = Vec::with_capacity(scans.len());
        let mut rejections = Vec::new();

        for scan in scans {
            field_stats.push(FieldGapStats {
                field: scan.field,
                total_missing: scan.total_missing,
                max_consecutive_missing: scan.max_run_len,
            });

            if scan.total_missing > self.max_missing_rows {
                rejections.push(Rejection {
                    field: scan.field,
                    reason: RejectionReason::TooManyMissing {
                        measured: scan.total_missing,
                        limit: self.max_missing_rows,
                    },
                });
            }

            if scan.max_run_len > self.max_consecutive_missing_rows {
                rejections.push(Rejection {
                    field: scan.field,
                    reason: RejectionReason::RunTooLong {
                        measured: scan.max_run_len,
                        limit: self.max_consecutive_missing_rows,
                    },
                });
            }
        }

        let verdict = QualityVerdict {
            accepted: rejections.is_empty(),
            field_stats,
            rejections,
        };

        if verdict.accepted {
            debug!("station-year accepted by quality gate");
        } else {
            warn!(
                reasons = %verdict.rejection_summary(),
                "station-year rejected by quality gate"
            );
        }

        verdict
    }
}
