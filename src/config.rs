use serde::{Deserialize, Serialize};

/// Policy thresholds controlling gap repair and station-year acceptance.
///
/// These four knobs are the crate's entire configuration surface. They are
/// passed explicitly into every entry point rather than held as process-wide
/// state, so concurrent callers can use different policies safely.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// Longest contiguous missing run repaired by linear interpolation.
    pub max_records_to_interpolate: usize,

    /// Longest contiguous missing run repaired by seasonal-mean imputation.
    /// Runs beyond this length reject the whole station-year.
    pub max_records_to_impute: usize,

    /// Maximum total missing hours permitted per field in a station-year.
    pub max_missing_rows: usize,

    /// Maximum consecutive missing hours permitted per field in a station-year.
    pub max_consecutive_missing_rows: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_records_to_interpolate: 6,
            max_records_to_impute: 48,
            max_missing_rows: 700,
            max_consecutive_missing_rows: 48,
        }
    }
}
