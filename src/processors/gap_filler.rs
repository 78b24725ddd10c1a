use tracing::debug;

use crate::config::Thresholds;
use crate::error::{ProcessingError, Result};
use crate::models::FieldSeries;
use crate::processors::gap_detector::{scan_series, MissingRun};

/// Hours stepped per day when collecting the seasonal-mean window.
const HOURS_PER_DAY: usize = 24;

/// Days looked back and ahead when imputing from the seasonal mean.
const IMPUTATION_RANGE_DAYS: i64 = 14;

/// Summary of the repairs applied to one field series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillSummary {
    pub interpolated_runs: usize,
    pub imputed_runs: usize,
    pub hours_filled: usize,
}

/// Repairs missing runs in a field series using linear interpolation for
/// short gaps and seasonal-mean imputation for longer ones.
pub struct GapFiller {
    max_interpolate: usize,
    max_impute: usize,
}

impl GapFiller {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            max_interpolate: thresholds.max_records_to_interpolate,
            max_impute: thresholds.max_records_to_impute,
        }
    }

    /// Fill every missing run in the series in place.
    ///
    /// All runs are checked before any value is written: a run longer than
    /// the imputation limit or touching the year boundary fails the whole
    /// series and leaves it unmutated. Boundary runs are rejected rather
    /// than repaired one-sided because both strategies need a neighbouring
    /// value on each side.
    pub fn fill(&self, series: &mut FieldSeries) -> Result<FillSummary> {
        let scan = scan_series(series);

        let mut repairs: Vec<(MissingRun, f64, f64)> = Vec::with_capacity(scan.runs.len());
        for run in &scan.runs {
            if run.len > self.max_impute {
                return Err(ProcessingError::GapTooLarge {
                    field: series.field.name(),
                    start: run.start,
                    length: run.len,
                    max_allowed: self.max_impute,
                });
            }

            match (run.before, run.after) {
                (Some(before), Some(after)) => repairs.push((*run, before, after)),
                _ => {
                    return Err(ProcessingError::BoundaryGap {
                        field: series.field.name(),
                        start: run.start,
                        length: run.len,
                    })
                }
            }
        }

        let mut summary = FillSummary {
            interpolated_runs: 0,
            imputed_runs: 0,
            hours_filled: 0,
        };

        for (run, before, after) in repairs {
            if run.len <= self.max_interpolate {
                interpolate_run(series, &run, before, after);
                summary.interpolated_runs += 1;
            } else {
                self.impute_run(series, &run, before, after)?;
                summary.imputed_runs += 1;
            }
            summary.hours_filled += run.len;
        }

        debug!(
            field = series.field.name(),
            interpolated = summary.interpolated_runs,
            imputed = summary.imputed_runs,
            hours = summary.hours_filled,
            "filled missing runs"
        );

        Ok(summary)
    }

    /// Fill a run with the seasonal mean of each missing hour, blending the
    /// first and last hours with the observed neighbours to smooth the
    /// transition between computed and observed values.
    fn impute_run(
        &self,
        series: &mut FieldSeries,
        run: &MissingRun,
        before: f64,
        after: f64,
    ) -> Result<()> {
        for offset in 1..=run.len {
            let index = run.start + offset - 1;
            let seasonal = seasonal_mean(series, index, run)?;

            let value = if run.len == 1 {
                // A single-hour imputed run is both the first and the last
                // hour of its run, so it blends with both neighbours.
                (seasonal + (before + after) / 2.0) / 2.0
            } else if offset == 1 {
                (seasonal + before) / 2.0
            } else if offset == run.len {
                (seasonal + after) / 2.0
            } else {
                seasonal
            };

            series.values[index] = Some(value);
        }

        Ok(())
    }
}

/// Linear interpolation between the values on either side of the run.
fn interpolate_run(series: &mut FieldSeries, run: &MissingRun, before: f64, after: f64) {
    let slope = (after - before) / (run.len + 1) as f64;
    for offset in 1..=run.len {
        series.values[run.start + offset - 1] = Some(before + slope * offset as f64);
    }
}

/// Mean of all present values at the same hour of day within the
/// surrounding month of the target hour.
///
/// The window extends 14 days back and 14 days ahead, stepping one day at a
/// time, clipped to the year. It never wraps to the other end of the year,
/// and hours inside the run being repaired never contribute.
fn seasonal_mean(series: &FieldSeries, target: usize, run: &MissingRun) -> Result<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for day in -IMPUTATION_RANGE_DAYS..=IMPUTATION_RANGE_DAYS {
        let index = target as i64 + day * HOURS_PER_DAY as i64;
        if index < 0 || index >= series.len() as i64 {
            continue;
        }

        let index = index as usize;
        if run.contains(index) {
            continue;
        }

        if let Some(value) = series.values[index] {
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        return Err(ProcessingError::InsufficientData {
            field: series.field.name(),
            hour: target,
        });
    }

    Ok(sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObservedField;
    use pretty_assertions::assert_eq;

    fn thresholds(interpolate: usize, impute: usize) -> Thresholds {
        Thresholds {
            max_records_to_interpolate: interpolate,
            max_records_to_impute: impute,
            ..Thresholds::default()
        }
    }

    fn series(values: Vec<Option<f64>>) -> FieldSeries {
        FieldSeries::new(ObservedField::DryBulbTemperature, values)
    }

    /// A year-long series with one value per hour, where every hour of a
    /// given day carries the day number as its value.
    fn day_number_series() -> FieldSeries {
        series(
            (0..8760)
                .map(|hour| Some((hour / HOURS_PER_DAY) as f64))
                .collect(),
        )
    }

    #[test]
    fn test_linear_interpolation_exact_values() {
        let mut s = series(vec![
            Some(20.0),
            None,
            None,
            None,
            None,
            Some(25.0),
        ]);

        let filler = GapFiller::new(&thresholds(6, 48));
        let summary = filler.fill(&mut s).unwrap();

        let filled: Vec<f64> = s.values.iter().map(|v| v.unwrap()).collect();
        assert_eq!(filled, vec![20.0, 21.0, 22.0, 23.0, 24.0, 25.0]);
        assert_eq!(summary.interpolated_runs, 1);
        assert_eq!(summary.hours_filled, 4);
    }

    #[test]
    fn test_interpolation_stays_within_neighbour_bounds() {
        for (p, s_val) in [(5.0, 30.0), (30.0, 5.0), (10.0, 10.0)] {
            let mut s = series(vec![Some(p), None, None, None, Some(s_val)]);
            GapFiller::new(&thresholds(6, 48)).fill(&mut s).unwrap();

            let lo = p.min(s_val);
            let hi = p.max(s_val);
            for value in s.values.iter().map(|v| v.unwrap()) {
                assert!(value >= lo && value <= hi);
            }
            // Endpoints unchanged
            assert_eq!(s.values[0], Some(p));
            assert_eq!(s.values[4], Some(s_val));
        }
    }

    #[test]
    fn test_imputation_interior_and_blended_boundaries() {
        let mut s = day_number_series();
        // Overwrite a flat stretch so the seasonal mean is predictable:
        // every hour of days 5..40 gets value 10, then carve out a gap.
        for hour in 5 * HOURS_PER_DAY..40 * HOURS_PER_DAY {
            s.values[hour] = Some(10.0);
        }
        let start = 20 * HOURS_PER_DAY;
        let len = 8;
        for index in start..start + len {
            s.values[index] = None;
        }
        s.values[start - 1] = Some(20.0); // p
        s.values[start + len] = Some(30.0); // s

        let filler = GapFiller::new(&thresholds(6, 48));
        let summary = filler.fill(&mut s).unwrap();
        assert_eq!(summary.imputed_runs, 1);

        // Interior hours take the seasonal mean exactly; the window around
        // each is all 10s apart from the excluded in-run hours.
        for index in start + 1..start + len - 1 {
            assert_eq!(s.values[index], Some(10.0));
        }
        // First hour blends the seasonal mean with the preceding value.
        assert_eq!(s.values[start], Some((10.0 + 20.0) / 2.0));
        // Last hour blends the seasonal mean with the following value.
        assert_eq!(s.values[start + len - 1], Some((10.0 + 30.0) / 2.0));
    }

    #[test]
    fn test_gap_too_large_leaves_series_unmutated() {
        let mut values: Vec<Option<f64>> = vec![Some(1.0); 200];
        for slot in values.iter_mut().skip(50).take(49) {
            *slot = None;
        }
        let mut s = series(values);
        let original = s.clone();

        let filler = GapFiller::new(&thresholds(6, 48));
        let result = filler.fill(&mut s);

        assert!(matches!(
            result,
            Err(ProcessingError::GapTooLarge {
                length: 49,
                max_allowed: 48,
                ..
            })
        ));
        assert_eq!(s, original);
    }

    #[test]
    fn test_run_at_impute_limit_is_filled() {
        let mut values: Vec<Option<f64>> = (0..8760)
            .map(|hour| Some((hour / HOURS_PER_DAY) as f64))
            .collect();
        let start = 100 * HOURS_PER_DAY;
        for slot in values.iter_mut().skip(start).take(48) {
            *slot = None;
        }
        let mut s = series(values);

        let filler = GapFiller::new(&thresholds(6, 48));
        assert!(filler.fill(&mut s).is_ok());
        assert_eq!(s.missing_count(), 0);
    }

    #[test]
    fn test_threshold_flip_between_interpolation_and_imputation() {
        // Six consecutive missing hours on a series whose seasonal mean
        // differs from the straight line between the neighbours.
        let build = || {
            let mut s = day_number_series();
            let start = 50 * HOURS_PER_DAY;
            for index in start..start + 6 {
                s.values[index] = None;
            }
            (s, start)
        };

        // With the interpolation limit at 6 the run is interpolated: values
        // climb linearly from the neighbours.
        let (mut interpolated, start) = build();
        GapFiller::new(&thresholds(6, 48))
            .fill(&mut interpolated)
            .unwrap();

        let p = interpolated.values[start - 1].unwrap();
        let s_val = interpolated.values[start + 6].unwrap();
        let expected = p + (s_val - p) * 1.0 / 7.0;
        assert!((interpolated.values[start].unwrap() - expected).abs() < 1e-9);

        // With the limit at 5 the same run is imputed instead, so the
        // interior values sit on the seasonal mean rather than the line.
        let (mut imputed, start) = build();
        GapFiller::new(&thresholds(5, 48)).fill(&mut imputed).unwrap();

        assert_ne!(imputed.values[start + 2], interpolated.values[start + 2]);
        // Interior of the imputed run equals the window mean exactly: days
        // 36..64 carry their day number, with day 50's own hour excluded.
        let window_mean = ((36..=64).map(|d| d as f64).sum::<f64>() - 50.0) / 28.0;
        assert!((imputed.values[start + 2].unwrap() - window_mean).abs() < 1e-9);
    }

    #[test]
    fn test_window_clips_at_year_start_without_wrapping() {
        let mut s = day_number_series();
        // Gap early in the year: only the forward half of the window exists.
        let start = 2 * HOURS_PER_DAY;
        for index in start..start + 8 {
            s.values[index] = None;
        }

        GapFiller::new(&thresholds(6, 48)).fill(&mut s).unwrap();

        // Window for an interior hour of day 2 spans days 0..16 clipped,
        // minus the in-run hour of day 2 itself. If the window wrapped, day
        // numbers in the 350s would drag the mean far upward.
        let days: Vec<f64> = (0..=16).filter(|d| *d != 2).map(|d| d as f64).collect();
        let expected = days.iter().sum::<f64>() / days.len() as f64;
        let interior = s.values[start + 3].unwrap();
        assert!((interior - expected).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_run_is_rejected() {
        let mut s = series(vec![None, None, Some(1.0), Some(2.0)]);
        let original = s.clone();

        let result = GapFiller::new(&thresholds(6, 48)).fill(&mut s);

        assert!(matches!(
            result,
            Err(ProcessingError::BoundaryGap { start: 0, length: 2, .. })
        ));
        assert_eq!(s, original);
    }

    #[test]
    fn test_insufficient_window_data() {
        // The only same-hour candidates for the missing hour are inside the
        // run itself or missing, so the seasonal mean has no samples.
        let mut values: Vec<Option<f64>> = vec![Some(1.0); 31];
        values[5] = None;
        values[29] = None;
        let mut s = series(values);

        let result = GapFiller::new(&thresholds(0, 48)).fill(&mut s);

        assert!(matches!(
            result,
            Err(ProcessingError::InsufficientData { hour: 5, .. })
        ));
    }

    #[test]
    fn test_no_gaps_is_a_no_op() {
        let mut s = series(vec![Some(1.0), Some(2.0)]);
        let summary = GapFiller::new(&thresholds(6, 48)).fill(&mut s).unwrap();
        assert_eq!(summary.hours_filled, 0);
        assert_eq!(summary.interpolated_runs, 0);
        assert_eq!(summary.imputed_runs, 0);
    }
}
