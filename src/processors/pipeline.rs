use tracing::info;
use validator::Validate;

use crate::config::Thresholds;
use crate::error::{ProcessingError, Result};
use crate::models::observation::hours_in_year;
use crate::models::{
    EpwRecord, EpwTemplate, FieldSeries, HourlyObservation, ObservedField, QualityVerdict,
};
use crate::processors::gap_detector::scan_series;
use crate::processors::gap_filler::GapFiller;
use crate::processors::merge_engine::MergeEngine;
use crate::processors::quality_gate::QualityGate;
use crate::units::UnitConverter;

/// Result of processing one station-year.
///
/// Rejection by the quality gate is a soft, reportable outcome; hard fill
/// failures surface as `ProcessingError` instead. Callers processing a
/// batch report rejections and move on.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Completed {
        records: Vec<EpwRecord>,
        verdict: QualityVerdict,
    },
    Rejected(QualityVerdict),
}

/// Runs one station-year through extraction, the quality gate, gap
/// filling, and merging.
///
/// Stateless between invocations: each call allocates only per-call data,
/// so independent station-years can be processed from parallel workers.
pub struct StationYearProcessor {
    thresholds: Thresholds,
}

impl StationYearProcessor {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Process an aligned station-year of observations against a template.
    ///
    /// `aligned` must hold one slot per hour of `year`, in order; the
    /// template must cover the same number of hours (choose a template of
    /// the matching year type for leap years).
    pub fn process(
        &self,
        aligned: &[Option<HourlyObservation>],
        template: &EpwTemplate,
        year: i32,
    ) -> Result<ProcessOutcome> {
        let expected_hours = hours_in_year(year);
        if aligned.len() != expected_hours {
            return Err(ProcessingError::LengthMismatch {
                series: "observations".to_string(),
                expected: expected_hours,
                actual: aligned.len(),
            });
        }

        let converter = UnitConverter::new(template.header.elevation);

        let mut series: Vec<FieldSeries> = Vec::with_capacity(ObservedField::ALL.len());
        for field in ObservedField::ALL {
            series.push(FieldSeries::extract(field, aligned, &converter)?);
        }

        let scans: Vec<_> = series.iter().map(scan_series).collect();
        let verdict = QualityGate::new(&self.thresholds).evaluate(&scans);
        if !verdict.accepted {
            return Ok(ProcessOutcome::Rejected(verdict));
        }

        let filler = GapFiller::new(&self.thresholds);
        for s in series.iter_mut() {
            filler.fill(s)?;
        }

        let records = MergeEngine::new().merge(template, year, &series)?;

        // Filled values were range-checked at conversion time, but blending
        // and imputation produce new values, so the merged records are
        // validated against the EPW ranges as a whole.
        for record in &records {
            record.validate()?;
        }

        info!(
            year,
            station = template.header.station_number,
            hours = records.len(),
            "station-year processed"
        );

        Ok(ProcessOutcome::Completed { records, verdict })
    }
}
