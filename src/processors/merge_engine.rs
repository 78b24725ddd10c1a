use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{EpwRecord, EpwTemplate, FieldSeries, ObservedField};

/// Overlays cleaned observed field series onto a TMY template, producing
/// the record sequence of an AMY EPW file.
///
/// The template is read-only; the engine owns the output sequence. Every
/// non-substituted column of every output record is the template's value,
/// unchanged.
pub struct MergeEngine;

impl MergeEngine {
    pub fn new() -> Self {
        Self
    }

    /// Merge one filled series per substituted field into the template.
    ///
    /// Each series must cover exactly the template's hour count; a
    /// leap-year mismatch surfaces as `LengthMismatch` and must be resolved
    /// by the caller with a template of the matching year type. Series must
    /// be gap-free: merging is downstream of filling.
    pub fn merge(
        &self,
        template: &EpwTemplate,
        year: i32,
        series: &[FieldSeries],
    ) -> Result<Vec<EpwRecord>> {
        for field in ObservedField::ALL {
            if !series.iter().any(|s| s.field == field) {
                return Err(ProcessingError::MissingData(format!(
                    "no series supplied for substituted field {field}"
                )));
            }
        }

        let hours = template.hours();
        for s in series {
            if s.len() != hours {
                return Err(ProcessingError::LengthMismatch {
                    series: s.field.name().to_string(),
                    expected: hours,
                    actual: s.len(),
                });
            }
        }

        let mut merged = Vec::with_capacity(hours);
        for (hour, template_record) in template.records.iter().enumerate() {
            let mut record = template_record.clone();
            record.year = year;

            for s in series {
                let value = s.values[hour].ok_or_else(|| {
                    ProcessingError::MissingData(format!(
                        "{} still missing at hour {hour} after filling",
                        s.field
                    ))
                })?;
                record.set_observed(s.field, value);
            }

            merged.push(record);
        }

        debug!(hours = merged.len(), year, "merged observed fields into template");

        Ok(merged)
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}
