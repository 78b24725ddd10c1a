//! Unit conversion between NOAA ISD Lite source units and EPW output units.
//!
//! ISD Lite encodes temperatures and wind speed in tenths, and sea-level
//! pressure in tenths of hectopascals. EPW wants whole degrees Celsius,
//! metres per second, and atmospheric station pressure in pascals, which
//! requires an elevation correction from sea level.

use crate::error::{ProcessingError, Result};
use crate::models::ObservedField;

/// The ISD Lite missing-value sentinel, as it appears in every column.
pub const MISSING_SENTINEL: f64 = -9999.0;

/// Normalize the source missing sentinel into an explicit absent marker.
pub fn normalize_sentinel(raw: f64) -> Option<f64> {
    if raw == MISSING_SENTINEL {
        None
    } else {
        Some(raw)
    }
}

/// Converts raw ISD Lite field values into the EPW unit system.
///
/// Stateless apart from the station elevation, which the pressure
/// conversion needs. Pure per field/value pair.
#[derive(Debug, Clone, Copy)]
pub struct UnitConverter {
    elevation_m: f64,
}

impl UnitConverter {
    pub fn new(elevation_m: f64) -> Self {
        Self { elevation_m }
    }

    /// Convert a raw source-unit value to output units, failing if the
    /// result is outside the field's plausible range. An out-of-range value
    /// indicates an unrecognized sentinel or corrupt source encoding.
    pub fn convert(&self, field: ObservedField, raw: f64) -> Result<f64> {
        let converted = match field {
            ObservedField::DryBulbTemperature | ObservedField::DewPointTemperature => raw / 10.0,
            ObservedField::WindSpeed => raw / 10.0,
            ObservedField::WindDirection => raw,
            ObservedField::StationPressure => {
                sea_level_to_station_pressure(raw, self.elevation_m)
            }
        };

        let (min, max) = field.output_range();
        if converted < min || converted > max {
            return Err(ProcessingError::UnitConversion {
                field: field.name(),
                value: converted,
                min,
                max,
            });
        }

        Ok(converted)
    }
}

/// Atmospheric station pressure in Pa from sea-level pressure in tenths of
/// hectopascals and station elevation in metres.
///
/// Uses the barometric formula from https://www.weather.gov/epz/wxcalc_stationpressure
/// via an inches-of-mercury intermediate.
pub fn sea_level_to_station_pressure(slp_tenths_hpa: f64, elevation_m: f64) -> f64 {
    // tenths of hectopascals -> inHg
    let slp_in_hg = slp_tenths_hpa / 10.0 * 0.029529983071445;

    let station_in_hg = slp_in_hg * ((288.0 - 0.0065 * elevation_m) / 288.0).powf(5.2561);

    // inHg -> Pa
    station_in_hg * 3386.389
}
