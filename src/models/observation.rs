use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::units::UnitConverter;

/// The five EPW fields that are substituted from observed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservedField {
    DryBulbTemperature,
    DewPointTemperature,
    StationPressure,
    WindDirection,
    WindSpeed,
}

impl ObservedField {
    pub const ALL: [ObservedField; 5] = [
        ObservedField::DryBulbTemperature,
        ObservedField::DewPointTemperature,
        ObservedField::StationPressure,
        ObservedField::WindDirection,
        ObservedField::WindSpeed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ObservedField::DryBulbTemperature => "dry_bulb_temperature",
            ObservedField::DewPointTemperature => "dew_point_temperature",
            ObservedField::StationPressure => "atmospheric_station_pressure",
            ObservedField::WindDirection => "wind_direction",
            ObservedField::WindSpeed => "wind_speed",
        }
    }

    /// Plausible range of the field in output units, per the EPW data
    /// dictionary. Values outside this range cannot appear in an EPW file.
    pub fn output_range(&self) -> (f64, f64) {
        match self {
            ObservedField::DryBulbTemperature => (-70.0, 70.0),
            ObservedField::DewPointTemperature => (-70.0, 70.0),
            ObservedField::StationPressure => (31_000.0, 120_000.0),
            ObservedField::WindDirection => (0.0, 360.0),
            ObservedField::WindSpeed => (0.0, 40.0),
        }
    }
}

impl std::fmt::Display for ObservedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed ISD Lite source row.
///
/// Values are raw source units: temperatures and wind speed in tenths,
/// sea-level pressure in tenths of hectopascals, wind direction in degrees.
/// The source's -9999 missing sentinel has already been normalized to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    pub timestamp: NaiveDateTime,
    pub air_temperature: Option<f64>,
    pub dew_point_temperature: Option<f64>,
    pub sea_level_pressure: Option<f64>,
    pub wind_direction: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl HourlyObservation {
    /// Raw source-unit value of one of the substituted fields.
    pub fn raw_value(&self, field: ObservedField) -> Option<f64> {
        match field {
            ObservedField::DryBulbTemperature => self.air_temperature,
            ObservedField::DewPointTemperature => self.dew_point_temperature,
            ObservedField::StationPressure => self.sea_level_pressure,
            ObservedField::WindDirection => self.wind_direction,
            ObservedField::WindSpeed => self.wind_speed,
        }
    }
}

/// Number of hourly records a station-year must contain.
pub fn hours_in_year(year: i32) -> usize {
    if chrono::NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        8784
    } else {
        8760
    }
}

/// One field's values across every hour of a station-year, in output units.
///
/// `None` marks an hour with no usable reading, either because the whole
/// source row was absent or because the field carried the missing sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSeries {
    pub field: ObservedField,
    pub values: Vec<Option<f64>>,
}

impl FieldSeries {
    pub fn new(field: ObservedField, values: Vec<Option<f64>>) -> Self {
        Self { field, values }
    }

    /// Extract one field from an aligned station-year, converting each
    /// present value to output units.
    pub fn extract(
        field: ObservedField,
        aligned: &[Option<HourlyObservation>],
        converter: &UnitConverter,
    ) -> Result<Self> {
        let mut values = Vec::with_capacity(aligned.len());

        for slot in aligned {
            let converted = match slot.as_ref().and_then(|obs| obs.raw_value(field)) {
                Some(raw) => Some(converter.convert(field, raw)?),
                None => None,
            };
            values.push(converted);
        }

        Ok(Self { field, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}
