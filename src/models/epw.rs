use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ObservedField;

/// One hourly data row of an EPW file, all 35 columns in file order.
///
/// Field order matters: rows are serialized positionally, so the struct
/// mirrors the EPW data dictionary exactly. Only `year` and the five
/// observed fields are ever rewritten during merging; everything else is
/// carried through from the template untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EpwRecord {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub data_source_flags: String,

    #[validate(range(min = -70.0, max = 70.0))]
    pub dry_bulb_temperature: f64,

    #[validate(range(min = -70.0, max = 70.0))]
    pub dew_point_temperature: f64,

    pub relative_humidity: f64,

    #[validate(range(min = 31000.0, max = 120000.0))]
    pub atmospheric_station_pressure: f64,

    pub extraterrestrial_horizontal_radiation: f64,
    pub extraterrestrial_direct_normal_radiation: f64,
    pub horizontal_infrared_radiation: f64,
    pub global_horizontal_radiation: f64,
    pub direct_normal_radiation: f64,
    pub diffuse_horizontal_radiation: f64,
    pub global_horizontal_illuminance: f64,
    pub direct_normal_illuminance: f64,
    pub diffuse_horizontal_illuminance: f64,
    pub zenith_luminance: f64,

    #[validate(range(min = 0.0, max = 360.0))]
    pub wind_direction: f64,

    #[validate(range(min = 0.0, max = 40.0))]
    pub wind_speed: f64,

    pub total_sky_cover: f64,
    pub opaque_sky_cover: f64,
    pub visibility: f64,
    pub ceiling_height: f64,
    pub present_weather_observation: i64,
    pub present_weather_codes: String,
    pub precipitable_water: f64,
    pub aerosol_optical_depth: f64,
    pub snow_depth: f64,
    pub days_since_last_snowfall: f64,
    pub albedo: f64,
    pub liquid_precipitation_depth: f64,
    pub liquid_precipitation_quantity: f64,
}

impl EpwRecord {
    /// Overwrite one of the five substituted fields with an observed value
    /// already converted to output units.
    pub fn set_observed(&mut self, field: ObservedField, value: f64) {
        match field {
            ObservedField::DryBulbTemperature => self.dry_bulb_temperature = value,
            ObservedField::DewPointTemperature => self.dew_point_temperature = value,
            ObservedField::StationPressure => self.atmospheric_station_pressure = value,
            ObservedField::WindDirection => self.wind_direction = value,
            ObservedField::WindSpeed => self.wind_speed = value,
        }
    }

    pub fn observed(&self, field: ObservedField) -> f64 {
        match field {
            ObservedField::DryBulbTemperature => self.dry_bulb_temperature,
            ObservedField::DewPointTemperature => self.dew_point_temperature,
            ObservedField::StationPressure => self.atmospheric_station_pressure,
            ObservedField::WindDirection => self.wind_direction,
            ObservedField::WindSpeed => self.wind_speed,
        }
    }
}

/// Station metadata from the EPW LOCATION line, plus the remaining header
/// lines carried through to the output verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EpwHeader {
    pub city: String,
    pub state: String,
    pub country: String,

    /// Six-digit WMO station identifier.
    #[validate(range(min = 100_000, max = 999_999))]
    pub station_number: u32,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = -12.0, max = 12.0))]
    pub timezone_gmt_offset: f64,

    pub elevation: f64,

    /// Header lines 2-5 (design conditions, typical/extreme periods, ground
    /// temperatures, holidays/daylight saving), unparsed.
    pub auxiliary_lines: Vec<String>,

    /// The COMMENTS 1 line describing the template's provenance.
    pub comment: String,
}

impl EpwHeader {
    /// Render the LOCATION line for an output file.
    pub fn location_line(&self) -> String {
        format!(
            "LOCATION,{},{},{},customized weather file,{},{},{},{},{}",
            self.city,
            self.state,
            self.country,
            self.station_number,
            self.latitude,
            self.longitude,
            self.timezone_gmt_offset,
            self.elevation
        )
    }
}

/// A full-year TMY template: header metadata plus one record per hour.
///
/// Immutable once loaded. The merge engine reads it and produces a new
/// record sequence; nothing ever mutates the template in place.
#[derive(Debug, Clone, PartialEq)]
pub struct EpwTemplate {
    pub header: EpwHeader,
    pub records: Vec<EpwRecord>,
}

impl EpwTemplate {
    pub fn hours(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
pub(crate) fn test_record(month: u32, day: u32, hour: u32) -> EpwRecord {
    EpwRecord {
        year: 1999,
        month,
        day,
        hour,
        minute: 0,
        data_source_flags: "?9?9?9?9E0".to_string(),
        dry_bulb_temperature: 10.0,
        dew_point_temperature: 5.0,
        relative_humidity: 70.0,
        atmospheric_station_pressure: 101_325.0,
        extraterrestrial_horizontal_radiation: 0.0,
        extraterrestrial_direct_normal_radiation: 0.0,
        horizontal_infrared_radiation: 330.0,
        global_horizontal_radiation: 0.0,
        direct_normal_radiation: 0.0,
        diffuse_horizontal_radiation: 0.0,
        global_horizontal_illuminance: 0.0,
        direct_normal_illuminance: 0.0,
        diffuse_horizontal_illuminance: 0.0,
        zenith_luminance: 0.0,
        wind_direction: 180.0,
        wind_speed: 4.0,
        total_sky_cover: 5.0,
        opaque_sky_cover: 5.0,
        visibility: 20.0,
        ceiling_height: 2000.0,
        present_weather_observation: 9,
        present_weather_codes: "999999999".to_string(),
        precipitable_water: 10.0,
        aerosol_optical_depth: 0.1,
        snow_depth: 0.0,
        days_since_last_snowfall: 88.0,
        albedo: 0.2,
        liquid_precipitation_depth: 0.0,
        liquid_precipitation_quantity: 0.0,
    }
}
