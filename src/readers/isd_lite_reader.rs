use chrono::{Duration, NaiveDate, NaiveDateTime};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::observation::hours_in_year;
use crate::models::HourlyObservation;
use crate::units::normalize_sentinel;

const READ_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// The largest possible timezone shift; only this many hours of the
/// following year's file can spill into the end of December 31 local time.
const MAX_SPILLOVER_HOURS: usize = 23;

/// Reads NOAA ISD Lite files: one whitespace-delimited row per observed
/// hour, year/month/day/hour followed by eight observation columns. The
/// sky-condition and precipitation columns are not used for EPW
/// substitution and are dropped at parse time.
pub struct IsdLiteReader {
    use_mmap: bool,
}

impl IsdLiteReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn read_observations(&self, path: &Path) -> Result<Vec<HourlyObservation>> {
        if self.use_mmap {
            self.read_observations_mmap(path)
        } else {
            self.read_observations_buffered(path)
        }
    }

    fn read_observations_buffered(&self, path: &Path) -> Result<Vec<HourlyObservation>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let mut observations = Vec::new();

        for line_result in reader.lines() {
            let line = line_result?;
            if let Some(observation) = parse_isd_lite_line(&line)? {
                observations.push(observation);
            }
        }

        debug!(path = %path.display(), rows = observations.len(), "read ISD Lite file");

        Ok(observations)
    }

    /// Memory-mapped read for large files.
    fn read_observations_mmap(&self, path: &Path) -> Result<Vec<HourlyObservation>> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let content = std::str::from_utf8(&mmap)
            .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;

        let mut observations = Vec::new();
        for line in content.lines() {
            if let Some(observation) = parse_isd_lite_line(line)? {
                observations.push(observation);
            }
        }

        Ok(observations)
    }
}

impl Default for IsdLiteReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one ISD Lite row. Empty lines yield `None`; malformed rows fail.
pub fn parse_isd_lite_line(line: &str) -> Result<Option<HourlyObservation>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let columns: Vec<&str> = line.split_whitespace().collect();
    if columns.len() < 9 {
        return Err(ProcessingError::InvalidFormat(format!(
            "ISD Lite row has {} columns, expected at least 9: {}",
            columns.len(),
            line
        )));
    }

    let year: i32 = parse_column(columns[0], "year")?;
    let month: u32 = parse_column(columns[1], "month")?;
    let day: u32 = parse_column(columns[2], "day")?;
    let hour: u32 = parse_column(columns[3], "hour")?;

    let timestamp = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Invalid timestamp {year}-{month:02}-{day:02} {hour:02}:00"
            ))
        })?;

    Ok(Some(HourlyObservation {
        timestamp,
        air_temperature: parse_observation_column(columns[4], "air temperature")?,
        dew_point_temperature: parse_observation_column(columns[5], "dew point temperature")?,
        sea_level_pressure: parse_observation_column(columns[6], "sea level pressure")?,
        wind_direction: parse_observation_column(columns[7], "wind direction")?,
        wind_speed: parse_observation_column(columns[8], "wind speed")?,
    }))
}

fn parse_column<T: std::str::FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| ProcessingError::InvalidFormat(format!("Could not parse {name}: {value}")))
}

fn parse_observation_column(value: &str, name: &str) -> Result<Option<f64>> {
    let raw: f64 = parse_column(value, name)?;
    Ok(normalize_sentinel(raw))
}

/// Shift observation timestamps from GMT to station local time.
///
/// `spillover` is the following year's file; only its first hours can land
/// inside the shifted year, so at most 23 rows of it are consumed. Rows
/// that shift outside the target year are dropped at alignment time.
pub fn shift_to_local(
    observations: Vec<HourlyObservation>,
    spillover: Vec<HourlyObservation>,
    gmt_offset_hours: i64,
) -> Vec<HourlyObservation> {
    observations
        .into_iter()
        .chain(spillover.into_iter().take(MAX_SPILLOVER_HOURS))
        .map(|mut obs| {
            obs.timestamp += Duration::hours(gmt_offset_hours);
            obs
        })
        .collect()
}

/// Place observations into a fixed slot per hour of the year.
///
/// Observations outside the year are dropped (shifting pushes the first
/// hours of January into the previous year); a second observation for the
/// same hour is an invariant violation and fails.
pub fn align_to_year(
    observations: Vec<HourlyObservation>,
    year: i32,
) -> Result<Vec<Option<HourlyObservation>>> {
    let hours = hours_in_year(year);
    let start = first_hour_of_year(year)?;
    let mut slots: Vec<Option<HourlyObservation>> = vec![None; hours];

    for observation in observations {
        let offset = (observation.timestamp - start).num_hours();
        if offset < 0 || offset >= hours as i64 {
            continue;
        }

        let slot = &mut slots[offset as usize];
        if slot.is_some() {
            return Err(ProcessingError::DuplicateTimestamp {
                timestamp: observation.timestamp,
            });
        }
        *slot = Some(observation);
    }

    Ok(slots)
}

fn first_hour_of_year(year: i32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid year: {year}")))
}
