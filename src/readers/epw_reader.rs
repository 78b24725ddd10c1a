use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{EpwHeader, EpwRecord, EpwTemplate};

/// Number of header lines before the data body of an EPW file.
pub const EPW_HEADER_LINES: usize = 8;

/// Loads a TMY EPW template: eight header lines followed by one CSV data
/// row per hour of a typical year.
pub struct EpwReader;

impl EpwReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_template(&self, path: &Path) -> Result<EpwTemplate> {
        let file = File::open(path)?;
        self.read_template_from(BufReader::new(file))
    }

    pub fn read_template_from<R: BufRead>(&self, reader: R) -> Result<EpwTemplate> {
        let mut lines = reader.lines();

        let mut header_lines = Vec::with_capacity(EPW_HEADER_LINES);
        for i in 0..EPW_HEADER_LINES {
            let line = lines.next().transpose()?.ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "EPW file ended after {i} of {EPW_HEADER_LINES} header lines"
                ))
            })?;
            header_lines.push(line.trim_end().to_string());
        }

        let header = parse_location_line(&header_lines)?;
        header.validate()?;

        let mut body = String::new();
        for line in lines {
            body.push_str(&line?);
            body.push('\n');
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(body.as_bytes());

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<EpwRecord>() {
            records.push(row?);
        }

        debug!(
            station = header.station_number,
            hours = records.len(),
            "loaded EPW template"
        );

        Ok(EpwTemplate { header, records })
    }
}

impl Default for EpwReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse station metadata from the LOCATION line and keep the remaining
/// header lines for pass-through.
fn parse_location_line(header_lines: &[String]) -> Result<EpwHeader> {
    let location = &header_lines[0];
    let fields: Vec<&str> = location.split(',').collect();

    if !location.starts_with("LOCATION") || fields.len() < 10 {
        return Err(ProcessingError::InvalidFormat(format!(
            "Malformed LOCATION line: {location}"
        )));
    }

    Ok(EpwHeader {
        city: fields[1].to_string(),
        state: fields[2].to_string(),
        country: fields[3].to_string(),
        station_number: fields[5].trim().parse().map_err(|_| {
            ProcessingError::InvalidFormat(format!("Invalid station number: {}", fields[5]))
        })?,
        latitude: parse_location_field(fields[6], "latitude")?,
        longitude: parse_location_field(fields[7], "longitude")?,
        timezone_gmt_offset: parse_location_field(fields[8], "timezone GMT offset")?,
        elevation: parse_location_field(fields[9], "elevation")?,
        auxiliary_lines: header_lines[1..5].to_vec(),
        comment: header_lines[5].clone(),
    })
}

fn parse_location_field(value: &str, name: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid {name}: {value}")))
}
