use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::models::{EpwHeader, EpwRecord};

/// Provenance comment written into every generated AMY file.
const AMY_COMMENT: &str = "COMMENTS 2, TMY3 data from energyplus.net/weather supplemented with \
NOAA ISD Lite data from https://www1.ncdc.noaa.gov/pub/data/noaa/isd-lite/ for an actual \
meteorological year (AMY)";

/// Serializes a merged record sequence to an AMY EPW file.
///
/// The LOCATION line is regenerated from the header metadata; the
/// template's auxiliary header lines and COMMENTS 1 pass through verbatim.
pub struct EpwWriter;

impl EpwWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_amy_file(
        &self,
        path: &Path,
        header: &EpwHeader,
        records: &[EpwRecord],
    ) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_amy(&mut writer, header, records)?;
        writer.flush()?;

        info!(path = %path.display(), hours = records.len(), "wrote AMY EPW file");

        Ok(())
    }

    pub fn write_amy<W: Write>(
        &self,
        writer: &mut W,
        header: &EpwHeader,
        records: &[EpwRecord],
    ) -> Result<()> {
        let first = records.first().ok_or_else(|| {
            ProcessingError::MissingData("cannot write an EPW file with no records".to_string())
        })?;

        writeln!(writer, "{}", header.location_line())?;
        for line in &header.auxiliary_lines {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer, "{}", header.comment)?;
        writeln!(writer, "{AMY_COMMENT}")?;
        writeln!(
            writer,
            "DATA PERIODS,1,1,Data,{}, 1/1, 12/31",
            first_day_of_week(first)?
        )?;

        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        for record in records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;

        Ok(())
    }
}

impl Default for EpwWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Full weekday name of the first record's date, for the DATA PERIODS line.
fn first_day_of_week(record: &EpwRecord) -> Result<String> {
    let date = NaiveDate::from_ymd_opt(record.year, record.month, record.day).ok_or_else(|| {
        ProcessingError::InvalidFormat(format!(
            "Invalid first record date: {}-{:02}-{:02}",
            record.year, record.month, record.day
        ))
    })?;

    Ok(date.format("%A").to_string())
}
