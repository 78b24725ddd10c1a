use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("{field}: converted value {value} is outside plausible range [{min}, {max}]")]
    UnitConversion {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error(
        "{field}: {length} consecutive missing hours starting at hour {start}, but the maximum allowed for imputation is {max_allowed}"
    )]
    GapTooLarge {
        field: &'static str,
        start: usize,
        length: usize,
        max_allowed: usize,
    },

    #[error(
        "{field}: missing run of {length} hours starting at hour {start} touches the year boundary and has no neighbouring value to fill from"
    )]
    BoundaryGap {
        field: &'static str,
        start: usize,
        length: usize,
    },

    #[error("{field}: seasonal window around hour {hour} contains no present values")]
    InsufficientData { field: &'static str, hour: usize },

    #[error("{series} has {actual} hours but {expected} were expected")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate observation timestamp: {timestamp}")]
    DuplicateTimestamp { timestamp: chrono::NaiveDateTime },

    #[error("EPW validation error: {0}")]
    EpwValidation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Missing required data: {0}")]
    MissingData(String),
}
