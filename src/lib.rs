pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod units;
pub mod writers;

pub use config::Thresholds;
pub use error::{ProcessingError, Result};
pub use processors::{ProcessOutcome, StationYearProcessor};
