pub mod gap_detector;
pub mod gap_filler;
pub mod merge_engine;
pub mod pipeline;
pub mod quality_gate;

pub use gap_detector::{scan_series, GapScan, MissingRun};
pub use gap_filler::{FillSummary, GapFiller};
pub use merge_engine::MergeEngine;
pub use pipeline::{ProcessOutcome, StationYearProcessor};
pub use quality_gate::QualityGate;
