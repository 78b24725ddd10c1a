pub mod epw;
pub mod observation;
pub mod verdict;

pub use epw::{EpwHeader, EpwRecord, EpwTemplate};
pub use observation::{FieldSeries, HourlyObservation, ObservedField};
pub use verdict::{FieldGapStats, QualityVerdict, Rejection, RejectionReason};
