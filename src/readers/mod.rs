pub mod epw_reader;
pub mod isd_lite_reader;

pub use epw_reader::EpwReader;
pub use isd_lite_reader::{align_to_year, shift_to_local, IsdLiteReader};
