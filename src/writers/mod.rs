pub mod epw_writer;

pub use epw_writer::EpwWriter;
