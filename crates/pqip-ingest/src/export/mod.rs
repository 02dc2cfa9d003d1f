//! ED export reading.

mod header;
mod reader;

pub use header::normalize_header;
pub use reader::read_patient_export;
