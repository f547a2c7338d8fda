//! Report Module - Run documents and CI alerts
//!
//! - `types` - DetectionReport, Alert and the persisted run document
//! - `writer` - writes both to disk

pub mod types;
pub mod writer;


pub use types::{Analysis, DetectionReport};
pub use writer::ReportWriter;
