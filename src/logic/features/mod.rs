//! Features Module - Feature Engineering
//!
//! Raw metric records in, one rectangular numeric table out.
//!
//! - `record` - raw metric observations
//! - `schema` - frozen, hashed column layout for one run
//! - `table` - the feature table itself
//! - `builder` - timestamp, rolling, difference and one-hot features
//! - `scaler` - robust median/IQR scaling for the model inputs

pub mod record;
pub mod schema;
pub mod table;
pub mod builder;
pub mod scaler;

#[cfg(test)]
mod tests;

// Re-export common types
pub use record::{MetricSource, RawMetricRecord};
pub use schema::FeatureSchema;
pub use table::FeatureTable;
pub use builder::FeatureBuilder;
pub use scaler::RobustScaler;
