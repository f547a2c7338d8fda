//! Logic Module - Detection Engine
//!
//! ## Structure
//! - `features/` - raw records → frozen-schema feature table, robust scaler
//! - `model/` - density, statistical and sequence scorers
//! - `ensemble/` - fuses scorer contributions into one verdict
//! - `insight/` - severity, summary, recommendations
//! - `loader/` - metric file discovery and parsing
//! - `report/` - run documents and CI alerts
//! - `detector/` - one run, end to end

// Shared
pub mod config;
pub mod error;
pub mod stats;

// Core engine
pub mod features;
pub mod model;
pub mod ensemble;
pub mod insight;

// Peripheral
pub mod loader;
pub mod report;
pub mod detector;

#[cfg(test)]
pub(crate) mod testing;
