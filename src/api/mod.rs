//! API Module - Command-line surface
//!
//! - `cli` - flags (with environment fallbacks) and the run command
//! - `exit` - process exit codes

pub mod cli;
pub mod exit;

pub use cli::{execute, Cli};
pub use exit::CliExitCode;
