//! Process exit codes consumed by CI.
//!
//! - 0: no anomaly (including no data)
//! - 1: anomaly below critical confidence
//! - 2: critical anomaly
//! - 3: the run failed

use std::process::ExitCode;

use crate::logic::detector::VerdictClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    NoAnomaly = 0,
    Anomaly = 1,
    CriticalAnomaly = 2,
    Failure = 3,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

impl From<VerdictClass> for CliExitCode {
    fn from(verdict: VerdictClass) -> Self {
        match verdict {
            VerdictClass::NoAnomaly => CliExitCode::NoAnomaly,
            VerdictClass::Anomaly => CliExitCode::Anomaly,
            VerdictClass::CriticalAnomaly => CliExitCode::CriticalAnomaly,
        }
    }
}
