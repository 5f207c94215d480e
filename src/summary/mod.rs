//! Failure taxonomy, exit codes and the run report

mod failure;
mod report;

pub use failure::{ExitCode, FailureKind};
pub use report::{exit_code_for, OverallStatus, ProbeReport, REPORT_SCHEMA_ID, REPORT_SCHEMA_VERSION};
