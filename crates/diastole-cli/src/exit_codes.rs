//! Process exit codes. Part of the CLI contract.

use diastole_core::{RunError, RunErrorKind};

pub const SUCCESS: i32 = 0;
pub const VERIFY_FAILED: i32 = 1; // Finished run failed one or more checks
pub const CONFIG_ERROR: i32 = 2; // Missing/malformed input or bad arguments
pub const RUN_ERROR: i32 = 3; // Provider, write or incomplete-run failure

pub fn for_kind(kind: RunErrorKind) -> i32 {
    if kind.is_config() {
        CONFIG_ERROR
    } else if kind == RunErrorKind::VerifyFailed {
        VERIFY_FAILED
    } else {
        RUN_ERROR
    }
}

/// Exit code for a command failure: typed run errors map by kind, anything else
/// is treated as a configuration problem.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<RunError>()
        .map(|e| for_kind(e.kind))
        .unwrap_or(CONFIG_ERROR)
}
