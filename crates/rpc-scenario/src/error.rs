//! Step failures.
//!
//! Every scenario operation returns a `StepError` on failure. Exit codes
//! follow sysexits.h so the CLI can report the failure class.

use rpc_scenario_client::ClientError;
use rpc_scenario_client::error_codes;
use rpc_scenario_fixture::BuildError;
use rpc_scenario_fixture::Mismatch;
use rpc_scenario_fixture::PathError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepError {
    #[error("Invalid request parameters: {0}")]
    Params(#[from] BuildError),

    #[error("Result mismatch: {0}")]
    Mismatch(#[from] Mismatch),

    #[error("{count} result rows failed:\n{}", bullet_list(.mismatches))]
    Mismatches {
        count: usize,
        mismatches: Vec<Mismatch>,
    },

    #[error("Path lookup failed: {0}")]
    Path(#[from] PathError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("No request has been sent in this scenario")]
    NoRequestSent,

    #[error("Response has no result (error: {error})")]
    NoResult { error: String },

    #[error("Response is not an error (result: {result})")]
    NoError { result: String },

    #[error(
        "Expected error code {}, got {}",
        code_label(*.expected),
        code_label(*.actual)
    )]
    ErrorCodeMismatch { expected: i64, actual: i64 },

    #[error("Expected error message {expected:?}, got {actual:?}")]
    ErrorMessageMismatch { expected: String, actual: String },

    #[error("Error response carries no data")]
    NoErrorData,

    #[error("Expected response id {expected:?}, got {actual}")]
    IdMismatch { expected: String, actual: String },

    #[error("Expected HTTP status {expected}, got {actual}")]
    StatusMismatch { expected: u16, actual: u16 },

    #[error("Malformed table row {row}: {reason}")]
    MalformedTable { row: usize, reason: String },
}

fn bullet_list(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(|m| format!("  - {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `-32601 (Method not found)` for reserved codes, the bare number otherwise.
fn code_label(code: i64) -> String {
    match error_codes::describe(code) {
        Some(name) => format!("{code} ({name})"),
        None => code.to_string(),
    }
}

impl StepError {
    /// Builds the accumulated variant; a single mismatch stays unwrapped.
    pub fn from_mismatches(mut mismatches: Vec<Mismatch>) -> Option<Self> {
        match mismatches.len() {
            0 => None,
            1 => mismatches.pop().map(StepError::Mismatch),
            count => Some(StepError::Mismatches { count, mismatches }),
        }
    }

    /// Whether the step failed before talking to the server.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            StepError::Params(_) | StepError::MalformedTable { .. } | StepError::Path(_)
        )
    }

    /// Converts to UNIX sysexits.h-compliant exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            StepError::Client(err) if err.is_transport() => 74, // EX_IOERR
            StepError::Client(ClientError::Http { .. })
            | StepError::Client(ClientError::InvalidResponse(_)) => 74,
            _ if self.is_usage() => 64, // EX_USAGE
            _ => 1,
        }
    }
}
