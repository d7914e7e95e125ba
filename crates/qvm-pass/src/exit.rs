use std::fmt;
use std::io;

use qvm_pass_client::ClientError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;

pub type CliResult<T> = Result<T, CliError>;

/// A fatal local error: printed bare to stderr, then the process exits with
/// `code`. Remote exit codes never travel this path; they are forwarded
/// through [`CompletedInvocation`](qvm_pass_envelope::CompletedInvocation).
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The common case: local failures exit 1.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(FAILURE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Transport and envelope failures keep their own wording; some of it is
/// pinned ("Unexpected reply"), so nothing is prefixed here.
pub fn client_error(err: ClientError) -> CliError {
    CliError::failure(err.to_string())
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::failure(format!("{context}: {err}"))
}
