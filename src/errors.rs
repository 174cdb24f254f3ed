//! Exit codes for operator-facing failures.

use tracing::error;

/// Process exit codes reported by the `splitpage` subcommands.
pub enum ExitCode {
    /// The user targeted by a maintenance command does not exist.
    UserNotFound = 1,

    /// Indicates that invalid data was supplied to the given subcommand.
    InvalidInputData = 2,
}

/// Logs the message as an error and terminates with the given exit code.
pub fn exit<I>(message: I, code: ExitCode) -> !
where
    I: tracing::Value,
{
    error!(message);
    std::process::exit(code as i32);
}
