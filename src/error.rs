use crate::host::ExitCode;
use std::io;
use thiserror::Error;

/// Failures that stop a launch before the container's own exit code is known.
///
/// A non-zero exit from the containerized command is not a `LaunchError`; it is
/// passed through as the launcher's exit code.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Missing or malformed arguments. The payload is the full text shown to the user.
    #[error("{0}")]
    Usage(String),

    #[error("{runtime} not found in PATH")]
    RuntimeNotFound { runtime: String },

    #[error("failed to get working directory: {0}")]
    WorkingDirectory(#[source] io::Error),

    #[error("failed to run {runtime}: {source}")]
    Spawn {
        runtime: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for {runtime}: {source}")]
    Wait {
        runtime: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Exit code the launcher terminates with for this failure.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LaunchError::Usage(_) => 2,
            LaunchError::RuntimeNotFound { .. } => 127,
            LaunchError::WorkingDirectory(_)
            | LaunchError::Spawn { .. }
            | LaunchError::Wait { .. } => 1,
        }
    }
}
