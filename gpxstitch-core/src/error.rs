// ============================================================================
// gpxstitch-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// This module defines the error type shared by every stage of the pipeline.
// Errors returned from this crate are fatal for the run; soft failures (an
// empty track, a rejected routing request) never surface as `CoreError` and
// are recorded in the run report instead.
//
// KEY COMPONENTS:
// - CoreError: enum of all fatal failure modes
// - CoreResult: result alias used throughout the crate
// - Helper constructors for external command failures

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Fatal errors raised by the gpxstitch pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read directory '{}': {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{command}' failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Required external tool not found: {0}")]
    DependencyNotFound(String),

    #[error("Track file name '{0}' does not encode a clip index")]
    InvalidTrackName(String),

    #[error("Malformed GPX in '{}': {message}", path.display())]
    MalformedGpx { path: PathBuf, message: String },

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("No .mp4 clips found in the source directory")]
    NoClipsFound,
}

/// Result alias for operations in this crate.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a `CoreError::CommandStart` for a tool that could not be spawned.
pub fn command_start_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

/// Builds a `CoreError::CommandWait` for a tool whose exit could not be collected.
pub fn command_wait_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), err)
}

/// Builds a `CoreError::CommandFailed` for a tool that exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a `CoreError::MalformedGpx` for the given file.
pub fn malformed_gpx(path: impl Into<PathBuf>, message: impl Into<String>) -> CoreError {
    CoreError::MalformedGpx {
        path: path.into(),
        message: message.into(),
    }
}
