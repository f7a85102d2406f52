//! Error types for presentation-to-PDF conversion.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Remediation text shown when `soffice` cannot be resolved.
pub const CONVERTER_NOT_FOUND_HINT: &str = "LibreOffice 'soffice' executable not found. \
     Please install LibreOffice and ensure 'soffice' is available on your PATH.";

/// Errors that can occur while converting a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// The converter binary could not be resolved from the override or `PATH`.
    #[error("{}", CONVERTER_NOT_FOUND_HINT)]
    ExecutableNotFound {
        /// The caller-supplied candidate, if any.
        candidate: Option<PathBuf>,
    },

    /// The source presentation does not exist.
    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Conflicting or malformed request.
    #[error("{0}")]
    InvalidArguments(String),

    /// The converter exceeded its wall-clock budget and was killed.
    #[error("LibreOffice timed out after {:.1}s while converting the presentation.", .timeout.as_secs_f64())]
    TimedOut {
        /// The command line that was running.
        command: Vec<String>,
        /// The budget that was exceeded.
        timeout: Duration,
    },

    /// The converter exited with a non-zero status.
    #[error(
        "LibreOffice failed to convert the presentation.\nCommand: {}\nStdout: {stdout}\nStderr: {stderr}",
        .command.join(" ")
    )]
    ConversionFailed {
        /// The command line that was run.
        command: Vec<String>,
        /// Exit code, `None` when terminated by a signal.
        status: Option<i32>,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The converter reported success but the expected PDF is absent.
    #[error(
        "LibreOffice reported success but the expected PDF was not created: {}",
        .expected.display()
    )]
    OutputMissing {
        /// The command line that was run.
        command: Vec<String>,
        /// Where the PDF was expected.
        expected: PathBuf,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Filesystem or process-spawn failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ExecutableNotFound,
    InputNotFound,
    InvalidArguments,
    TimedOut,
    /// Non-zero exit or missing output.
    ConversionFailed,
    Io,
}

impl Error {
    /// Classify this error so callers can branch without matching messages.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ExecutableNotFound { .. } => ErrorKind::ExecutableNotFound,
            Error::InputNotFound(_) => ErrorKind::InputNotFound,
            Error::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Error::TimedOut { .. } => ErrorKind::TimedOut,
            Error::ConversionFailed { .. } | Error::OutputMissing { .. } => {
                ErrorKind::ConversionFailed
            }
            Error::IoError(_) => ErrorKind::Io,
        }
    }

    /// The command line involved, for errors raised after it was built.
    pub fn command(&self) -> Option<&[String]> {
        match self {
            Error::TimedOut { command, .. }
            | Error::ConversionFailed { command, .. }
            | Error::OutputMissing { command, .. } => Some(command.as_slice()),
            _ => None,
        }
    }
}
