//! Domain types for a single conversion call.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the caller wants from one conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// The `.ppt`/`.pptx` file to convert.
    pub input: PathBuf,

    /// Final location of the PDF. Mutually exclusive with `output_dir`.
    pub output_file: Option<PathBuf>,

    /// Directory for `<stem>.pdf`. Defaults to the input's directory.
    pub output_dir: Option<PathBuf>,

    /// Override for the `soffice` executable.
    pub executable: Option<PathBuf>,

    /// Wall-clock budget for the converter process.
    pub timeout: Option<Duration>,

    /// Flags inserted right after the executable, before the built-in ones.
    pub extra_args: Vec<String>,
}

impl ConversionRequest {
    /// Create a request for the given input with every option unset.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_file: None,
            output_dir: None,
            executable: None,
            timeout: None,
            extra_args: Vec::new(),
        }
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append extra converter flags, keeping their order.
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Absolute path to a converter binary that existed when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable(PathBuf);

impl ResolvedExecutable {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn into_path(self) -> PathBuf {
        self.0
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Absolute path of the source presentation.
    pub input_path: PathBuf,

    /// Absolute path of the PDF after any rename.
    pub output_path: PathBuf,

    /// The exact command line that was executed.
    pub command: Vec<String>,

    /// Converter standard output.
    pub stdout: String,

    /// Converter standard error.
    pub stderr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let request = ConversionRequest::new("slides.pptx")
            .with_output_dir("out")
            .with_executable("/opt/soffice")
            .with_timeout(Duration::from_secs(30))
            .with_extra_args(["--norestore"])
            .with_extra_args(vec![String::from("--invisible")]);

        assert_eq!(request.input, PathBuf::from("slides.pptx"));
        assert_eq!(request.output_dir, Some(PathBuf::from("out")));
        assert_eq!(request.output_file, None);
        assert_eq!(request.executable, Some(PathBuf::from("/opt/soffice")));
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
        assert_eq!(request.extra_args, vec!["--norestore", "--invisible"]);
    }
}
