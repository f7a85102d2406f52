//! Conversion orchestration: builds the `soffice` invocation, runs it and
//! moves the produced PDF to where the caller asked for it.

use crate::error::{Error, Result};
use crate::exec::{self, Finished};
use crate::locate::{locate_in, SOFFICE};
use crate::paths::absolutize;
use crate::types::{ConversionOutcome, ConversionRequest, ResolvedExecutable};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Flags passed to every `soffice` run, before the format and directory.
const HEADLESS_FLAGS: &[&str] = &["--headless", "--nologo", "--nofirststartwizard"];

/// Convert a presentation using `soffice` from the override or `PATH`.
pub fn convert(request: &ConversionRequest) -> Result<ConversionOutcome> {
    Converter::new().convert(request)
}

/// Converter settings that outlive a single request.
///
/// The executable is re-resolved on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct Converter {
    /// Program name searched for on the search path.
    program: String,

    /// Search path override. `None` reads `PATH` at call time.
    search_path: Option<OsString>,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            program: SOFFICE.to_string(),
            search_path: None,
        }
    }
}

impl Converter {
    /// Create a converter that looks for `soffice` on `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Search for a differently named program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Search these directories instead of the process `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Run one conversion.
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionOutcome> {
        let input_path = absolutize(&request.input)?;
        if !input_path.exists() {
            return Err(Error::InputNotFound(input_path));
        }

        if request.output_file.is_some() && request.output_dir.is_some() {
            return Err(Error::InvalidArguments(
                "Specify either an output file or an output directory, not both.".to_string(),
            ));
        }

        let executable = self.resolve(request.executable.as_deref())?;

        let (work_dir, requested) = match &request.output_file {
            Some(file) => {
                let file = absolutize(file)?;
                let dir = parent_of(&file)?;
                (dir, Some(file))
            }
            None => {
                let dir = match &request.output_dir {
                    Some(dir) => absolutize(dir)?,
                    None => parent_of(&input_path)?,
                };
                (dir, None)
            }
        };
        fs::create_dir_all(&work_dir)?;

        let default_output = default_output_path(&work_dir, &input_path)?;
        let argv = build_command(&executable, &request.extra_args, &work_dir, &input_path);
        let command: Vec<String> = argv
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        log::debug!("Running: {}", command.join(" "));

        let (stdout, stderr) = match exec::run(&argv, request.timeout)? {
            Finished::TimedOut => {
                let timeout = request.timeout.unwrap_or_default();
                log::warn!(
                    "Conversion of {} timed out after {:?}",
                    input_path.display(),
                    timeout
                );
                return Err(Error::TimedOut { command, timeout });
            }
            Finished::Exited {
                status,
                stdout,
                stderr,
            } => {
                if !status.success() {
                    log::warn!(
                        "Converter exited with {} for {}",
                        status,
                        input_path.display()
                    );
                    return Err(Error::ConversionFailed {
                        command,
                        status: status.code(),
                        stdout,
                        stderr,
                    });
                }
                (stdout, stderr)
            }
        };

        if !default_output.is_file() {
            log::warn!(
                "Converter succeeded but {} is missing",
                default_output.display()
            );
            return Err(Error::OutputMissing {
                command,
                expected: default_output,
                stdout,
                stderr,
            });
        }

        let output_path = match requested {
            Some(target) if target != default_output => {
                log::debug!(
                    "Renaming {} to {}",
                    default_output.display(),
                    target.display()
                );
                fs::rename(&default_output, &target)?;
                target
            }
            _ => default_output,
        };

        log::info!(
            "Converted {} to {}",
            input_path.display(),
            output_path.display()
        );

        Ok(ConversionOutcome {
            input_path,
            output_path,
            command,
            stdout,
            stderr,
        })
    }

    fn resolve(&self, candidate: Option<&Path>) -> Result<ResolvedExecutable> {
        let search_path = match &self.search_path {
            Some(paths) => Some(paths.clone()),
            None => std::env::var_os("PATH"),
        };
        locate_in(candidate, &self.program, search_path.as_deref())
    }
}

/// `<work_dir>/<input stem>.pdf`, the name `soffice` writes to.
pub fn default_output_path(work_dir: &Path, input: &Path) -> Result<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        Error::InvalidArguments(format!("Input has no file name: {}", input.display()))
    })?;
    let mut name = stem.to_os_string();
    name.push(".pdf");
    Ok(work_dir.join(name))
}

/// Assemble the argument vector; `extra_args` go right after the program.
pub fn build_command(
    executable: &ResolvedExecutable,
    extra_args: &[String],
    work_dir: &Path,
    input: &Path,
) -> Vec<OsString> {
    let mut argv: Vec<OsString> = Vec::with_capacity(extra_args.len() + 9);
    argv.push(executable.path().as_os_str().to_os_string());
    argv.extend(extra_args.iter().map(OsString::from));
    argv.extend(HEADLESS_FLAGS.iter().map(OsString::from));
    argv.extend(["--convert-to", "pdf", "--outdir"].map(OsString::from));
    argv.push(work_dir.as_os_str().to_os_string());
    argv.push(input.as_os_str().to_os_string());
    argv
}

fn parent_of(path: &Path) -> Result<PathBuf> {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            Error::InvalidArguments(format!("Path has no parent directory: {}", path.display()))
        })
}
