//! CLI tool for converting PowerPoint files to PDF.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use ppt2pdf_core::{ConversionOutcome, ConversionRequest};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Convert Microsoft PowerPoint presentations into PDF documents.
#[derive(Parser, Debug)]
#[command(name = "ppt2pdf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the .ppt or .pptx file to convert
    input: PathBuf,

    /// Path to the generated PDF file (default: input stem in --outdir)
    #[arg(conflicts_with = "outdir")]
    output: Option<PathBuf>,

    /// Directory where the PDF is created when no output path is given
    #[arg(long, value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Path to the LibreOffice 'soffice' executable (falls back to PATH lookup)
    #[arg(long, value_name = "PATH")]
    soffice: Option<PathBuf>,

    /// Maximum number of seconds to wait for LibreOffice to finish
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = parse_timeout,
        allow_negative_numbers = true
    )]
    timeout: Option<Duration>,

    /// Additional option forwarded to soffice; repeat for multiple arguments
    #[arg(long = "extra-arg", value_name = "ARG", allow_hyphen_values = true)]
    extra_args: Vec<String>,

    /// Print the full conversion result as JSON instead of the output path
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_request(&self) -> ConversionRequest {
        let mut request =
            ConversionRequest::new(&self.input).with_extra_args(self.extra_args.iter().cloned());
        if let Some(output) = &self.output {
            request = request.with_output_file(output);
        }
        if let Some(dir) = &self.outdir {
            request = request.with_output_dir(dir);
        }
        if let Some(soffice) = &self.soffice {
            request = request.with_executable(soffice);
        }
        if let Some(timeout) = self.timeout {
            request = request.with_timeout(timeout);
        }
        request
    }
}

fn parse_timeout(value: &str) -> std::result::Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("'{}' is not a valid timeout", value))
}

fn main() -> ExitCode {
    let code = run(
        std::env::args_os(),
        ppt2pdf_core::convert,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(code)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    // A second initialization (e.g. across tests) is harmless.
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Parse `argv`, convert, and report. Returns the process exit code.
///
/// `argv[0]` is the program name. The conversion is injected so the argument
/// handling can be exercised without LibreOffice.
fn run<I, T, F>(argv: I, convert: F, out: &mut dyn Write, err: &mut dyn Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(&ConversionRequest) -> ppt2pdf_core::Result<ConversionOutcome>,
{
    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) => {
            let stream: &mut dyn Write = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => out,
                _ => err,
            };
            let _ = write!(stream, "{}", e.render());
            return exit_code(e.exit_code());
        }
    };

    init_logging(args.verbose);

    let request = args.to_request();
    log::debug!("Request: {:?}", request);

    match convert(&request) {
        Ok(outcome) => match report(&outcome, args.json, out) {
            Ok(()) => 0,
            Err(e) => {
                let _ = writeln!(err, "ppt2pdf: {:#}", e);
                1
            }
        },
        Err(e) => {
            let e = Args::command().error(ErrorKind::Io, e);
            let _ = write!(err, "{}", e.render());
            exit_code(e.exit_code())
        }
    }
}

/// Print the output path (or the whole outcome as JSON).
fn report(outcome: &ConversionOutcome, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        let text =
            serde_json::to_string_pretty(outcome).context("Failed to serialize result")?;
        writeln!(out, "{}", text).context("Failed to write result")?;
    } else {
        writeln!(out, "{}", outcome.output_path.display())
            .context("Failed to write output path")?;
    }
    out.flush().context("Failed to flush output")
}

fn exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppt2pdf_core::Error;
    use std::cell::RefCell;
    use std::path::Path;

    fn outcome(input: &str, output: &str) -> ConversionOutcome {
        ConversionOutcome {
            input_path: PathBuf::from(input),
            output_path: PathBuf::from(output),
            command: vec!["soffice".to_string(), "--headless".to_string()],
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn invoke<F>(argv: &[&str], convert: F) -> (u8, String, String)
    where
        F: FnOnce(&ConversionRequest) -> ppt2pdf_core::Result<ConversionOutcome>,
    {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let full = std::iter::once("ppt2pdf").chain(argv.iter().copied());
        let code = run(full, convert, &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_prints_output_path() {
        let seen = RefCell::new(None);
        let (code, out, _) = invoke(&["slides.pptx"], |request| {
            *seen.borrow_mut() = Some(request.clone());
            Ok(outcome("slides.pptx", "/tmp/slides.pdf"))
        });

        assert_eq!(code, 0);
        assert_eq!(out.trim(), "/tmp/slides.pdf");
        let request = seen.into_inner().unwrap();
        assert_eq!(request, ConversionRequest::new("slides.pptx"));
    }

    #[test]
    fn test_failure_prints_no_path() {
        let (code, out, err) = invoke(&["slides.pptx"], |_| {
            Err(Error::ConversionFailed {
                command: vec!["soffice".to_string()],
                status: Some(1),
                stdout: String::new(),
                stderr: "boom".to_string(),
            })
        });

        assert_ne!(code, 0);
        assert!(out.is_empty());
        assert!(err.contains("boom"));
    }

    #[test]
    fn test_every_error_kind_fails() {
        let errors = [
            Error::ExecutableNotFound { candidate: None },
            Error::InputNotFound(PathBuf::from("slides.pptx")),
            Error::InvalidArguments("nope".to_string()),
            Error::TimedOut {
                command: Vec::new(),
                timeout: Duration::from_secs(1),
            },
        ];
        for error in errors {
            let message = error.to_string();
            let (code, out, err) = invoke(&["slides.pptx"], move |_| Err(error));
            assert_ne!(code, 0);
            assert!(out.is_empty());
            assert!(err.contains(&message));
        }
    }

    #[test]
    fn test_forwards_options() {
        let seen = RefCell::new(None);
        let (code, _, _) = invoke(
            &[
                "deck.ppt",
                "--soffice",
                "/opt/lo/soffice",
                "--timeout",
                "2.5",
                "--extra-arg",
                "--norestore",
                "--extra-arg=--invisible",
                "--outdir",
                "pdfs",
            ],
            |request| {
                *seen.borrow_mut() = Some(request.clone());
                Ok(outcome("deck.ppt", "pdfs/deck.pdf"))
            },
        );

        assert_eq!(code, 0);
        let request = seen.into_inner().unwrap();
        assert_eq!(request.output_dir.as_deref(), Some(Path::new("pdfs")));
        assert_eq!(request.output_file, None);
        assert_eq!(
            request.executable.as_deref(),
            Some(Path::new("/opt/lo/soffice"))
        );
        assert_eq!(request.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(request.extra_args, vec!["--norestore", "--invisible"]);
    }

    #[test]
    fn test_positional_output() {
        let seen = RefCell::new(None);
        invoke(&["deck.pptx", "out/final.pdf"], |request| {
            *seen.borrow_mut() = Some(request.clone());
            Ok(outcome("deck.pptx", "out/final.pdf"))
        });

        let request = seen.into_inner().unwrap();
        assert_eq!(
            request.output_file.as_deref(),
            Some(Path::new("out/final.pdf"))
        );
        assert_eq!(request.output_dir, None);
    }

    #[test]
    fn test_output_and_outdir_conflict() {
        let (code, out, err) = invoke(&["deck.pptx", "final.pdf", "--outdir", "pdfs"], |_| {
            panic!("conversion must not run")
        });

        assert_eq!(code, 2);
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let cases = [
            (vec!["deck.pptx", "--timeout", "soon"], "is not a number of seconds"),
            (vec!["deck.pptx", "--timeout", "-1"], "is not a valid timeout"),
            (vec!["deck.pptx", "--timeout=-0.5"], "is not a valid timeout"),
            (vec!["deck.pptx", "--timeout", "NaN"], "is not a valid timeout"),
        ];
        for (argv, reason) in cases {
            let (code, out, err) = invoke(&argv, |_| panic!("conversion must not run"));
            assert_eq!(code, 2, "{argv:?}");
            assert!(out.is_empty());
            assert!(err.contains("--timeout"), "{err}");
            assert!(err.contains(reason), "{err}");
        }
    }

    #[test]
    fn test_missing_input_argument() {
        let (code, out, _) = invoke(&[], |_| panic!("conversion must not run"));
        assert_eq!(code, 2);
        assert!(out.is_empty());
    }

    #[test]
    fn test_version() {
        let (code, out, _) = invoke(&["--version"], |_| panic!("conversion must not run"));
        assert_eq!(code, 0);
        assert_eq!(out.trim(), format!("ppt2pdf {}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_json_report() {
        let (code, out, _) = invoke(&["slides.pptx", "--json"], |_| {
            Ok(outcome("/in/slides.pptx", "/tmp/slides.pdf"))
        });

        assert_eq!(code, 0);
        let parsed: ConversionOutcome = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, outcome("/in/slides.pptx", "/tmp/slides.pdf"));
    }
}
