//! Runs the converter as a child process with an optional wall-clock limit.

use std::ffi::OsString;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// How a child process ended.
#[derive(Debug)]
pub(crate) enum Finished {
    Exited {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    /// The limit expired and the child was killed.
    TimedOut,
}

/// Run `command` to completion, blocking the calling thread.
///
/// `command[0]` is the program. Output streams are decoded lossily.
pub(crate) fn run(command: &[OsString], timeout: Option<Duration>) -> io::Result<Finished> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command line"))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_child(program, args, timeout))
}

async fn run_child(
    program: &OsString,
    args: &[OsString],
    timeout: Option<Duration>,
) -> io::Result<Finished> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let collect = async { tokio::try_join!(child.wait(), drain(stdout), drain(stderr)) };

    let (status, stdout, stderr) = match timeout {
        Some(limit) => {
            let waited = tokio::time::timeout(limit, collect).await;
            match waited {
                Ok(result) => result?,
                Err(_) => {
                    child.kill().await?;
                    return Ok(Finished::TimedOut);
                }
            }
        }
        None => collect.await?,
    };

    Ok(Finished::Exited {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
