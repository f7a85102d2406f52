//! Resolution of the LibreOffice `soffice` executable.

use crate::error::{Error, Result};
use crate::paths::absolutize;
use crate::types::ResolvedExecutable;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Name of the converter binary searched for on `PATH`.
pub const SOFFICE: &str = "soffice";

/// Resolve the converter from `candidate`, falling back to the process `PATH`.
pub fn locate(candidate: Option<&Path>) -> Result<ResolvedExecutable> {
    locate_in(candidate, SOFFICE, std::env::var_os("PATH").as_deref())
}

/// Like [`locate`], with an explicit program name and search path.
///
/// A candidate that names an existing file wins outright; otherwise each
/// directory of `search_path` is probed for `program`.
pub fn locate_in(
    candidate: Option<&Path>,
    program: &str,
    search_path: Option<&OsStr>,
) -> Result<ResolvedExecutable> {
    if let Some(candidate) = candidate {
        let path = absolutize(candidate)?;
        if path.is_file() {
            log::debug!("Using converter override {}", path.display());
            return Ok(ResolvedExecutable::new(path));
        }
        log::debug!(
            "Converter override {} is not a file, searching PATH",
            path.display()
        );
    }

    if let Some(found) = search_path.and_then(|paths| which(program, paths)) {
        log::debug!("Found {} at {}", program, found.display());
        return Ok(ResolvedExecutable::new(found));
    }

    Err(Error::ExecutableNotFound {
        candidate: candidate.map(Path::to_path_buf),
    })
}

/// Probe each directory of `search_path` for an executable named `program`.
fn which(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| {
            candidate_names(program)
                .into_iter()
                .map(move |name| dir.join(name))
        })
        .find(|path| is_executable(path))
        .and_then(|path| absolutize(&path).ok())
}

#[cfg(windows)]
fn candidate_names(program: &str) -> Vec<OsString> {
    let exts = std::env::var_os("PATHEXT").unwrap_or_else(|| OsString::from(".COM;.EXE;.BAT;.CMD"));
    let mut names = vec![OsString::from(program)];
    names.extend(
        exts.to_string_lossy()
            .split(';')
            .filter(|ext| !ext.is_empty())
            .map(|ext| OsString::from(format!("{}{}", program, ext.to_lowercase()))),
    );
    names
}

#[cfg(not(windows))]
fn candidate_names(program: &str) -> Vec<OsString> {
    vec![OsString::from(program)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
