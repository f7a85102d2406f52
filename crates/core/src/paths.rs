//! Path helpers shared by the locator and the orchestrator.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Replace a leading `~` with the user's home directory.
///
/// Paths like `~user/x` are left alone.
pub fn expand_home(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Expand `~`, anchor relative paths at the current directory and drop
/// `.`/`..` segments.
///
/// Purely lexical: symlinks are not followed, so a path the caller built
/// from an absolute directory comes back unchanged.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let expanded = expand_home(path);
    let anchored = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };
    Ok(normalize(&anchored))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the root is a no-op, as the OS resolves `/..`.
                let at_root = matches!(
                    out.components().next_back(),
                    Some(Component::RootDir) | None
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
