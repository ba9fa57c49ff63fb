//! Path and URL path helpers.

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Clean a workspace directory; an empty path is treated as `.`.
pub fn clean_dir(dir: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in dir.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Clean a path to be joined under a root directory.
///
/// Root and drive prefixes are dropped and `..` never climbs above the
/// root, so `/etc/x` and `../x` both stay inside it. Empty yields `.`.
pub fn clean_relative(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Convert a file path to a URL path (`\` becomes `/` on Windows).
pub fn file_path_to_url(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        return path.to_string();
    }
    path.split(MAIN_SEPARATOR).collect::<Vec<_>>().join("/")
}

/// Join URL path segments into an absolute URL path, skipping empty ones.
pub fn join_url(segments: &[&str]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .flat_map(|s| s.split('/'))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    format!("/{}", parts.join("/"))
}
