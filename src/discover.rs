//! Recursive file discovery in the download tree.
//!
//! Both aggregation passes start from the same primitive: "every file named N
//! under this root". It lives here as a standalone operation so the passes can
//! take the resulting list as an argument and tests can hand them a synthetic
//! one.
//!
//! Results are sorted by path. The walk order of the underlying filesystem is
//! not stable across machines, and downstream behavior depends on processing
//! order (which target file wins the version capture, tie order among equal
//! version codes), so sorting here is what makes re-runs deterministic.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect every file named `file_name` beneath `root`, sorted by path.
///
/// Directory symlinks are not followed. Any unreadable directory aborts the
/// walk; inputs are machine-generated trees where a read failure means the
/// run should fail loudly rather than silently skip a version.
pub fn find_named_files(root: &Path, file_name: &str) -> io::Result<Vec<PathBuf>> {
    let wanted = OsStr::new(file_name);
    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(into_io_error)?;
        if entry.file_type().is_file() && entry.file_name() == wanted {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

/// Collect every version directory beneath `root`, sorted and deduplicated.
///
/// A version directory is the parent of a directory named `targets` — that is
/// where the build system drops per-target output, and where the overview
/// pass expects to run.
pub fn find_version_roots(root: &Path) -> io::Result<Vec<PathBuf>> {
    let targets = OsStr::new("targets");
    let mut roots = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(into_io_error)?;
        if entry.file_type().is_dir()
            && entry.file_name() == targets
            && let Some(parent) = entry.path().parent()
        {
            roots.push(parent.to_path_buf());
        }
    }
    roots.sort();
    roots.dedup();
    Ok(roots)
}

fn into_io_error(err: walkdir::Error) -> io::Error {
    match err.into_io_error() {
        Some(io_err) => io_err,
        None => io::Error::other("filesystem loop detected during directory walk"),
    }
}
