//! Download-tree version aggregation.
//!
//! Stage 2 of the indexing pipeline. The download root holds one directory
//! per published version, each carrying the `overview.json` the overview pass
//! wrote. This pass collects them all into a single newest-first list and
//! rewrites `versions.json` at the root:
//!
//! ```text
//! downloads/
//! ├── versions.json                # written here, overwritten whole
//! ├── snapshots/
//! │   └── overview.json
//! └── releases/
//!     ├── 23.05.0/overview.json
//!     └── 22.03.5/overview.json
//! ```
//!
//! Whatever is physically present is included: a version directory removed
//! from publication must be removed from disk, there is no version-level
//! stale tracking. Entries with equal version codes keep discovery (sorted
//! path) order.

use crate::branch::get_branch;
use crate::discover;
use crate::overview::OVERVIEW_FILENAME;
use crate::types::{VersionCode, VersionEntry};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root index file consumed by the download site and the renderer.
pub const VERSIONS_FILENAME: &str = "versions.json";

#[derive(Error, Debug)]
pub enum VersionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid JSON in {0}: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// The slice of an `overview.json` this pass reads; the profile list is
/// irrelevant here and skipped.
#[derive(Debug, Deserialize)]
struct OverviewSummary {
    version_number: String,
    version_code: VersionCode,
}

/// Collect every version under `root`, rewrite `versions.json`, and return
/// the sorted list for the renderer.
pub fn update_versions(root: &Path) -> Result<Vec<VersionEntry>, VersionsError> {
    let files = discover::find_named_files(root, OVERVIEW_FILENAME)?;
    let versions = collect_versions(root, &files)?;
    let json = serde_json::to_string_pretty(&versions)?;
    fs::write(root.join(VERSIONS_FILENAME), json)?;
    Ok(versions)
}

/// Build the version list from an explicit set of overview files (discovery
/// injected by the caller), sorted by version code descending.
pub fn collect_versions(
    root: &Path,
    overview_files: &[PathBuf],
) -> Result<Vec<VersionEntry>, VersionsError> {
    let mut versions = Vec::new();
    for source in overview_files {
        let text = fs::read_to_string(source)?;
        let summary: OverviewSummary =
            serde_json::from_str(&text).map_err(|e| VersionsError::Parse(source.clone(), e))?;
        versions.push(VersionEntry {
            branch: get_branch(&summary.version_number),
            path: relative_dir(root, source),
            version_number: summary.version_number,
            version_code: summary.version_code,
        });
    }
    versions.sort_by(|a, b| b.version_code.cmp(&a.version_code));
    Ok(versions)
}

/// Parent directory of `file` relative to `root`; `"."` when the file sits
/// at the root itself.
fn relative_dir(root: &Path, file: &Path) -> String {
    let parent = file.parent().unwrap_or(root);
    let relative = parent.strip_prefix(root).unwrap_or(parent);
    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_overview_json;
    use tempfile::TempDir;

    #[test]
    fn versions_sort_by_code_descending() {
        let tmp = TempDir::new().unwrap();
        write_overview_json(tmp.path(), "releases/21.02.7", "21.02.7", "r16495-bf0c965af0");
        write_overview_json(tmp.path(), "snapshots", "SNAPSHOT", "r27000-a0c840dbf8");
        write_overview_json(tmp.path(), "releases/23.05.0", "23.05.0", "r23497-6637af95aa");

        let versions = update_versions(tmp.path()).unwrap();
        let numbers: Vec<&str> = versions.iter().map(|v| v.version_number.as_str()).collect();
        assert_eq!(numbers, vec!["SNAPSHOT", "23.05.0", "21.02.7"]);
    }

    #[test]
    fn numeric_codes_sort_numerically() {
        let tmp = TempDir::new().unwrap();
        write_overview_json(tmp.path(), "a", "1.0.0", "99");
        write_overview_json(tmp.path(), "b", "2.0.0", "100");

        let text = std::fs::read_to_string(tmp.path().join("a/overview.json")).unwrap();
        std::fs::write(
            tmp.path().join("a/overview.json"),
            text.replace("\"99\"", "99"),
        )
        .unwrap();
        let text = std::fs::read_to_string(tmp.path().join("b/overview.json")).unwrap();
        std::fs::write(
            tmp.path().join("b/overview.json"),
            text.replace("\"100\"", "100"),
        )
        .unwrap();

        let versions = update_versions(tmp.path()).unwrap();
        let numbers: Vec<&str> = versions.iter().map(|v| v.version_number.as_str()).collect();
        assert_eq!(numbers, vec!["2.0.0", "1.0.0"]);
    }

    #[test]
    fn entry_paths_are_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        write_overview_json(tmp.path(), "releases/23.05.0", "23.05.0", "r2");
        write_overview_json(tmp.path(), ".", "SNAPSHOT", "r9");

        let versions = update_versions(tmp.path()).unwrap();
        let paths: Vec<&str> = versions.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec![".", "releases/23.05.0"]);
    }

    #[test]
    fn branches_are_derived_from_version_numbers() {
        let tmp = TempDir::new().unwrap();
        write_overview_json(tmp.path(), "snapshots", "SNAPSHOT", "r9");
        write_overview_json(tmp.path(), "releases/19.07.10", "19.07.10", "r1");

        let versions = update_versions(tmp.path()).unwrap();
        assert_eq!(versions[0].branch, "master");
        assert_eq!(versions[1].branch, "openwrt-19.07");
    }

    #[test]
    fn versions_json_round_trips() {
        let tmp = TempDir::new().unwrap();
        write_overview_json(tmp.path(), "releases/23.05.0", "23.05.0", "r23497-6637af95aa");
        write_overview_json(tmp.path(), "snapshots", "SNAPSHOT", "r27000-a0c840dbf8");

        let written = update_versions(tmp.path()).unwrap();
        let text = fs::read_to_string(tmp.path().join(VERSIONS_FILENAME)).unwrap();
        let parsed: Vec<VersionEntry> = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed.len(), written.len());
        assert_eq!(parsed[0].version_number, "SNAPSHOT");
        assert_eq!(parsed[0].path, "snapshots");
    }

    #[test]
    fn stale_list_is_fully_replaced() {
        let tmp = TempDir::new().unwrap();
        write_overview_json(tmp.path(), "releases/23.05.0", "23.05.0", "r2");
        update_versions(tmp.path()).unwrap();

        fs::remove_dir_all(tmp.path().join("releases")).unwrap();
        write_overview_json(tmp.path(), "snapshots", "SNAPSHOT", "r9");
        let versions = update_versions(tmp.path()).unwrap();

        assert_eq!(versions.len(), 1);
        let text = fs::read_to_string(tmp.path().join(VERSIONS_FILENAME)).unwrap();
        assert!(!text.contains("23.05.0"));
    }

    #[test]
    fn malformed_overview_aborts() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("bad")).unwrap();
        fs::write(tmp.path().join("bad/overview.json"), "{ nope").unwrap();

        assert!(matches!(
            update_versions(tmp.path()).unwrap_err(),
            VersionsError::Parse(_, _)
        ));
    }
}
