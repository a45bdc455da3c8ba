//! Shared fixture builders for the test suite.
//!
//! Tests run against synthetic download trees in temp directories; these
//! helpers write the two input file shapes the pipeline consumes and build
//! version entries for renderer tests.

use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

use crate::branch::get_branch;
use crate::types::{VersionCode, VersionEntry};

/// Write a `profiles.json` for one build target under
/// `<version_root>/targets/<target>/`, with one `(id, title)` pair per
/// device profile. Returns the file's path.
pub fn write_profiles_json(
    version_root: &Path,
    target: &str,
    version: (&str, &str),
    source_date_epoch: i64,
    profiles: &[(&str, &str)],
) -> PathBuf {
    let mut profile_map = Map::new();
    for (id, title) in profiles {
        profile_map.insert(
            (*id).to_string(),
            json!({
                "titles": [title],
                "images": [format!("{id}-squashfs-sysupgrade.bin")]
            }),
        );
    }
    let content = json!({
        "version_number": version.0,
        "version_code": version.1,
        "target": target,
        "source_date_epoch": source_date_epoch,
        "profiles": profile_map,
    });

    let dir = version_root.join("targets").join(target);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("profiles.json");
    fs::write(&path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
    path
}

/// Write a minimal `overview.json` (empty profile list) under
/// `<root>/<subdir>/`. Returns the file's path.
pub fn write_overview_json(
    root: &Path,
    subdir: &str,
    version_number: &str,
    version_code: &str,
) -> PathBuf {
    let content = json!({
        "version_number": version_number,
        "version_code": version_code,
        "profiles": [],
    });
    let dir = root.join(subdir);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("overview.json");
    fs::write(&path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
    path
}

/// Build a version entry with a numeric code and a derived branch; `path`
/// defaults to the version number, which is all renderer tests need.
pub fn version_entry(version_number: &str, code: i64) -> VersionEntry {
    VersionEntry {
        version_number: version_number.to_string(),
        version_code: VersionCode::Number(code),
        path: version_number.to_string(),
        branch: get_branch(version_number),
    }
}

/// `Value` round-trip helper: parse a written JSON file back into a map.
pub fn read_json_object(path: &Path) -> Map<String, Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
