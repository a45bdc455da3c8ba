//! Per-version profile aggregation.
//!
//! Stage 1 of the indexing pipeline. A version directory holds one
//! `profiles.json` per build target, emitted by the build system:
//!
//! ```text
//! 23.05.0/
//! └── targets/
//!     ├── ath79/generic/
//!     │   └── profiles.json        # target metadata + device profile map
//!     └── x86/64/
//!         └── profiles.json
//! ```
//!
//! The pass rolls those up into two kinds of derived files:
//!
//! - `targets/<target>/profiles/<id>.json` — one merged record per device
//!   profile: the target-level metadata, overlaid with the profile's own
//!   fields, plus the profile id and a human-readable UTC build timestamp.
//!   Files for profiles no longer declared are deleted, so the directory
//!   always mirrors the current `profiles.json` exactly.
//! - `overview.json` at the version root — build identity plus a summary of
//!   every profile across all targets, sorted by profile id. Not written when
//!   no profiles were found; a previous overview is then left untouched.
//!
//! Version identity (`version_number`, `version_code`) is captured from the
//! first target file processed and assumed identical across the rest — later
//! files are deliberately not re-checked. Input files are machine-generated;
//! any parse failure or missing field aborts the whole pass, and files
//! already written stay on disk.

use crate::discover;
use crate::types::{Overview, ProfileSummary, VersionCode};
use chrono::DateTime;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-target input file name dropped by the build system.
pub const PROFILES_FILENAME: &str = "profiles.json";

/// Per-version output file name consumed by the versions pass.
pub const OVERVIEW_FILENAME: &str = "overview.json";

#[derive(Error, Debug)]
pub enum OverviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid JSON in {0}: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),
    #[error("Missing field '{0}' in {1}")]
    MissingField(&'static str, PathBuf),
    #[error("Field '{0}' in {1} has an unexpected type")]
    WrongType(&'static str, PathBuf),
    #[error("source_date_epoch in {0} is out of range")]
    EpochRange(PathBuf),
}

/// What one aggregation pass did, for console display.
#[derive(Debug)]
pub struct OverviewRun {
    pub version_root: PathBuf,
    pub targets: Vec<TargetReport>,
    /// The written overview, or `None` when no profiles were found and
    /// `overview.json` was left alone.
    pub overview: Option<Overview>,
}

/// One processed target file.
#[derive(Debug)]
pub struct TargetReport {
    pub target: String,
    pub source: PathBuf,
    pub profile_count: usize,
    /// Stale profile files deleted because the current input no longer
    /// declares them.
    pub pruned: Vec<PathBuf>,
}

/// Accumulator for one aggregation pass.
///
/// Owned by [`aggregate_profiles`] and threaded through the per-target step;
/// nothing outlives the pass.
#[derive(Default)]
struct OverviewBuilder {
    version: Option<(String, VersionCode)>,
    profiles: Vec<ProfileSummary>,
}

impl OverviewBuilder {
    /// Capture build identity from the first target file; later files win
    /// nothing and are not cross-checked.
    fn capture_version(
        &mut self,
        metadata: &Map<String, Value>,
        source: &Path,
    ) -> Result<(), OverviewError> {
        if self.version.is_some() {
            return Ok(());
        }
        let number = required_str(metadata, "version_number", source)?.to_string();
        let code = metadata
            .get("version_code")
            .ok_or_else(|| OverviewError::MissingField("version_code", source.to_path_buf()))?;
        let code: VersionCode = serde_json::from_value(code.clone())
            .map_err(|_| OverviewError::WrongType("version_code", source.to_path_buf()))?;
        self.version = Some((number, code));
        Ok(())
    }

    fn finish(self) -> Option<Overview> {
        let OverviewBuilder {
            version,
            mut profiles,
        } = self;
        let (version_number, version_code) = version?;
        if profiles.is_empty() {
            return None;
        }
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Some(Overview {
            version_number,
            version_code,
            profiles,
        })
    }
}

/// Run the overview pass for one version directory.
pub fn update_overview(version_root: &Path) -> Result<OverviewRun, OverviewError> {
    let files = discover::find_named_files(version_root, PROFILES_FILENAME)?;
    aggregate_profiles(version_root, &files)
}

/// Aggregate an explicit list of target files (discovery injected by the
/// caller) and write the derived files under `version_root`.
pub fn aggregate_profiles(
    version_root: &Path,
    profile_files: &[PathBuf],
) -> Result<OverviewRun, OverviewError> {
    let mut builder = OverviewBuilder::default();
    let mut targets = Vec::new();

    for source in profile_files {
        targets.push(aggregate_target(version_root, source, &mut builder)?);
    }

    let overview = builder.finish();
    if let Some(ref overview) = overview {
        write_pretty_json(&version_root.join(OVERVIEW_FILENAME), overview)?;
    }

    Ok(OverviewRun {
        version_root: version_root.to_path_buf(),
        targets,
        overview,
    })
}

fn aggregate_target(
    version_root: &Path,
    source: &Path,
    builder: &mut OverviewBuilder,
) -> Result<TargetReport, OverviewError> {
    let text = fs::read_to_string(source)?;
    let mut metadata: Map<String, Value> =
        serde_json::from_str(&text).map_err(|e| OverviewError::Parse(source.to_path_buf(), e))?;

    // shift_remove keeps the remaining metadata keys in file order; the
    // merged detail records below inherit that order.
    let profiles = match metadata.shift_remove("profiles") {
        Some(Value::Object(map)) => map,
        Some(_) => return Err(OverviewError::WrongType("profiles", source.to_path_buf())),
        None => return Err(OverviewError::MissingField("profiles", source.to_path_buf())),
    };
    let build_at = build_timestamp(&metadata, source)?;
    builder.capture_version(&metadata, source)?;
    let target = required_str(&metadata, "target", source)?.to_string();

    let profiles_dir = version_root.join("targets").join(&target).join("profiles");
    fs::create_dir_all(&profiles_dir)?;
    let mut stale = existing_profile_files(&profiles_dir)?;

    for (id, profile) in &profiles {
        let fields = profile
            .as_object()
            .ok_or_else(|| OverviewError::WrongType("profiles", source.to_path_buf()))?;
        let titles = match fields.get("titles") {
            Some(Value::Array(titles)) => titles.clone(),
            Some(_) => return Err(OverviewError::WrongType("titles", source.to_path_buf())),
            None => return Err(OverviewError::MissingField("titles", source.to_path_buf())),
        };
        builder.profiles.push(ProfileSummary {
            target: target.clone(),
            titles,
            id: id.clone(),
        });

        let detail_path = profiles_dir.join(format!("{id}.json"));
        let detail = profile_detail(&metadata, fields, id, &build_at);
        write_pretty_json(&detail_path, &Value::Object(detail))?;
        stale.remove(&detail_path);
    }

    for path in &stale {
        fs::remove_file(path)?;
    }

    Ok(TargetReport {
        target,
        source: source.to_path_buf(),
        profile_count: profiles.len(),
        pruned: stale.into_iter().collect(),
    })
}

/// Merged per-profile record: target metadata first, the profile's own fields
/// overlaid (later keys win, first-insertion position kept), then the id and
/// the formatted build timestamp.
fn profile_detail(
    metadata: &Map<String, Value>,
    fields: &Map<String, Value>,
    id: &str,
    build_at: &str,
) -> Map<String, Value> {
    let mut detail = metadata.clone();
    for (key, value) in fields {
        detail.insert(key.clone(), value.clone());
    }
    detail.insert("id".to_string(), Value::String(id.to_string()));
    detail.insert("build_at".to_string(), Value::String(build_at.to_string()));
    detail
}

/// Interpret `source_date_epoch` as Unix seconds and format as UTC
/// `YYYY-MM-DD HH:MM:SS`. Accepts an integer, a float (truncated), or a
/// numeric string.
fn build_timestamp(metadata: &Map<String, Value>, source: &Path) -> Result<String, OverviewError> {
    let raw = metadata
        .get("source_date_epoch")
        .ok_or_else(|| OverviewError::MissingField("source_date_epoch", source.to_path_buf()))?;
    let seconds = epoch_seconds(raw)
        .ok_or_else(|| OverviewError::WrongType("source_date_epoch", source.to_path_buf()))?;
    let formatted = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| OverviewError::EpochRange(source.to_path_buf()))?
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    Ok(formatted)
}

fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    source: &Path,
) -> Result<&'a str, OverviewError> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(OverviewError::WrongType(field, source.to_path_buf())),
        None => Err(OverviewError::MissingField(field, source.to_path_buf())),
    }
}

/// Direct `*.json` files currently in a profiles directory — the pruning
/// candidates for one target.
fn existing_profile_files(dir: &Path) -> Result<BTreeSet<PathBuf>, OverviewError> {
    let mut files = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.insert(path);
        }
    }
    Ok(files)
}

fn write_pretty_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), OverviewError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
