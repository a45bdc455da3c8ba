//! Release-train derivation from version numbers.
//!
//! Every version string maps to exactly one branch, and the mapping is pure —
//! branches are computed wherever needed, never stored on their own.
//!
//! ## Mapping
//!
//! - `"SNAPSHOT"` → `"master"` (the rolling development line)
//! - `"23.05.2"` → `"openwrt-23.05"` (drop the final dot-separated component,
//!   prepend the branch prefix)
//! - `"23"` → `"openwrt-23"` (nothing to drop)

/// Version number of the rolling development line.
pub const SNAPSHOT_VERSION: &str = "SNAPSHOT";

/// Branch name the development line maps to.
pub const SNAPSHOT_BRANCH: &str = "master";

const BRANCH_PREFIX: &str = "openwrt-";

/// Derive the release-train branch for a version number.
///
/// - `"SNAPSHOT"` → `"master"`
/// - `"21.02.3"` → `"openwrt-21.02"`
/// - `"19.07.10"` → `"openwrt-19.07"`
pub fn get_branch(version_number: &str) -> String {
    if version_number == SNAPSHOT_VERSION {
        return SNAPSHOT_BRANCH.to_string();
    }
    let train = version_number
        .rsplit_once('.')
        .map_or(version_number, |(head, _)| head);
    format!("{BRANCH_PREFIX}{train}")
}
