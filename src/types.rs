//! Shared types serialized between pipeline stages.
//!
//! These types cross stage boundaries as JSON files (`overview.json` written
//! by the overview stage and read by the versions stage, `versions.json`
//! written by the versions stage) and must stay identical across the modules
//! that touch them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Release ordinal used to order versions newest-first.
///
/// Build systems emit either a plain integer or a revision string (e.g.
/// `"r23497-6637af95aa"`); both shapes round-trip unchanged through
/// serialization. The derived ordering compares numbers numerically, strings
/// byte-lexicographically, and places strings above numbers so textual
/// snapshot codes sort newest in a mixed list. Input sets are expected to be
/// homogeneous; the mixed case is defined only so sorting never fails.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for VersionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionCode::Number(n) => write!(f, "{n}"),
            VersionCode::Text(s) => f.write_str(s),
        }
    }
}

/// One discovered version directory, as listed in `versions.json`.
///
/// The whole list is rebuilt from scratch on every run; nothing is persisted
/// incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version_number: String,
    pub version_code: VersionCode,
    /// Directory holding the version's `overview.json`, relative to the
    /// download root. `"."` when the overview sits at the root itself.
    pub path: String,
    /// Release train, derived from the version number (see [`crate::branch`]).
    pub branch: String,
}

/// Per-profile summary aggregated into a version's `overview.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub target: String,
    /// Copied verbatim from the input profile; must be a JSON array, the
    /// elements are not inspected further.
    pub titles: Vec<Value>,
    pub id: String,
}

/// A version's `overview.json`: build identity plus every device profile
/// discovered across its targets, sorted by profile id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub version_number: String,
    pub version_code: VersionCode,
    pub profiles: Vec<ProfileSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_numerically() {
        assert!(VersionCode::Number(100) > VersionCode::Number(99));
        assert!(VersionCode::Number(19) < VersionCode::Number(20));
    }

    #[test]
    fn texts_compare_lexicographically() {
        assert!(
            VersionCode::Text("r23497-6637af95aa".into())
                > VersionCode::Text("r20553-de95c8b24b".into())
        );
    }

    #[test]
    fn text_orders_above_number() {
        assert!(VersionCode::Text("r1".into()) > VersionCode::Number(9999));
    }

    #[test]
    fn code_serializes_to_input_shape() {
        let number = serde_json::to_string(&VersionCode::Number(20)).unwrap();
        assert_eq!(number, "20");
        let text = serde_json::to_string(&VersionCode::Text("r1-abc".into())).unwrap();
        assert_eq!(text, "\"r1-abc\"");
    }

    #[test]
    fn code_deserializes_from_either_shape() {
        let number: VersionCode = serde_json::from_str("20").unwrap();
        assert_eq!(number, VersionCode::Number(20));
        let text: VersionCode = serde_json::from_str("\"r1-abc\"").unwrap();
        assert_eq!(text, VersionCode::Text("r1-abc".into()));
    }

    #[test]
    fn float_code_is_rejected() {
        assert!(serde_json::from_str::<VersionCode>("19.5").is_err());
    }
}
