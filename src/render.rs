//! Static index-page rendering.
//!
//! Stage 3 of the indexing pipeline. Takes the newest-first version list and
//! fills two HTML templates by literal placeholder substitution — the
//! templates are opaque text maintained by the site owners, not something
//! this tool understands. No escaping, no template engine; the placeholders
//! are plain substrings:
//!
//! - `{{stable}}` — version number of the current stable release
//! - `{{oldstable}}` — version number of the previous release train's last
//!   release, or empty when every listed release shares the stable branch
//! - `{{archived_releases}}` — concatenated `<li>` items linking older
//!   releases into the archive mirror
//!
//! ## Labeling contract
//!
//! The list head is the development snapshot line and is never labeled.
//! Index 1 is stable. Scanning the rest in order, the first entry on a
//! different branch than stable becomes oldstable and is kept off the
//! archive list; everything else scanned becomes an archive item, in list
//! order.

use crate::types::VersionEntry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Template file names looked up in the site directory.
pub const INDEX_TEMPLATE: &str = "index.tmpl.html";
pub const ARCHIVE_TEMPLATE: &str = "archive.tmpl.html";

/// Rendered page names, written next to the templates.
pub const INDEX_OUTPUT: &str = "index.html";
pub const ARCHIVE_OUTPUT: &str = "archive.html";

/// Old releases are served from the long-term archive mirror, not the
/// primary download tree.
const ARCHIVE_URL_PREFIX: &str = "//archive.openwrt.org/releases/";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read template {0}: {1}")]
    Template(PathBuf, #[source] std::io::Error),
    #[error("Need at least two versions to label a stable release, found {0}")]
    NotEnoughVersions(usize),
}

/// Result of one render: the labeling decisions plus the filled pages.
#[derive(Debug)]
pub struct RenderedIndex {
    pub stable: String,
    /// `None` when no listed release sits on an earlier branch; the
    /// `{{oldstable}}` placeholder is then replaced with an empty string.
    pub oldstable: Option<String>,
    /// Version numbers rendered into the archive list, in list order.
    pub archived: Vec<String>,
    pub index_html: String,
    pub archive_html: String,
}

/// Fill both templates from a newest-first version list.
///
/// Pure — no filesystem access — so labeling rules are testable on synthetic
/// lists. Fails when the list is too short to pick a stable release.
pub fn fill_templates(
    versions: &[VersionEntry],
    index_tmpl: &str,
    archive_tmpl: &str,
) -> Result<RenderedIndex, RenderError> {
    if versions.len() < 2 {
        return Err(RenderError::NotEnoughVersions(versions.len()));
    }
    // versions[0] is the snapshot line; never labeled.
    let stable = &versions[1];

    let mut oldstable: Option<&VersionEntry> = None;
    let mut archived = Vec::new();
    let mut archived_items = String::new();
    for version in &versions[2..] {
        if oldstable.is_none() && version.branch != stable.branch {
            oldstable = Some(version);
        } else {
            archived_items.push_str(&archive_list_item(&version.version_number));
            archived.push(version.version_number.clone());
        }
    }

    let oldstable = oldstable.map(|v| v.version_number.clone());
    let index_html = index_tmpl
        .replace("{{stable}}", &stable.version_number)
        .replace("{{oldstable}}", oldstable.as_deref().unwrap_or(""));
    let archive_html = archive_tmpl.replace("{{archived_releases}}", &archived_items);

    Ok(RenderedIndex {
        stable: stable.version_number.clone(),
        oldstable,
        archived,
        index_html,
        archive_html,
    })
}

/// One archive list item. Items are concatenated with no separator; the
/// leading indentation keeps them aligned inside the template's `<ul>`.
fn archive_list_item(version_number: &str) -> String {
    format!(
        "        <li>\n          <a href=\"{ARCHIVE_URL_PREFIX}{version_number}/targets/\"\n            >OpenWrt {version_number}</a\n          >\n        </li>"
    )
}

/// Load the templates from `site_dir`, fill them, and write `index.html` and
/// `archive.html` back to the same directory, overwriting.
pub fn render_site(versions: &[VersionEntry], site_dir: &Path) -> Result<RenderedIndex, RenderError> {
    let index_tmpl = read_template(&site_dir.join(INDEX_TEMPLATE))?;
    let archive_tmpl = read_template(&site_dir.join(ARCHIVE_TEMPLATE))?;
    let rendered = fill_templates(versions, &index_tmpl, &archive_tmpl)?;
    fs::write(site_dir.join(INDEX_OUTPUT), &rendered.index_html)?;
    fs::write(site_dir.join(ARCHIVE_OUTPUT), &rendered.archive_html)?;
    Ok(rendered)
}

fn read_template(path: &Path) -> Result<String, RenderError> {
    fs::read_to_string(path).map_err(|e| RenderError::Template(path.to_path_buf(), e))
}
