//! Console output formatting for all pipeline stages.
//!
//! Output is information-centric, not file-centric: each entity leads with a
//! positional index and its semantic identity (target name, version number),
//! with filesystem paths as indented `Source:` context lines. Each stage has
//! a `format_*` function returning `Vec<String>` for testability and a
//! `print_*` wrapper that writes to stdout; the format functions are pure.
//!
//! ```text
//! /downloads/releases/23.05.0
//! 001 ath79/generic (112 profiles)
//!     Source: /downloads/releases/23.05.0/targets/ath79/generic/profiles.json
//!     Pruned: retired_router.json
//! 002 x86/64 (1 profiles)
//!     Source: /downloads/releases/23.05.0/targets/x86/64/profiles.json
//! Aggregated 113 profiles into overview.json
//! ```

use crate::overview::{OVERVIEW_FILENAME, OverviewRun};
use crate::render::{ARCHIVE_OUTPUT, INDEX_OUTPUT, RenderedIndex};
use crate::types::VersionEntry;
use crate::versions::VERSIONS_FILENAME;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

// ============================================================================
// Stage 1: Overview output
// ============================================================================

pub fn format_overview_output(run: &OverviewRun) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(run.version_root.display().to_string());

    for (i, report) in run.targets.iter().enumerate() {
        lines.push(format!(
            "{} {} ({} profiles)",
            format_index(i + 1),
            report.target,
            report.profile_count
        ));
        lines.push(format!("    Source: {}", report.source.display()));
        for pruned in &report.pruned {
            let name = pruned
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| pruned.display().to_string());
            lines.push(format!("    Pruned: {name}"));
        }
    }

    match &run.overview {
        Some(overview) => lines.push(format!(
            "Aggregated {} profiles into {}",
            overview.profiles.len(),
            OVERVIEW_FILENAME
        )),
        None => lines.push(format!("No profiles found, {OVERVIEW_FILENAME} left untouched")),
    }
    lines
}

pub fn print_overview_output(run: &OverviewRun) {
    for line in format_overview_output(run) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Versions output
// ============================================================================

pub fn format_versions_output(versions: &[VersionEntry]) -> Vec<String> {
    let mut lines = vec!["Versions".to_string()];
    for (i, entry) in versions.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}) {}",
            format_index(i + 1),
            entry.version_number,
            entry.version_code,
            entry.branch
        ));
        lines.push(format!("    Source: {}", entry.path));
    }
    lines.push(format!(
        "Wrote {} ({} versions)",
        VERSIONS_FILENAME,
        versions.len()
    ));
    lines
}

pub fn print_versions_output(versions: &[VersionEntry]) {
    for line in format_versions_output(versions) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Render output
// ============================================================================

pub fn format_render_output(rendered: &RenderedIndex) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Stable: {}", rendered.stable));
    match &rendered.oldstable {
        Some(oldstable) => lines.push(format!("Oldstable: {oldstable}")),
        None => lines.push("Oldstable: none (no earlier branch in the list)".to_string()),
    }
    lines.push(format!("Archived: {} releases", rendered.archived.len()));
    lines.push(format!("Generated {INDEX_OUTPUT}, {ARCHIVE_OUTPUT}"));
    lines
}

pub fn print_render_output(rendered: &RenderedIndex) {
    for line in format_render_output(rendered) {
        println!("{}", line);
    }
}
