//! # release-index
//!
//! Aggregates per-target firmware build metadata into download-site index
//! files. The download tree is the data source: the build system drops one
//! `profiles.json` per target into each version directory, and this tool
//! rolls them up into the JSON summaries and static HTML fragments the site
//! serves.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Three independent stages, connected only through files on disk:
//!
//! ```text
//! 1. Overview   <version>/**/profiles.json → overview.json + per-profile files
//! 2. Versions   <root>/**/overview.json    → versions.json
//! 3. Render     sorted version list        → index.html, archive.html
//! ```
//!
//! The overview stage runs once per version directory; its output is exactly
//! what the versions stage discovers one level up. The render stage consumes
//! the in-memory list the versions stage returns. Each stage's output is
//! plain, human-readable JSON (or HTML), so any step can be inspected or
//! re-run in isolation.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`overview`] | Stage 1 — merges per-target `profiles.json` files into per-profile records and a version overview, pruning stale records |
//! | [`versions`] | Stage 2 — collects every version's overview into the newest-first `versions.json` |
//! | [`render`] | Stage 3 — fills the site's HTML templates by literal placeholder substitution |
//! | [`discover`] | Recursive "files named N under root" walk both aggregation passes share |
//! | [`branch`] | Release-train derivation from version numbers |
//! | [`types`] | Shared types serialized between stages |
//! | [`output`] | Console display — information-first formatting of each stage's results |
//!
//! # Design Decisions
//!
//! ## Full Rewrite Every Run
//!
//! There is no incremental mode. Every run re-discovers the inputs and
//! rewrites every derived file, and per-profile records not reproduced by
//! the current inputs are deleted. The derived tree is therefore always a
//! pure function of the current inputs, and a crashed run is repaired by
//! running again.
//!
//! ## Templates as Opaque Text
//!
//! The HTML pages are produced by literal substring replacement of
//! `{{stable}}`, `{{oldstable}}` and `{{archived_releases}}` in template
//! files the site owners maintain. The tool never parses or validates the
//! HTML around the placeholders — site styling can change without touching
//! or rebuilding this binary.
//!
//! ## Trusted, Machine-Generated Input
//!
//! Inputs come from the build system, not from users. Malformed JSON or a
//! missing field aborts the run with a path-carrying error rather than being
//! skipped; there is no partial-failure recovery and no rollback of files
//! already written. One deliberate trust assumption: a version's identity is
//! captured from the first target file processed and later targets are not
//! cross-checked against it.

pub mod branch;
pub mod discover;
pub mod output;
pub mod overview;
pub mod render;
pub mod types;
pub mod versions;

#[cfg(test)]
pub(crate) mod test_helpers;
