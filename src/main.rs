use clap::{Parser, Subcommand};
use release_index::{discover, output, overview, render, versions};
use std::path::{Path, PathBuf};

/// Shared flags for commands that render the HTML index pages.
#[derive(clap::Args, Clone)]
struct SiteArgs {
    /// Directory holding index.tmpl.html and archive.tmpl.html; rendered
    /// pages are written next to them
    #[arg(long, default_value = ".")]
    site_dir: PathBuf,
}

#[derive(Parser)]
#[command(name = "release-index", version)]
#[command(about = "Aggregates firmware build metadata into download-site indexes")]
#[command(long_about = "\
Aggregates firmware build metadata into download-site indexes

The download tree is the data source. Each version directory carries the
per-target profiles.json files emitted by the build system; this tool rolls
them up into per-version overviews, a newest-first version list, and the
static HTML index pages served on the download site.

Expected layout:

  downloads/
  ├── index.tmpl.html              # Templates with {{stable}}, {{oldstable}},
  ├── archive.tmpl.html            #   {{archived_releases}} placeholders
  ├── index.html                   # Rendered pages (overwritten)
  ├── archive.html
  ├── versions.json                # Version list (overwritten)
  ├── snapshots/
  │   ├── overview.json            # Written by 'overview'
  │   └── targets/ath79/generic/
  │       ├── profiles.json        # Input, one per build target
  │       └── profiles/<id>.json   # Per-profile records, stale ones pruned
  └── releases/
      └── 23.05.0/
          ├── overview.json
          └── targets/...

'overview' aggregates a single version directory. 'index' rebuilds
versions.json and the HTML pages from every overview.json under the root.
'build' chains both across the whole tree.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate one version's profiles.json files into its overview.json
    Overview {
        /// Version directory (the parent of its targets/ tree)
        version_dir: PathBuf,
    },
    /// Rebuild versions.json and the HTML index pages for a download tree
    Index {
        /// Download-tree root to scan for overview.json files
        root: PathBuf,
        #[command(flatten)]
        site: SiteArgs,
    },
    /// Update every version's overview under the tree, then rebuild the index
    Build {
        /// Download-tree root
        root: PathBuf,
        #[command(flatten)]
        site: SiteArgs,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Overview { version_dir } => {
            let run = overview::update_overview(&version_dir)?;
            output::print_overview_output(&run);
        }
        Command::Index { root, site } => {
            run_index(&root, &site)?;
        }
        Command::Build { root, site } => {
            println!("==> Stage 1: Updating version overviews");
            for version_root in discover::find_version_roots(&root)? {
                let run = overview::update_overview(&version_root)?;
                output::print_overview_output(&run);
            }

            println!("==> Stage 2: Rebuilding the version index");
            run_index(&root, &site)?;

            println!("==> Build complete: {}", root.display());
        }
    }

    Ok(())
}

/// Versions pass plus render. versions.json is written before the templates
/// are read, so a render failure still leaves a fresh version list behind.
fn run_index(root: &Path, site: &SiteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let list = versions::update_versions(root)?;
    output::print_versions_output(&list);

    let rendered = render::render_site(&list, &site.site_dir)?;
    output::print_render_output(&rendered);
    Ok(())
}
