//! ls command - List the contents of a folder
//!
//! Takes a snapshot of everything under the folder and prints its direct
//! children, folders first. A folder that does not exist lists as empty;
//! the human output says which of the two it is.

use bx_core::path::{folder_prefix, normalize_folder_path};
use bx_core::format::format_bytes;
use bx_core::{DateStyle, Entry, Hierarchy, Totals, build_snapshot};
use clap::Args;
use jiff::Timestamp;
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Progress;
use crate::output::render::{RenderOptions, listing_table};

/// List a folder
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Folder path (default: bucket root)
    #[arg(default_value = "")]
    pub path: String,

    /// Date style: relative or iso (default: configured preference)
    #[arg(long)]
    pub dates: Option<DateStyle>,

    /// Show totals for the whole subtree
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput<'a> {
    path: &'a str,
    entries: &'a [Entry],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_folders: usize,
    total_files: usize,
    total_size_bytes: u64,
    total_size_human: String,
}

impl From<Totals> for Summary {
    fn from(totals: Totals) -> Self {
        Self {
            total_folders: totals.folders,
            total_files: totals.files,
            total_size_bytes: totals.size_bytes,
            total_size_human: format_bytes(Some(totals.size_bytes)),
        }
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, ctx: &Context) -> ExitCode {
    let path = normalize_folder_path(&args.path);
    let store = match ctx.open_store().await {
        Ok(store) => store,
        Err(code) => return code,
    };

    let progress = Progress::spinner(ctx.formatter.config(), "Listing objects...");
    let snapshot = build_snapshot(&store, &folder_prefix(&path)).await;
    progress.finish();

    let hierarchy = match snapshot {
        Ok(hierarchy) => hierarchy,
        Err(e) => return ctx.fail(&e),
    };

    let listing = hierarchy.listing(&path);
    let summary = args.summarize.then(|| Summary::from(hierarchy.totals(&path)));
    let formatter = &ctx.formatter;

    if formatter.is_json() {
        formatter.json(&LsOutput {
            path: &path,
            entries: &listing.entries,
            summary,
        });
        return ExitCode::Success;
    }

    if listing.is_empty() {
        formatter.println(&empty_message(&hierarchy, &path));
    } else {
        let options = RenderOptions {
            dates: args.dates.unwrap_or(ctx.preferences.dates),
            colors: formatter.colors_enabled(),
            now: Timestamp::now(),
        };
        formatter.println(&listing_table(&listing, &options));
    }

    if let Some(summary) = summary {
        formatter.println(&format!(
            "\nTotal: {} folder(s), {} file(s), {}",
            summary.total_folders, summary.total_files, summary.total_size_human
        ));
    }

    ExitCode::Success
}

fn display_path(path: &str) -> String {
    format!("/{path}")
}

/// Line printed instead of an empty table
fn empty_message(hierarchy: &Hierarchy, path: &str) -> String {
    if hierarchy.contains(path) {
        format!("{} is empty", display_path(path))
    } else {
        format!("{} does not exist", display_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: LsArgs,
    }

    #[test]
    fn test_ls_defaults_to_root() {
        let cli = TestCli::try_parse_from(["ls"]).unwrap();
        assert_eq!(cli.args.path, "");
        assert!(cli.args.dates.is_none());
        assert!(!cli.args.summarize);
    }

    #[test]
    fn test_ls_date_override() {
        let cli = TestCli::try_parse_from(["ls", "data/", "--dates", "ISO"]).unwrap();
        assert_eq!(cli.args.path, "data/");
        assert_eq!(cli.args.dates, Some(DateStyle::Iso));

        assert!(TestCli::try_parse_from(["ls", "--dates", "fuzzy"]).is_err());
    }

    #[test]
    fn test_summary_from_totals() {
        let summary = Summary::from(Totals {
            folders: 2,
            files: 3,
            size_bytes: 2048,
        });
        // Same units as the listing table
        assert_eq!(summary.total_size_human, "2 KB");
        assert_eq!(summary.total_files, 3);
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(""), "/");
        assert_eq!(display_path("data/images"), "/data/images");
    }

    #[test]
    fn test_summary_of_empty_subtree() {
        let summary = Summary::from(Totals::default());
        assert_eq!(summary.total_size_human, "0 B");
    }

    #[test]
    fn test_empty_message_tells_missing_from_empty() {
        let hierarchy = bx_core::build(&[
            bx_core::RawObjectRecord::new("logs/"),
            bx_core::RawObjectRecord::file("data/notes.md", 5),
        ]);
        assert_eq!(empty_message(&hierarchy, "logs"), "/logs is empty");
        assert_eq!(empty_message(&hierarchy, "missing"), "/missing does not exist");
        assert_eq!(empty_message(&bx_core::build(&[]), ""), "/ is empty");
    }
}
