//! Rendering of hierarchy snapshots
//!
//! Renderers only read the snapshot; sizes and ISO dates were formatted when
//! it was built. The one input that changes between runs, the current time
//! for relative dates, is passed in.

use bx_core::format::format_relative;
use bx_core::{DateStyle, Entry, EntryKind, FolderListing, Hierarchy};
use comfy_table::{Attribute, Cell, Color, Table, presets};
use jiff::Timestamp;

/// Shown for files whose listing carried no storage class
const UNKNOWN_STORAGE_CLASS: &str = "Unknown";

/// Settings shared by the renderers
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub dates: DateStyle,
    pub colors: bool,
    pub now: Timestamp,
}

/// Display name: folders get a trailing slash
pub fn display_name(entry: &Entry) -> String {
    match entry.kind {
        EntryKind::Folder => format!("{}/", entry.name),
        EntryKind::File => entry.name.clone(),
    }
}

/// Modification column for `entry`, empty for folders
pub fn display_date(entry: &Entry, options: &RenderOptions) -> String {
    match (options.dates, entry.timestamp) {
        (DateStyle::Relative, Some(ts)) => format_relative(ts, options.now),
        _ => entry.last_modified.clone(),
    }
}

/// Table of one folder's entries
pub fn listing_table(listing: &FolderListing, options: &RenderOptions) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_HORIZONTAL_ONLY)
        .set_header(vec!["Name", "Type", "Last modified", "Size", "Storage class"]);
    if !options.colors {
        table.force_no_tty();
    }

    for entry in &listing.entries {
        let mut name = Cell::new(display_name(entry));
        if options.colors && entry.is_folder() {
            name = name.fg(Color::Blue).add_attribute(Attribute::Bold);
        }

        let row = match entry.kind {
            EntryKind::Folder => vec![
                name,
                Cell::new("folder"),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
            ],
            EntryKind::File => vec![
                name,
                Cell::new("file"),
                Cell::new(display_date(entry, options)),
                Cell::new(entry.size_human.as_deref().unwrap_or(bx_core::format::EMPTY_SIZE)),
                Cell::new(
                    entry
                        .storage_class
                        .as_deref()
                        .unwrap_or(UNKNOWN_STORAGE_CLASS),
                ),
            ],
        };
        table.add_row(row);
    }

    table.to_string()
}

/// Indented tree of the subtree under `path`
///
/// The first line is the folder itself (`/` for the root).
pub fn tree_lines(hierarchy: &Hierarchy, path: &str, max_depth: Option<usize>) -> Vec<String> {
    let items = hierarchy.walk(path, max_depth);

    // An item is the last child of its folder when no later sibling follows
    // before the walk climbs back above its depth.
    let mut is_last = vec![false; items.len()];
    let mut later_sibling: Vec<bool> = Vec::new();
    for (i, item) in items.iter().enumerate().rev() {
        if later_sibling.len() <= item.depth {
            later_sibling.resize(item.depth + 1, false);
        }
        is_last[i] = !later_sibling[item.depth];
        later_sibling[item.depth] = true;
        later_sibling.truncate(item.depth + 1);
    }

    let root = bx_core::path::normalize_folder_path(path);
    let mut lines = vec![if root.is_empty() {
        "/".to_string()
    } else {
        format!("{root}/")
    }];

    let mut open: Vec<bool> = Vec::new();
    for (item, last) in items.iter().zip(is_last) {
        open.truncate(item.depth);
        let mut line: String = open
            .iter()
            .map(|&more| if more { "│   " } else { "    " })
            .collect();
        line.push_str(if last { "└── " } else { "├── " });
        line.push_str(&display_name(item.entry));
        lines.push(line);
        open.push(!last);
    }

    lines
}
