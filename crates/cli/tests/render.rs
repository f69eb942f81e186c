//! Snapshot tests for listing and tree rendering

use bucket_explorer::output::render::{RenderOptions, listing_table, tree_lines};
use bx_core::{DateStyle, Hierarchy, RawObjectRecord};
use insta::{assert_json_snapshot, assert_snapshot};

fn sample_bucket() -> Hierarchy {
    let modified = "2025-08-26T14:22:00Z".parse().unwrap();
    Hierarchy::build(&[
        RawObjectRecord::file("data/notes.md", 5120)
            .with_last_modified(modified)
            .with_storage_class("STANDARD"),
        RawObjectRecord::new("data/images/"),
        RawObjectRecord::file("data/images/photo1.png", 1_468_006).with_last_modified(modified),
        RawObjectRecord::file("readme.txt", 0),
        RawObjectRecord::new("logs/"),
    ])
}

fn options(dates: DateStyle) -> RenderOptions {
    RenderOptions {
        dates,
        colors: false,
        now: "2025-08-28T14:22:00Z".parse().unwrap(),
    }
}

#[test]
fn test_data_listing_json() {
    let hierarchy = sample_bucket();
    assert_json_snapshot!(hierarchy.listing("data").into_owned(), @r#"
    {
      "path": "data",
      "entries": [
        {
          "name": "images",
          "kind": "folder",
          "last_modified": ""
        },
        {
          "name": "notes.md",
          "kind": "file",
          "last_modified": "2025-08-26T14:22:00.000Z",
          "timestamp": "2025-08-26T14:22:00Z",
          "size_bytes": 5120,
          "size_human": "5 KB",
          "storage_class": "STANDARD"
        }
      ]
    }
    "#);
}

#[test]
fn test_tree_of_bucket() {
    let hierarchy = sample_bucket();
    assert_snapshot!(tree_lines(&hierarchy, "", None).join("\n"), @r"
    /
    ├── data/
    │   ├── images/
    │   │   └── photo1.png
    │   └── notes.md
    ├── logs/
    └── readme.txt
    ");
}

#[test]
fn test_tree_depth_limit() {
    let hierarchy = sample_bucket();
    assert_snapshot!(tree_lines(&hierarchy, "", Some(0)).join("\n"), @r"
    /
    ├── data/
    ├── logs/
    └── readme.txt
    ");
}

#[test]
fn test_listing_table_relative_dates() {
    let hierarchy = sample_bucket();
    let table = listing_table(&hierarchy.listing("data"), &options(DateStyle::Relative));

    for header in ["Name", "Type", "Last modified", "Size", "Storage class"] {
        assert!(table.contains(header), "missing header {header}");
    }
    assert!(table.contains("images/"));
    assert!(table.contains("2 days ago"));
    assert!(table.contains("5 KB"));
    assert!(table.contains("STANDARD"));

    // Folders are listed before files
    let images = table.find("images/").unwrap();
    let notes = table.find("notes.md").unwrap();
    assert!(images < notes);
}

#[test]
fn test_listing_table_iso_dates_and_unknown_class() {
    let hierarchy = sample_bucket();
    let table = listing_table(&hierarchy.listing("data/images"), &options(DateStyle::Iso));

    assert!(table.contains("photo1.png"));
    assert!(table.contains("2025-08-26T14:22:00.000Z"));
    assert!(table.contains("1.4 MB"));
    assert!(table.contains("Unknown"));
}

#[test]
fn test_zero_byte_file_shows_sentinel() {
    let hierarchy = sample_bucket();
    let table = listing_table(hierarchy.root(), &options(DateStyle::Iso));
    assert!(table.contains("readme.txt"));
    assert!(table.contains("0 B"));
}
