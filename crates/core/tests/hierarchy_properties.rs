//! Property tests for hierarchy reconstruction
//!
//! Keys are generated from a small vocabulary so that folders and files
//! collide often, including a file and a folder with the same name in the
//! same parent.

use std::collections::HashSet;

use bx_core::path::{last_segment, normalize_folder_path, parent_path, segments};
use bx_core::{EntryKind, Hierarchy, RawObjectRecord};
use proptest::prelude::*;

const FOLDERS: &[&str] = &["a", "b", "c", "D", ""];
const FILES: &[&str] = &["x.txt", "y.txt", "Z.txt", "notes.md", "a", "b"];

fn record_strategy() -> impl Strategy<Value = RawObjectRecord> {
    (
        prop::collection::vec(prop::sample::select(FOLDERS), 0..4),
        prop::option::of(prop::sample::select(FILES)),
    )
        .prop_map(|(folders, file)| {
            let dir = folders.join("/");
            match file {
                // Size derived from the normalized key so duplicates agree on metadata
                Some(file) => {
                    let key = if dir.is_empty() {
                        file.to_string()
                    } else {
                        format!("{dir}/{file}")
                    };
                    let size = normalize_folder_path(&key).len() as u64;
                    RawObjectRecord::file(key, size)
                }
                None => RawObjectRecord::new(format!("{dir}/")),
            }
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<RawObjectRecord>> {
    prop::collection::vec(record_strategy(), 0..40)
}

proptest! {
    #[test]
    fn every_folder_is_linked_from_its_parent(records in records_strategy()) {
        let hierarchy = Hierarchy::build(&records);
        for listing in hierarchy.iter() {
            let Some(parent) = parent_path(&listing.path) else {
                continue;
            };
            let parent_listing = hierarchy.get(parent);
            prop_assert!(parent_listing.is_some(), "missing parent of {}", listing.path);
            let matches = parent_listing
                .unwrap()
                .entries
                .iter()
                .filter(|e| e.kind == EntryKind::Folder && e.name == last_segment(&listing.path))
                .count();
            prop_assert_eq!(matches, 1);
        }
    }

    #[test]
    fn names_are_unique_within_a_listing(records in records_strategy()) {
        let hierarchy = Hierarchy::build(&records);
        for listing in hierarchy.iter() {
            let mut seen = HashSet::new();
            for entry in &listing.entries {
                prop_assert!(!entry.name.is_empty());
                prop_assert!(!entry.name.contains('/'));
                prop_assert!(seen.insert(entry.name.as_str()), "duplicate {}", entry.name);
            }
        }
    }

    #[test]
    fn building_twice_is_identical(records in records_strategy()) {
        prop_assert_eq!(Hierarchy::build(&records), Hierarchy::build(&records));
    }

    #[test]
    fn input_order_does_not_matter(
        (records, shuffled) in records_strategy()
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
    ) {
        prop_assert_eq!(Hierarchy::build(&records), Hierarchy::build(&shuffled));
    }

    #[test]
    fn folders_precede_files_and_groups_are_sorted(records in records_strategy()) {
        let hierarchy = Hierarchy::build(&records);
        for listing in hierarchy.iter() {
            for pair in listing.entries.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!((a.kind, &a.name) < (b.kind, &b.name));
            }
        }
    }

    #[test]
    fn every_record_has_its_terminal_entry(records in records_strategy()) {
        let hierarchy = Hierarchy::build(&records);
        for record in &records {
            let parts: Vec<&str> = segments(&record.key).collect();
            let Some((last, ancestors)) = parts.split_last() else {
                continue;
            };
            let parent = ancestors.join("/");
            let kind = if record.is_folder_marker() {
                EntryKind::Folder
            } else {
                EntryKind::File
            };
            let listing = hierarchy.get(&parent);
            prop_assert!(listing.is_some(), "missing listing {}", parent);
            let listing = listing.unwrap();
            // A file may be shadowed by a folder of the same name, never the reverse
            let found = listing.find(kind, last).is_some()
                || (kind == EntryKind::File && listing.find(EntryKind::Folder, last).is_some());
            prop_assert!(found, "missing entry {} in {}", last, parent);
        }
    }

    #[test]
    fn folders_shadow_files_of_the_same_name(records in records_strategy()) {
        let hierarchy = Hierarchy::build(&records);
        for listing in hierarchy.iter() {
            for entry in listing.files() {
                let path = bx_core::path::join_path(&listing.path, &entry.name);
                prop_assert!(!hierarchy.contains(&path), "file {} hides a folder", path);
            }
        }
    }

    #[test]
    fn root_is_always_present(records in records_strategy()) {
        let hierarchy = Hierarchy::build(&records);
        prop_assert_eq!(hierarchy.root().path.as_str(), "");
        prop_assert_eq!(hierarchy.paths()[0], "");
    }
}
