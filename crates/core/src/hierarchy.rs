//! Folder hierarchy reconstruction
//!
//! Object stores have no directories, only flat keys such as `a/b/c.txt` and
//! the occasional zero-byte marker `a/b/`. [`Hierarchy::build`] turns a
//! complete listing of such keys into one [`FolderListing`] per folder path,
//! materializing every implied intermediate folder exactly once.
//!
//! A hierarchy is a snapshot. It is rebuilt from a fresh listing after every
//! mutation and never patched in place.
//!
//! Ordering rules:
//! - within a listing, folders come before files and each group is ordered
//!   by byte-wise (case-sensitive) name comparison;
//! - names are unique within a listing; when a file `a` and a folder `a/`
//!   (two distinct objects in the store) share a parent, the folder entry is
//!   kept whatever the input order, since its listing must stay reachable;
//! - when the same file key is listed twice, the first record's metadata wins.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::format::{format_bytes, to_iso};
use crate::path::{join_path, normalize_folder_path, segments};

/// One object as reported by the store's listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObjectRecord {
    /// Full key, no leading slash; a trailing slash marks a folder marker
    pub key: String,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Last modified timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// Storage class label, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl RawObjectRecord {
    /// Record with only a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: None,
            last_modified: None,
            storage_class: None,
        }
    }

    /// Record for a regular object of `size` bytes
    pub fn file(key: impl Into<String>, size: u64) -> Self {
        Self {
            size: Some(size),
            ..Self::new(key)
        }
    }

    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    pub fn with_storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = Some(storage_class.into());
        self
    }

    /// Whether the key denotes an explicitly created folder
    pub fn is_folder_marker(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// Kind of a listing entry
///
/// The declaration order is the listing order: folders sort before files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// An immediate child of a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Final path segment, never empty and never containing `/`
    pub name: String,

    pub kind: EntryKind,

    /// ISO-8601 modification time, empty for folders
    pub last_modified: String,

    /// Raw modification time, kept for relative rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,

    /// Size in bytes (None for folders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Human-readable size (None for folders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Storage class (None for folders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl Entry {
    /// Folder entry; folders carry no object metadata
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Folder,
            last_modified: String::new(),
            timestamp: None,
            size_bytes: None,
            size_human: None,
            storage_class: None,
        }
    }

    /// File entry named `name`, metadata taken from `record`
    pub fn file(name: impl Into<String>, record: &RawObjectRecord) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            last_modified: to_iso(record.last_modified),
            timestamp: record.last_modified,
            size_bytes: record.size,
            size_human: record.size.map(|size| format_bytes(Some(size))),
            storage_class: record.storage_class.clone(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// The ordered children of one folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderListing {
    /// Normalized folder path, `""` for the root
    pub path: String,

    /// Folders first, then files, each group ordered by name
    pub entries: Vec<Entry>,
}

impl FolderListing {
    /// A listing with no entries
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn folders(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_folder())
    }

    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_folder())
    }

    /// Find an entry by kind and name
    pub fn find(&self, kind: EntryKind, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.kind == kind && e.name == name)
    }
}

/// Entry reached while walking a subtree
#[derive(Debug, Clone, Copy)]
pub struct WalkItem<'a> {
    /// Depth below the walked folder, starting at 0 for its direct children
    pub depth: usize,
    /// Folder containing `entry`
    pub parent: &'a str,
    pub entry: &'a Entry,
}

/// Aggregate counts of a subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub folders: usize,
    pub files: usize,
    pub size_bytes: u64,
}

/// Every folder listing of one bucket snapshot, keyed by folder path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    listings: BTreeMap<String, FolderListing>,
}

impl Hierarchy {
    /// Reconstruct the folder tree from a complete set of records
    ///
    /// Never fails on malformed keys: empty keys and keys made only of
    /// slashes are ignored, and empty segments are dropped.
    ///
    /// # Panics
    ///
    /// Panics if an entry is attached to a folder listing that was not
    /// materialized first. That is a bug in this module, not bad input.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RawObjectRecord>,
    {
        let mut builder = Builder::new();
        for record in records {
            builder.add(record);
        }
        builder.finish()
    }

    /// Listing for `path`, or an empty listing when the folder is unknown
    ///
    /// The path is normalized first, so `/data/` and `data` are the same.
    /// A folder created after the snapshot was taken shows as empty.
    pub fn listing(&self, path: &str) -> Cow<'_, FolderListing> {
        let path = normalize_folder_path(path);
        match self.listings.get(&path) {
            Some(listing) => Cow::Borrowed(listing),
            None => Cow::Owned(FolderListing::empty(path)),
        }
    }

    /// Listing for `path` if the folder exists in this snapshot
    pub fn get(&self, path: &str) -> Option<&FolderListing> {
        self.listings.get(&normalize_folder_path(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// The bucket root listing, always present
    pub fn root(&self) -> &FolderListing {
        &self.listings[""]
    }

    /// Number of folder listings, including the root
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Always false: the root listing exists even for an empty bucket
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Folder paths, shallowest first, ties broken by path
    pub fn paths(&self) -> Vec<&str> {
        self.iter().map(|listing| listing.path.as_str()).collect()
    }

    /// Listings, shallowest first, ties broken by path
    pub fn iter(&self) -> impl Iterator<Item = &FolderListing> {
        let mut listings: Vec<&FolderListing> = self.listings.values().collect();
        listings.sort_by(|a, b| {
            depth(&a.path)
                .cmp(&depth(&b.path))
                .then_with(|| a.path.cmp(&b.path))
        });
        listings.into_iter()
    }

    /// Pre-order walk of the subtree under `path`
    ///
    /// Folders are descended into right after they are yielded. `max_depth`
    /// limits how deep the walk goes; `Some(0)` yields only direct children.
    pub fn walk(&self, path: &str, max_depth: Option<usize>) -> Vec<WalkItem<'_>> {
        let Some(start) = self.get(path) else {
            return Vec::new();
        };

        let mut items = Vec::new();
        let mut stack: Vec<(usize, &FolderListing, usize)> = vec![(0, start, 0)];
        while let Some((depth, listing, next)) = stack.pop() {
            let Some(entry) = listing.entries.get(next) else {
                continue;
            };
            stack.push((depth, listing, next + 1));
            items.push(WalkItem {
                depth,
                parent: &listing.path,
                entry,
            });

            if entry.is_folder() && max_depth.is_none_or(|max| depth < max) {
                let child = join_path(&listing.path, &entry.name);
                if let Some(child) = self.listings.get(&child) {
                    stack.push((depth + 1, child, 0));
                }
            }
        }
        items
    }

    /// Folder count, file count and total bytes under `path`
    pub fn totals(&self, path: &str) -> Totals {
        self.walk(path, None)
            .into_iter()
            .fold(Totals::default(), |mut totals, item| {
                if item.entry.is_folder() {
                    totals.folders += 1;
                } else {
                    totals.files += 1;
                    totals.size_bytes += item.entry.size_bytes.unwrap_or(0);
                }
                totals
            })
    }
}

/// Build a hierarchy from records
pub fn build(records: &[RawObjectRecord]) -> Hierarchy {
    Hierarchy::build(records)
}

fn depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split('/').count()
    }
}

#[derive(Default)]
struct PendingListing {
    entries: Vec<Entry>,
    /// Entry index by name
    seen: HashMap<String, usize>,
}

struct Builder {
    pending: HashMap<String, PendingListing>,
}

impl Builder {
    fn new() -> Self {
        let mut builder = Self {
            pending: HashMap::new(),
        };
        builder.ensure("");
        builder
    }

    fn ensure(&mut self, path: &str) {
        if !self.pending.contains_key(path) {
            self.pending.insert(path.to_string(), PendingListing::default());
        }
    }

    fn attach(&mut self, parent: &str, entry: Entry) {
        let Some(listing) = self.pending.get_mut(parent) else {
            panic!(
                "hierarchy invariant violated: listing '{parent}' was not materialized before attaching '{}'",
                entry.name
            );
        };
        match listing.seen.get(&entry.name) {
            None => {
                listing.seen.insert(entry.name.clone(), listing.entries.len());
                listing.entries.push(entry);
            }
            Some(&index) => {
                let existing = &mut listing.entries[index];
                if existing.kind == EntryKind::File && entry.kind == EntryKind::Folder {
                    trace!(name = %entry.name, "folder replaces file of the same name");
                    *existing = entry;
                }
            }
        }
    }

    fn add(&mut self, record: &RawObjectRecord) {
        let parts: Vec<&str> = segments(&record.key).collect();
        let Some((last, ancestors)) = parts.split_last() else {
            trace!(key = %record.key, "skipping key without segments");
            return;
        };

        let mut parent = String::new();
        for name in ancestors {
            let path = join_path(&parent, name);
            self.ensure(&path);
            self.attach(&parent, Entry::folder(*name));
            parent = path;
        }

        if record.is_folder_marker() {
            self.ensure(&join_path(&parent, last));
            self.attach(&parent, Entry::folder(*last));
        } else {
            self.attach(&parent, Entry::file(*last, record));
        }
    }

    fn finish(self) -> Hierarchy {
        let listings = self
            .pending
            .into_iter()
            .map(|(path, pending)| {
                let mut entries = pending.entries;
                entries.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
                (path.clone(), FolderListing { path, entries })
            })
            .collect();
        Hierarchy { listings }
    }
}
