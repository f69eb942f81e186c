//! bx-core: Core library for the bx bucket explorer
//!
//! This crate provides the core functionality for bx, including:
//! - Folder hierarchy reconstruction from flat object keys
//! - Size and date formatting for listings
//! - Folder path and object key handling
//! - The ObjectStore trait and the paginated listing driver
//! - Configuration, preferences and bucket profiles
//!
//! This crate is independent of any specific S3 SDK, so the hierarchy and
//! listing logic can be tested without a server.

pub mod config;
pub mod error;
pub mod format;
pub mod hierarchy;
pub mod listing;
pub mod path;
pub mod profile;
pub mod traits;

pub use config::{ColorMode, Config, ConfigManager, DateStyle, Preferences};
pub use error::{Error, Result};
pub use hierarchy::{
    Entry, EntryKind, FolderListing, Hierarchy, RawObjectRecord, Totals, WalkItem, build,
};
pub use listing::{build_snapshot, collect_records, delete_prefix};
pub use profile::{Profile, ProfileManager};
pub use traits::{ListPage, ObjectStore, PutOptions};
