//! ObjectStore trait definition
//!
//! This trait defines the storage operations the explorer needs from an
//! S3-compatible bucket. It keeps the core independent of any SDK and is
//! mocked in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hierarchy::RawObjectRecord;

/// Content type used when none is given or guessed
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One page of a recursive listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    /// Objects on this page, in store order
    pub records: Vec<RawObjectRecord>,

    /// Cursor for the next page, `None` on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl ListPage {
    /// Final page holding `records`
    pub fn last(records: Vec<RawObjectRecord>) -> Self {
        Self {
            records,
            continuation_token: None,
        }
    }
}

/// Options for uploads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// MIME type, [`DEFAULT_CONTENT_TYPE`] when unset
    pub content_type: Option<String>,

    /// Storage class to store the object in, bucket default when unset
    pub storage_class: Option<String>,
}

impl PutOptions {
    /// Content type to send with the upload
    pub fn effective_content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
/// Every mutation invalidates previously built hierarchies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of every object under `prefix`, without a delimiter
    async fn list_page(&self, prefix: &str, continuation: Option<String>) -> Result<ListPage>;

    /// Get object content as bytes
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    /// Upload an object, replacing any existing object at `key`
    async fn put_object(&self, key: &str, data: Vec<u8>, options: PutOptions) -> Result<()>;

    /// Create the zero-byte marker for folder `name` inside `folder`
    ///
    /// Returns the marker key.
    async fn create_folder(&self, folder: &str, name: &str) -> Result<String>;

    /// Delete a single object
    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Delete a batch of objects, returning the keys the store confirmed
    async fn delete_objects(&self, keys: Vec<String>) -> Result<Vec<String>>;
}
