//! Listing driver
//!
//! Loops a store's paginated listing until the cursor runs out. The
//! hierarchy is only built from the complete record set: an implied folder
//! can appear on any page, so partial builds are never exposed.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchy, RawObjectRecord};
use crate::traits::ObjectStore;

/// Continuation token state of one listing loop
///
/// A token the store hands out twice means the listing cycles; every token
/// seen so far is remembered, not just the previous one.
#[derive(Debug, Default)]
struct Cursor {
    token: Option<String>,
    seen: HashSet<String>,
}

impl Cursor {
    fn current(&self) -> Option<String> {
        self.token.clone()
    }

    /// Move to `next`; `Ok(false)` once the listing is exhausted
    fn advance(&mut self, next: Option<String>) -> Result<bool> {
        let Some(next) = next else {
            return Ok(false);
        };
        if !self.seen.insert(next.clone()) {
            return Err(Error::General(format!(
                "Storage listing returned the same continuation token twice: {next}"
            )));
        }
        self.token = Some(next);
        Ok(true)
    }
}

/// Fetch every record under `prefix`, following continuation tokens
pub async fn collect_records<S>(store: &S, prefix: &str) -> Result<Vec<RawObjectRecord>>
where
    S: ObjectStore + ?Sized,
{
    let mut records = Vec::new();
    let mut cursor = Cursor::default();
    let mut pages = 0usize;

    loop {
        let page = store.list_page(prefix, cursor.current()).await?;
        pages += 1;
        debug!(prefix, page = pages, records = page.records.len(), "fetched listing page");
        records.extend(page.records);

        if !cursor.advance(page.continuation_token)? {
            break;
        }
    }

    Ok(records)
}

/// Fetch everything under `prefix` and build one hierarchy snapshot
pub async fn build_snapshot<S>(store: &S, prefix: &str) -> Result<Hierarchy>
where
    S: ObjectStore + ?Sized,
{
    let records = collect_records(store, prefix).await?;
    let hierarchy = Hierarchy::build(&records);
    debug!(
        records = records.len(),
        folders = hierarchy.len(),
        "built hierarchy snapshot"
    );
    Ok(hierarchy)
}

/// Delete every object whose key starts with `prefix`
///
/// Pages are listed and batch deleted one at a time. Returns the number of
/// keys the store confirmed as deleted. An empty prefix empties the bucket;
/// callers are expected to guard against that.
pub async fn delete_prefix<S>(store: &S, prefix: &str) -> Result<usize>
where
    S: ObjectStore + ?Sized,
{
    let mut deleted = 0usize;
    let mut cursor = Cursor::default();

    loop {
        let page = store.list_page(prefix, cursor.current()).await?;
        let keys: Vec<String> = page
            .records
            .into_iter()
            .map(|record| record.key)
            .filter(|key| !key.is_empty())
            .collect();

        if !keys.is_empty() {
            let requested = keys.len();
            let confirmed = store.delete_objects(keys).await?;
            if confirmed.len() < requested {
                warn!(
                    prefix,
                    requested,
                    confirmed = confirmed.len(),
                    "store did not confirm every deletion"
                );
            }
            deleted += confirmed.len();
        }

        if !cursor.advance(page.continuation_token)? {
            break;
        }
    }

    debug!(prefix, deleted, "deleted prefix");
    Ok(deleted)
}
