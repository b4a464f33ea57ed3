//! Publish gallery entry action - best-effort search indexing

use tracing::{debug, warn};

use crate::domains::gallery::models::GalleryEntry;
use crate::kernel::ServerDeps;

/// Push an approved entry into the search index.
///
/// Indexing failures are logged and swallowed. The gallery listing reads
/// from the database, so a missing document only degrades search until the
/// entry is re-published.
pub async fn publish_gallery_entry(entry: GalleryEntry, deps: &ServerDeps) {
    match deps.search_index.publish(&entry).await {
        Ok(()) => debug!(entry_id = %entry.id, "gallery entry indexed"),
        Err(e) => {
            warn!(entry_id = %entry.id, error = %e, "failed to index gallery entry")
        }
    }
}
