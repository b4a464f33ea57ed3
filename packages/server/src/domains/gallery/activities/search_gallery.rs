//! Gallery read actions
//!
//! Both surfaces are public; nothing here checks capabilities.

use tracing::warn;

use crate::common::AppError;
use crate::domains::gallery::models::GalleryEntry;
use crate::kernel::ServerDeps;

/// List approved entries, most recently approved first.
pub async fn list_gallery(deps: &ServerDeps) -> Result<Vec<GalleryEntry>, AppError> {
    Ok(GalleryEntry::list_approved(&deps.db_pool).await?)
}

/// Search approved entries by free text.
///
/// Blank queries return an empty list without touching the index, and an
/// index outage degrades to an empty list as well.
pub async fn search_gallery(query: &str, deps: &ServerDeps) -> Vec<GalleryEntry> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    match deps.search_index.search(query).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "gallery search unavailable");
            Vec::new()
        }
    }
}
