use axum::extract::{Extension, Query};
use axum::Json;
use serde::Deserialize;

use crate::common::AppError;
use crate::domains::gallery::activities::{list_gallery, search_gallery};
use crate::domains::gallery::models::GalleryEntry;
use crate::server::app::AxumAppState;

#[derive(Debug, Deserialize)]
pub struct GallerySearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/gallery - approved photos, most recently approved first
pub async fn list_gallery_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<Vec<GalleryEntry>>, AppError> {
    let entries = list_gallery(&state.server_deps).await?;
    Ok(Json(entries))
}

/// GET /api/gallery/search?q= - free-text search over approved photos
///
/// Infallible: a blank query or a search outage returns an empty list.
pub async fn search_gallery_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<GallerySearchQuery>,
) -> Json<Vec<GalleryEntry>> {
    let q = query.q.unwrap_or_default();
    Json(search_gallery(&q, &state.server_deps).await)
}
