//! Public changelog endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chronicle_core::{ChangelogEntry, Page};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 1-indexed page number. Missing or unreadable values mean the first page.
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page_number(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

/// Parse an entry id from the path. An id that cannot exist is reported as
/// not found, like any other missing entry.
pub fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Changelog with id '{}' not found", raw)))
}

/// List changelogs, newest release first.
/// GET /changelogs
pub async fn list_changelogs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ChangelogEntry>>> {
    let page_number = query.page_number();
    let page = state
        .blocking(move |s| s.public.list_page(page_number))
        .await?;
    Ok(Json(page))
}

/// Get a single changelog.
/// GET /changelogs/:id
pub async fn show_changelog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChangelogEntry>> {
    let id = parse_id(&id)?;
    let entry = state.blocking(move |s| s.public.show_detail(id)).await?;
    Ok(Json(entry))
}
