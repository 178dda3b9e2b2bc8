//! Admin changelog management endpoints.
//!
//! Writes answer with the serialized [`AdminOutcome`]: a redirect becomes
//! `303 See Other` pointing at the admin list, a re-rendered form becomes
//! `422 Unprocessable Entity`. Both bodies carry the one-shot notice.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chronicle_core::surface::notice::UPDATE_FAILED;
use chronicle_core::{AdminOutcome, ChangelogEntry, ChangelogFields, ChronicleResult, Notice, Page};
use serde_json::Value;
use serde::Serialize;

use super::changelogs::{parse_id, PageQuery};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Where successful and failed-without-form writes send the user.
pub const ADMIN_LIST_PATH: &str = "/admin/changelogs";

/// HTTP rendering of an admin write outcome.
#[derive(Debug)]
pub struct OutcomeResponse(pub AdminOutcome);

impl IntoResponse for OutcomeResponse {
    fn into_response(self) -> Response {
        match self.0 {
            outcome @ AdminOutcome::Redirect { .. } => (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, ADMIN_LIST_PATH)],
                Json(outcome),
            )
                .into_response(),
            outcome @ AdminOutcome::Rerender { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(outcome)).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub form: ChangelogFields,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub entry: ChangelogEntry,
    pub form: ChangelogFields,
}

/// List changelogs for management.
/// GET /admin/changelogs
pub async fn list_changelogs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<ChangelogEntry>>> {
    let page_number = query.page_number();
    let page = state
        .blocking(move |s| s.admin.list_page(page_number))
        .await?;
    Ok(Json(page))
}

/// Blank form for a new changelog.
/// GET /admin/changelogs/new
pub async fn new_changelog(State(state): State<AppState>) -> Json<FormResponse> {
    Json(FormResponse {
        form: state.admin.new_form(),
    })
}

/// Create a changelog.
/// POST /admin/changelogs
pub async fn create_changelog(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<OutcomeResponse> {
    let Json(body) = body?;
    let outcome = state
        .blocking(move |s| s.admin.create_submission(&body))
        .await?;
    Ok(OutcomeResponse(outcome))
}

/// Load a changelog for editing.
/// GET /admin/changelogs/:id/edit
pub async fn edit_changelog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EditResponse>> {
    let id = parse_id(&id)?;
    let loaded = state.blocking(move |s| s.admin.load_for_edit(id)).await?;
    Ok(Json(EditResponse {
        form: loaded.form(),
        entry: loaded.into_entry(),
    }))
}

/// Update a changelog.
/// PUT /admin/changelogs/:id
/// PATCH /admin/changelogs/:id
pub async fn update_changelog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<OutcomeResponse> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let outcome = state
        .blocking(move |s| -> ApiResult<AdminOutcome> {
            let loaded = s.admin.load_for_edit(id)?;
            s.admin.update_submission(loaded, &body).map_err(|err| {
                // Deleted between load and write.
                if err.is_not_found() {
                    ApiError::from(err)
                        .with_details(serde_json::json!({ "notice": Notice::failure(UPDATE_FAILED) }))
                } else {
                    err.into()
                }
            })
        })
        .await?;
    Ok(OutcomeResponse(outcome))
}

/// Delete a changelog.
/// DELETE /admin/changelogs/:id
pub async fn destroy_changelog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OutcomeResponse> {
    let id = parse_id(&id)?;
    let outcome = state
        .blocking(move |s| -> ChronicleResult<AdminOutcome> {
            let loaded = s.admin.load_for_edit(id)?;
            s.admin.destroy(loaded)
        })
        .await?;
    Ok(OutcomeResponse(outcome))
}
