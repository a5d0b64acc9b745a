//! Visit handlers. Visits are created by the queue; the API reads,
//! updates and deletes them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use clinic_core::db::visits::VisitDetail;
use clinic_core::pagination::{Page, PageQuery};
use clinic_core::{Visit, VisitStatus, VisitUpdate, VisitWithPatient};

use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisitUpdatePayload {
    pub chief_complaint: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    /// Absent means the visit is being closed out as completed.
    pub status: Option<String>,
}

pub async fn list(
    State(ctx): State<AppContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<VisitWithPatient>>> {
    let window = query.clamp();
    let db = ctx.lock_db()?;
    let visits = db.list_visits_page(window.limit, window.offset())?;
    let total = db.count_visits()?;
    Ok(Json(Page::new(visits, window, total)))
}

pub async fn get(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<VisitDetail>> {
    let db = ctx.lock_db()?;
    let detail = db
        .get_visit_detail(&id)?
        .ok_or_else(|| ApiError::NotFound("Visit not found".to_string()))?;
    Ok(Json(detail))
}

pub async fn update(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(payload): Json<VisitUpdatePayload>,
) -> ApiResult<Json<Visit>> {
    let status = payload
        .status
        .as_deref()
        .map(str::parse::<VisitStatus>)
        .transpose()?;
    let update = VisitUpdate {
        chief_complaint: payload.chief_complaint,
        diagnosis: payload.diagnosis,
        notes: payload.notes,
        status,
    };

    let db = ctx.lock_db()?;
    if !db.update_visit(&id, &update)? {
        return Err(ApiError::NotFound("Visit not found".to_string()));
    }
    let visit = db
        .get_visit(&id)?
        .ok_or_else(|| ApiError::NotFound("Visit not found".to_string()))?;
    Ok(Json(visit))
}

pub async fn delete(State(ctx): State<AppContext>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let db = ctx.lock_db()?;
    if !db.delete_visit(&id)? {
        return Err(ApiError::NotFound("Visit not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
