//! Waiting queue handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use clinic_core::{
    ActiveQueueEntry, CompleteOutcome, EnqueueOutcome, NewQueueEntry, QueueManager, Visit,
};

use crate::error::ApiResult;
use crate::state::AppContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub cancelled_visit: Option<Visit>,
}

pub async fn enqueue(
    State(ctx): State<AppContext>,
    Json(request): Json<NewQueueEntry>,
) -> ApiResult<(StatusCode, Json<EnqueueOutcome>)> {
    let mut db = ctx.lock_db()?;
    let mut manager = QueueManager::new(&mut db, &ctx.events);
    if let Some(doctor) = &ctx.doctor_name {
        manager = manager.with_doctor(doctor.clone());
    }
    let outcome = manager.enqueue(request)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn list_active(State(ctx): State<AppContext>) -> ApiResult<Json<Vec<ActiveQueueEntry>>> {
    let db = ctx.lock_db()?;
    Ok(Json(db.list_active_queue()?))
}

pub async fn start(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<clinic_core::QueueEntry>> {
    let mut db = ctx.lock_db()?;
    let entry = QueueManager::new(&mut db, &ctx.events).start(&id)?;
    Ok(Json(entry))
}

pub async fn complete(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<CompleteOutcome>> {
    let mut db = ctx.lock_db()?;
    let outcome = QueueManager::new(&mut db, &ctx.events).complete(&id)?;
    Ok(Json(outcome))
}

pub async fn remove(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<RemoveResponse>> {
    let mut db = ctx.lock_db()?;
    let cancelled_visit = QueueManager::new(&mut db, &ctx.events).remove(&id)?;
    Ok(Json(RemoveResponse { cancelled_visit }))
}
