//! Prescription handlers. Mutations require the doctor or admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use clinic_core::pagination::{Page, PageQuery};
use clinic_core::{Medication, Prescription};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrescriptionPayload {
    pub visit_id: String,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub medications: Vec<MedicationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionUpdatePayload {
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub medications: Vec<MedicationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationPayload {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

impl MedicationPayload {
    fn into_medication(self, prescription_id: &str) -> Result<Medication, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Medication name is required".to_string()));
        }
        let mut medication = Medication::new(prescription_id.to_string(), self.name);
        medication.dosage = self.dosage;
        medication.frequency = self.frequency;
        medication.duration = self.duration;
        medication.instructions = self.instructions;
        Ok(medication)
    }
}

fn require_prescriber(user: &AuthUser) -> Result<(), ApiError> {
    if user.role.can_prescribe() {
        Ok(())
    } else {
        tracing::warn!(username = %user.username, role = %user.role, "prescription mutation denied");
        Err(ApiError::Forbidden)
    }
}

pub async fn create(
    State(ctx): State<AppContext>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewPrescriptionPayload>,
) -> ApiResult<(StatusCode, Json<Prescription>)> {
    require_prescriber(&user)?;

    let db = ctx.lock_db()?;
    if db.get_visit(&payload.visit_id)?.is_none() {
        return Err(ApiError::NotFound("Visit not found".to_string()));
    }

    let mut prescription = Prescription::new(payload.visit_id);
    prescription.additional_notes = payload.additional_notes;
    prescription.medications = payload
        .medications
        .into_iter()
        .map(|m| m.into_medication(&prescription.id))
        .collect::<Result<_, _>>()?;

    db.insert_prescription(&prescription)?;
    tracing::info!(prescription_id = %prescription.id, by = %user.username, "prescription created");
    Ok((StatusCode::CREATED, Json(prescription)))
}

pub async fn list(
    State(ctx): State<AppContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<Prescription>>> {
    let window = query.clamp();
    let db = ctx.lock_db()?;
    let prescriptions = db.list_prescriptions_page(window.limit, window.offset())?;
    let total = db.count_prescriptions()?;
    Ok(Json(Page::new(prescriptions, window, total)))
}

pub async fn get(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Prescription>> {
    let db = ctx.lock_db()?;
    let prescription = db
        .get_prescription(&id)?
        .ok_or_else(|| ApiError::NotFound("Prescription not found".to_string()))?;
    Ok(Json(prescription))
}

pub async fn update(
    State(ctx): State<AppContext>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<PrescriptionUpdatePayload>,
) -> ApiResult<Json<Prescription>> {
    require_prescriber(&user)?;

    let medications = payload
        .medications
        .into_iter()
        .map(|m| m.into_medication(&id))
        .collect::<Result<Vec<_>, _>>()?;

    let mut db = ctx.lock_db()?;
    let updated = db.update_prescription(&id, payload.additional_notes.as_deref(), &medications)?;
    if !updated {
        return Err(ApiError::NotFound("Prescription not found".to_string()));
    }
    let prescription = db
        .get_prescription(&id)?
        .ok_or_else(|| ApiError::NotFound("Prescription not found".to_string()))?;
    Ok(Json(prescription))
}

pub async fn delete(
    State(ctx): State<AppContext>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    require_prescriber(&user)?;

    let db = ctx.lock_db()?;
    if !db.delete_prescription(&id)? {
        return Err(ApiError::NotFound("Prescription not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
