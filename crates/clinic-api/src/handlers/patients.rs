//! Patient CRUD handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use clinic_core::pagination::{Page, PageQuery};
use clinic_core::validation::{
    parse_age, validate_address, validate_email, validate_name, validate_national_id,
    validate_phone,
};
use clinic_core::{BloodType, Gender, Patient, PatientDetail, PatientUpdate};

use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;

/// Creation payload. Age accepts a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatientPayload {
    pub name: String,
    pub age: Option<Value>,
    pub gender: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub email: Option<String>,
    pub blood_type: Option<String>,
    pub national_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdatePayload {
    pub name: Option<String>,
    pub age: Option<Value>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub blood_type: Option<String>,
    pub national_id: Option<String>,
}

pub async fn create(
    State(ctx): State<AppContext>,
    Json(payload): Json<NewPatientPayload>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    validate_name(&payload.name)?;
    validate_phone(&payload.phone)?;
    let age = parse_age(payload.age.as_ref())?;
    let gender = parse_opt::<Gender>(payload.gender.as_deref())?;
    let blood_type = parse_opt::<BloodType>(payload.blood_type.as_deref())?;
    if let Some(address) = &payload.address {
        validate_address(address)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    if let Some(national_id) = &payload.national_id {
        validate_national_id(national_id)?;
    }

    let mut patient = Patient::new(payload.name, payload.phone);
    patient.age = age;
    patient.gender = gender;
    patient.address = payload.address;
    patient.email = payload.email;
    patient.blood_type = blood_type;
    patient.national_id = payload.national_id;

    let db = ctx.lock_db()?;
    db.insert_patient(&patient)?;
    tracing::info!(patient_id = %patient.id, "patient created");

    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn list(
    State(ctx): State<AppContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<Patient>>> {
    let window = query.clamp();
    let db = ctx.lock_db()?;
    let patients = db.list_patients_page(window.limit, window.offset())?;
    let total = db.count_patients()?;
    Ok(Json(Page::new(patients, window, total)))
}

pub async fn get(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<PatientDetail>> {
    let db = ctx.lock_db()?;
    let detail = db
        .get_patient_detail(&id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".to_string()))?;
    Ok(Json(detail))
}

pub async fn update(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(payload): Json<PatientUpdatePayload>,
) -> ApiResult<Json<Patient>> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(phone) = &payload.phone {
        validate_phone(phone)?;
    }
    if let Some(address) = &payload.address {
        validate_address(address)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    if let Some(national_id) = &payload.national_id {
        validate_national_id(national_id)?;
    }

    let update = PatientUpdate {
        name: payload.name,
        age: parse_age(payload.age.as_ref())?,
        gender: parse_opt::<Gender>(payload.gender.as_deref())?,
        phone: payload.phone,
        address: payload.address,
        email: payload.email,
        blood_type: parse_opt::<BloodType>(payload.blood_type.as_deref())?,
        national_id: payload.national_id,
    };

    let db = ctx.lock_db()?;
    if !db.update_patient(&id, &update)? {
        return Err(ApiError::NotFound("Patient not found".to_string()));
    }
    let patient = db
        .get_patient(&id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".to_string()))?;
    Ok(Json(patient))
}

pub async fn delete(State(ctx): State<AppContext>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let db = ctx.lock_db()?;
    if !db.delete_patient(&id)? {
        return Err(ApiError::NotFound("Patient not found".to_string()));
    }
    tracing::info!(patient_id = %id, "patient deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn parse_opt<T: std::str::FromStr<Err = clinic_core::ValidationError>>(
    raw: Option<&str>,
) -> Result<Option<T>, ApiError> {
    raw.map(str::parse::<T>).transpose().map_err(ApiError::from)
}
