use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::{extract::WithRejection, TypedHeader};
use headers::Host;
use tracing::{debug, info};

use shared_database::Repository;
use shared_models::auth::AuthenticatedUser;
use shared_models::error::AppError;
use shared_models::pagination::{Page, PageQuery, PageRequest, Sort};
use shared_utils::validation::ValidatedJson;

use crate::models::{CreatePatientRequest, Patient, PatientDetails, PatientSummary, UpdatePatientRequest};
use crate::router::PatientState;

async fn load_patient(patients: &dyn Repository<Patient>, id: i64) -> Result<Patient, AppError> {
    patients
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", id)))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<PatientState>,
    host: Option<TypedHeader<Host>>,
    ValidatedJson(request): ValidatedJson<CreatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patient = state.patients.save(Patient::from(request)).await?;
    let id = patient
        .id
        .ok_or_else(|| AppError::Internal("Saved patient has no id".to_string()))?;

    info!("Patient {} registered", id);

    let location = match host {
        Some(TypedHeader(host)) => format!("http://{}/pacientes/{}", host, id),
        None => format!("/pacientes/{}", id),
    };

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PatientDetails::from(&patient)),
    ))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<PatientState>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, AppError>,
) -> Result<Json<Page<PatientSummary>>, AppError> {
    let request = PageRequest::from_query(&query, Sort::asc("nome"))?;
    debug!("Listing active patients: {:?}", request);

    let page = state.patients.find_all_active(&request).await?;

    Ok(Json(page.map(|patient| PatientSummary::from(&patient))))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<PatientState>,
    ValidatedJson(request): ValidatedJson<UpdatePatientRequest>,
) -> Result<Json<PatientDetails>, AppError> {
    let mut patient = load_patient(state.patients.as_ref(), request.id).await?;

    patient.apply_update(&request);
    let patient = state.patients.save(patient).await?;

    Ok(Json(PatientDetails::from(&patient)))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<PatientState>,
    Extension(user): Extension<AuthenticatedUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    let mut patient = load_patient(state.patients.as_ref(), id).await?;

    patient.deactivate();
    state.patients.save(patient).await?;

    info!("Patient {} deactivated by {}", id, user.login);
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<PatientState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<PatientDetails>, AppError> {
    let patient = load_patient(state.patients.as_ref(), id).await?;

    Ok(Json(PatientDetails::from(&patient)))
}
