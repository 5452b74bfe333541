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

use crate::models::{CreateDoctorRequest, Doctor, DoctorDetails, DoctorSummary, UpdateDoctorRequest};
use crate::router::DoctorState;

async fn load_doctor(doctors: &dyn Repository<Doctor>, id: i64) -> Result<Doctor, AppError> {
    doctors
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Doctor {} not found", id)))
}

fn location(host: Option<TypedHeader<Host>>, id: i64) -> String {
    match host {
        Some(TypedHeader(host)) => format!("http://{}/medicos/{}", host, id),
        None => format!("/medicos/{}", id),
    }
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<DoctorState>,
    Extension(user): Extension<AuthenticatedUser>,
    host: Option<TypedHeader<Host>>,
    ValidatedJson(request): ValidatedJson<CreateDoctorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = state.doctors.save(Doctor::from(request)).await?;
    let id = doctor
        .id
        .ok_or_else(|| AppError::Internal("Saved doctor has no id".to_string()))?;

    info!("Doctor {} registered with CRM {} by {}", id, doctor.crm, user.login);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(host, id))],
        Json(DoctorDetails::from(&doctor)),
    ))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<DoctorState>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, AppError>,
) -> Result<Json<Page<DoctorSummary>>, AppError> {
    let request = PageRequest::from_query(&query, Sort::asc("nome"))?;
    debug!("Listing active doctors: {:?}", request);

    let page = state.doctors.find_all_active(&request).await?;

    Ok(Json(page.map(|doctor| DoctorSummary::from(&doctor))))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<DoctorState>,
    ValidatedJson(request): ValidatedJson<UpdateDoctorRequest>,
) -> Result<Json<DoctorDetails>, AppError> {
    let mut doctor = load_doctor(state.doctors.as_ref(), request.id).await?;

    doctor.apply_update(&request);
    let doctor = state.doctors.save(doctor).await?;

    debug!("Doctor {} updated", request.id);
    Ok(Json(DoctorDetails::from(&doctor)))
}

/// Soft delete: the row stays, only `active` flips.
#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<DoctorState>,
    Extension(user): Extension<AuthenticatedUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    let mut doctor = load_doctor(state.doctors.as_ref(), id).await?;

    doctor.deactivate();
    state.doctors.save(doctor).await?;

    info!("Doctor {} deactivated by {}", id, user.login);
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<DoctorState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<DoctorDetails>, AppError> {
    let doctor = load_doctor(state.doctors.as_ref(), id).await?;

    Ok(Json(DoctorDetails::from(&doctor)))
}
