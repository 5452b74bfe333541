use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::{extract::WithRejection, TypedHeader};
use headers::Host;
use tracing::{debug, info, warn};

use shared_database::Repository;
use shared_models::error::AppError;
use shared_models::pagination::{Page, PageQuery, PageRequest, Sort};
use shared_utils::validation::ValidatedJson;

use crate::models::{Appointment, AppointmentDetails, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::router::AppointmentState;

/// Both parties must exist (404) and still be active (400).
async fn check_references(state: &AppointmentState, doctor_id: i64, patient_id: i64) -> Result<(), AppError> {
    let doctor = state
        .doctors
        .find_by_id(doctor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Doctor {} not found", doctor_id)))?;

    let patient = state
        .patients
        .find_by_id(patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", patient_id)))?;

    if !doctor.active {
        warn!("Rejected appointment for inactive doctor {}", doctor_id);
        return Err(AppError::BadRequest(format!("Doctor {} is inactive", doctor_id)));
    }
    if !patient.active {
        warn!("Rejected appointment for inactive patient {}", patient_id);
        return Err(AppError::BadRequest(format!("Patient {} is inactive", patient_id)));
    }

    Ok(())
}

async fn load_appointment(state: &AppointmentState, id: i64) -> Result<Appointment, AppError> {
    state
        .appointments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
}

#[axum::debug_handler]
pub async fn schedule_appointment(
    State(state): State<AppointmentState>,
    host: Option<TypedHeader<Host>>,
    ValidatedJson(request): ValidatedJson<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_references(&state, request.doctor_id, request.patient_id).await?;

    let appointment = state.appointments.save(Appointment::from(request)).await?;
    let id = appointment
        .id
        .ok_or_else(|| AppError::Internal("Saved appointment has no id".to_string()))?;

    info!(
        "Appointment {} scheduled: doctor {} patient {} on {}",
        id, appointment.doctor_id, appointment.patient_id, appointment.date
    );

    let location = match host {
        Some(TypedHeader(host)) => format!("http://{}/consultas/{}", host, id),
        None => format!("/consultas/{}", id),
    };

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(AppointmentDetails::from(&appointment)),
    ))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentState>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, AppError>,
) -> Result<Json<Page<AppointmentDetails>>, AppError> {
    let request = PageRequest::from_query(&query, Sort::asc("data"))?;
    let page = state.appointments.find_all(&request).await?;

    Ok(Json(page.map(|appointment| AppointmentDetails::from(&appointment))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppointmentState>,
    ValidatedJson(request): ValidatedJson<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentDetails>, AppError> {
    let mut appointment = load_appointment(&state, request.id).await?;

    appointment.apply_update(&request);
    if request.doctor_id.is_some() || request.patient_id.is_some() {
        check_references(&state, appointment.doctor_id, appointment.patient_id).await?;
    }

    let appointment = state.appointments.save(appointment).await?;

    debug!("Appointment {} updated", request.id);
    Ok(Json(AppointmentDetails::from(&appointment)))
}

/// Appointments have no active flag, so cancelling removes the row.
#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppointmentState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    if !state.appointments.delete_by_id(id).await? {
        return Err(AppError::NotFound(format!("Appointment {} not found", id)));
    }

    info!("Appointment {} cancelled", id);
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<AppointmentDetails>, AppError> {
    let appointment = load_appointment(&state, id).await?;

    Ok(Json(AppointmentDetails::from(&appointment)))
}
