use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use doctor_cell::Doctor;
use patient_cell::Patient;
use shared_config::AppConfig;
use shared_database::Repository;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::models::Appointment;

/// Appointments read doctors and patients to check the references they hold.
#[derive(Clone)]
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub doctors: Arc<dyn Repository<Doctor>>,
    pub patients: Arc<dyn Repository<Patient>>,
}

pub fn appointment_routes(state: AppointmentState) -> Router {
    Router::new()
        .route(
            "/consultas",
            post(handlers::schedule_appointment)
                .get(handlers::list_appointments)
                .put(handlers::update_appointment),
        )
        .route(
            "/consultas/{id}",
            get(handlers::get_appointment).delete(handlers::delete_appointment),
        )
        .route_layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
