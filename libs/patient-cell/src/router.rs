use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_config::AppConfig;
use shared_database::Repository;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::models::Patient;

#[derive(Clone)]
pub struct PatientState {
    pub config: Arc<AppConfig>,
    pub patients: Arc<dyn Repository<Patient>>,
}

pub fn patient_routes(state: PatientState) -> Router {
    Router::new()
        .route(
            "/pacientes",
            post(handlers::create_patient)
                .get(handlers::list_patients)
                .put(handlers::update_patient),
        )
        .route(
            "/pacientes/{id}",
            get(handlers::get_patient).delete(handlers::delete_patient),
        )
        .route_layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
