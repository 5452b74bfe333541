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
use crate::models::Doctor;

#[derive(Clone)]
pub struct DoctorState {
    pub config: Arc<AppConfig>,
    pub doctors: Arc<dyn Repository<Doctor>>,
}

pub fn doctor_routes(state: DoctorState) -> Router {
    Router::new()
        .route(
            "/medicos",
            post(handlers::create_doctor)
                .get(handlers::list_doctors)
                .put(handlers::update_doctor),
        )
        .route(
            "/medicos/{id}",
            get(handlers::get_doctor).delete(handlers::delete_doctor),
        )
        .route_layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
