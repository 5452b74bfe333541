use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::{appointment_routes, Appointment, AppointmentState};
use auth_cell::{auth_routes, AuthState, TokenService, User};
use doctor_cell::{doctor_routes, Doctor, DoctorState};
use patient_cell::{patient_routes, Patient, PatientState};
use shared_config::AppConfig;
use shared_database::{InMemoryRepository, Repository, SupabaseRepository};

/// One store per table, shared by every cell that reads it.
#[derive(Clone)]
pub struct Repositories {
    pub doctors: Arc<dyn Repository<Doctor>>,
    pub patients: Arc<dyn Repository<Patient>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub users: Arc<dyn Repository<User>>,
}

impl Repositories {
    pub fn supabase(config: &AppConfig) -> Self {
        Self {
            doctors: Arc::new(SupabaseRepository::<Doctor>::new(config)),
            patients: Arc::new(SupabaseRepository::<Patient>::new(config)),
            appointments: Arc::new(SupabaseRepository::<Appointment>::new(config)),
            users: Arc::new(SupabaseRepository::<User>::new(config)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            doctors: Arc::new(InMemoryRepository::<Doctor>::new()),
            patients: Arc::new(InMemoryRepository::<Patient>::new()),
            appointments: Arc::new(InMemoryRepository::<Appointment>::new()),
            users: Arc::new(InMemoryRepository::<User>::new()),
        }
    }
}

pub fn create_router(config: Arc<AppConfig>, repositories: Repositories) -> Router {
    let auth = AuthState {
        users: repositories.users.clone(),
        tokens: TokenService::new(config.token_secret.clone()),
    };
    let doctors = DoctorState {
        config: config.clone(),
        doctors: repositories.doctors.clone(),
    };
    let patients = PatientState {
        config: config.clone(),
        patients: repositories.patients.clone(),
    };
    let appointments = AppointmentState {
        config,
        appointments: repositories.appointments,
        doctors: repositories.doctors,
        patients: repositories.patients,
    };

    Router::new()
        .route("/", get(|| async { "Voll.med API is running!" }))
        .merge(auth_routes(auth))
        .merge(doctor_routes(doctors))
        .merge(patient_routes(patients))
        .merge(appointment_routes(appointments))
}
