pub mod handlers;
pub mod models;
pub mod router;

pub use models::*;
pub use router::{patient_routes, PatientState};
