use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared_database::Entity;

/// A scheduled consultation between a doctor and a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub date: NaiveDate,
}

impl From<CreateAppointmentRequest> for Appointment {
    fn from(request: CreateAppointmentRequest) -> Self {
        Self {
            id: None,
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            date: request.date,
        }
    }
}

impl Appointment {
    pub fn apply_update(&mut self, update: &UpdateAppointmentRequest) {
        if let Some(doctor_id) = update.doctor_id {
            self.doctor_id = doctor_id;
        }
        if let Some(patient_id) = update.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
    }
}

impl Entity for Appointment {
    const TABLE: &'static str = "appointments";
    const ACTIVE_COLUMN: Option<&'static str> = None;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" | "idConsulta" => Some("id"),
            "data" => Some("date"),
            "idMedico" => Some("doctor_id"),
            "idPaciente" => Some("patient_id"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    #[serde(rename = "idMedico")]
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub doctor_id: i64,

    #[serde(rename = "idPaciente")]
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub patient_id: i64,

    #[serde(rename = "data")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAppointmentRequest {
    #[serde(rename = "idConsulta", alias = "id")]
    pub id: i64,

    #[serde(rename = "idMedico", default)]
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub doctor_id: Option<i64>,

    #[serde(rename = "idPaciente", default)]
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub patient_id: Option<i64>,

    #[serde(rename = "data", default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDetails {
    #[serde(rename = "idConsulta")]
    pub id: Option<i64>,
    #[serde(rename = "idMedico")]
    pub doctor_id: i64,
    #[serde(rename = "idPaciente")]
    pub patient_id: i64,
    #[serde(rename = "data")]
    pub date: NaiveDate,
}

impl From<&Appointment> for AppointmentDetails {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            date: appointment.date,
        }
    }
}
