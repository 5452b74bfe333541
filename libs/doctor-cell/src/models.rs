use serde::{Deserialize, Serialize};
use validator::Validate;

use shared_database::Entity;
use shared_models::address::{Address, AddressPayload, AddressResponse, AddressUpdate};
use shared_models::validation::CRM_PATTERN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Specialty {
    #[serde(rename = "ORTOPEDIA", alias = "ortopedia")]
    Orthopedics,
    #[serde(rename = "CARDIOLOGIA", alias = "cardiologia")]
    Cardiology,
    #[serde(rename = "GINECOLOGIA", alias = "ginecologia")]
    Gynecology,
    #[serde(rename = "DERMATOLOGIA", alias = "dermatologia")]
    Dermatology,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub crm: String,
    pub specialty: Specialty,
    pub address: Address,
    pub active: bool,
}

impl From<CreateDoctorRequest> for Doctor {
    fn from(request: CreateDoctorRequest) -> Self {
        Self {
            id: None,
            name: request.name,
            email: request.email,
            phone: request.phone,
            crm: request.crm,
            specialty: request.specialty,
            address: request.address.into(),
            active: true,
        }
    }
}

impl Doctor {
    /// Merges the supplied fields; CRM, email and specialty are immutable.
    pub fn apply_update(&mut self, update: &UpdateDoctorRequest) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = phone.clone();
        }
        if let Some(address) = &update.address {
            self.address.apply_update(address);
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Entity for Doctor {
    const TABLE: &'static str = "doctors";
    const ACTIVE_COLUMN: Option<&'static str> = Some("active");

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("id"),
            "nome" => Some("name"),
            "email" => Some("email"),
            "crm" => Some("crm"),
            "especialidade" => Some("specialty"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDoctorRequest {
    #[serde(rename = "nome")]
    #[validate(custom(function = "shared_models::validation::not_blank"))]
    pub name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[serde(rename = "telefone")]
    #[validate(custom(function = "shared_models::validation::not_blank"))]
    pub phone: String,

    #[validate(regex(path = *CRM_PATTERN, message = "must have 4 to 6 digits"))]
    pub crm: String,

    #[serde(rename = "especialidade")]
    pub specialty: Specialty,

    #[serde(rename = "endereco")]
    #[validate(nested)]
    pub address: AddressPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDoctorRequest {
    pub id: i64,

    #[serde(rename = "nome", default)]
    #[validate(custom(function = "shared_models::validation::not_blank"))]
    pub name: Option<String>,

    #[serde(rename = "telefone", default)]
    #[validate(custom(function = "shared_models::validation::not_blank"))]
    pub phone: Option<String>,

    #[serde(rename = "endereco", default)]
    #[validate(nested)]
    pub address: Option<AddressUpdate>,
}

/// Listing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub crm: String,
    #[serde(rename = "especialidade")]
    pub specialty: Specialty,
}

impl From<&Doctor> for DoctorSummary {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            email: doctor.email.clone(),
            crm: doctor.crm.clone(),
            specialty: doctor.specialty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDetails {
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub crm: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "especialidade")]
    pub specialty: Specialty,
    #[serde(rename = "endereco")]
    pub address: AddressResponse,
    #[serde(rename = "ativo")]
    pub active: bool,
}

impl From<&Doctor> for DoctorDetails {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            email: doctor.email.clone(),
            crm: doctor.crm.clone(),
            phone: doctor.phone.clone(),
            specialty: doctor.specialty,
            address: AddressResponse::from(&doctor.address),
            active: doctor.active,
        }
    }
}
