use serde::{Deserialize, Serialize};
use validator::Validate;

use shared_database::Entity;
use shared_models::address::{Address, AddressPayload, AddressResponse, AddressUpdate};
use shared_models::validation::CPF_PATTERN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub address: Address,
    pub active: bool,
}

impl From<CreatePatientRequest> for Patient {
    fn from(request: CreatePatientRequest) -> Self {
        Self {
            id: None,
            name: request.name,
            email: request.email,
            phone: request.phone,
            cpf: request.cpf,
            address: request.address.into(),
            active: true,
        }
    }
}

impl Patient {
    pub fn apply_update(&mut self, update: &UpdatePatientRequest) {
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

impl Entity for Patient {
    const TABLE: &'static str = "patients";
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
            "cpf" => Some("cpf"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePatientRequest {
    #[serde(rename = "nome")]
    #[validate(custom(function = "shared_models::validation::not_blank"))]
    pub name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[serde(rename = "telefone")]
    #[validate(custom(function = "shared_models::validation::not_blank"))]
    pub phone: String,

    #[validate(regex(path = *CPF_PATTERN, message = "must match 000.000.000-00"))]
    pub cpf: String,

    #[serde(rename = "endereco")]
    #[validate(nested)]
    pub address: AddressPayload,
}

/// Email and CPF are fixed once registered.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePatientRequest {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub cpf: String,
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            cpf: patient.cpf.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDetails {
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub cpf: String,
    #[serde(rename = "endereco")]
    pub address: AddressResponse,
    #[serde(rename = "ativo")]
    pub active: bool,
}

impl From<&Patient> for PatientDetails {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            cpf: patient.cpf.clone(),
            address: AddressResponse::from(&patient.address),
            active: patient.active,
        }
    }
}
