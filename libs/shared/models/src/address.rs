use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::CEP_PATTERN;

/// Postal address embedded in doctors and patients. Stored as a JSON column
/// of the owning row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub district: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub number: Option<String>,
    pub complement: Option<String>,
}

impl From<AddressPayload> for Address {
    fn from(payload: AddressPayload) -> Self {
        Self {
            street: payload.street,
            district: payload.district,
            postal_code: payload.postal_code,
            city: payload.city,
            state: payload.state,
            number: payload.number,
            complement: payload.complement,
        }
    }
}

impl Address {
    /// Overwrites only the fields present in `update`.
    pub fn apply_update(&mut self, update: &AddressUpdate) {
        if let Some(street) = &update.street {
            self.street = street.clone();
        }
        if let Some(district) = &update.district {
            self.district = district.clone();
        }
        if let Some(postal_code) = &update.postal_code {
            self.postal_code = postal_code.clone();
        }
        if let Some(city) = &update.city {
            self.city = city.clone();
        }
        if let Some(state) = &update.state {
            self.state = state.clone();
        }
        if let Some(number) = &update.number {
            self.number = Some(number.clone());
        }
        if let Some(complement) = &update.complement {
            self.complement = Some(complement.clone());
        }
    }
}

/// Address as accepted on creation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddressPayload {
    #[serde(rename = "logradouro")]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub street: String,

    #[serde(rename = "bairro")]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub district: String,

    #[serde(rename = "cep")]
    #[validate(regex(path = *CEP_PATTERN, message = "must have 8 digits"))]
    pub postal_code: String,

    #[serde(rename = "cidade")]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub city: String,

    #[serde(rename = "uf")]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub state: String,

    #[serde(rename = "numero", default)]
    pub number: Option<String>,

    #[serde(rename = "complemento", default)]
    pub complement: Option<String>,
}

/// Address as accepted on update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AddressUpdate {
    #[serde(rename = "logradouro", default)]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub street: Option<String>,

    #[serde(rename = "bairro", default)]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub district: Option<String>,

    #[serde(rename = "cep", default)]
    #[validate(regex(path = *CEP_PATTERN, message = "must have 8 digits"))]
    pub postal_code: Option<String>,

    #[serde(rename = "cidade", default)]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub city: Option<String>,

    #[serde(rename = "uf", default)]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub state: Option<String>,

    #[serde(rename = "numero", default)]
    pub number: Option<String>,

    #[serde(rename = "complemento", default)]
    pub complement: Option<String>,
}

/// Address as returned in detail payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "bairro")]
    pub district: String,
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "uf")]
    pub state: String,
    #[serde(rename = "numero")]
    pub number: Option<String>,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
}

impl From<&Address> for AddressResponse {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            district: address.district.clone(),
            postal_code: address.postal_code.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            number: address.number.clone(),
            complement: address.complement.clone(),
        }
    }
}
