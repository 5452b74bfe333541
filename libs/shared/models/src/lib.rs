pub mod address;
pub mod auth;
pub mod error;
pub mod pagination;
pub mod validation;
