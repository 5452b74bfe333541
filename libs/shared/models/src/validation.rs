use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

pub static CEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("valid CEP pattern"));

pub static CRM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,6}$").expect("valid CRM pattern"));

pub static CPF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}\.?\d{3}\.?\d{3}-?\d{2}$").expect("valid CPF pattern"));

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message("must not be blank".into()));
    }
    Ok(())
}
