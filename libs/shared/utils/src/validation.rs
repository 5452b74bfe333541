//! JSON body extractor that runs `validator` rules before the handler sees
//! the payload.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use shared_models::error::AppError;

#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        payload
            .validate()
            .map_err(|errors| AppError::ValidationError(describe(&errors)))?;

        Ok(ValidatedJson(payload))
    }
}

/// Flattens nested errors into `field: message` pairs keyed by Rust field
/// path, e.g. `address.postal_code: must have 8 digits; name: must not be blank`.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    messages.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Room {
        #[validate(length(min = 1, message = "must not be blank"))]
        name: String,
        #[validate(nested)]
        floor: Floor,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Floor {
        #[validate(range(min = 0, message = "must not be negative"))]
        level: i32,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_payload() {
        let request = json_request(r#"{"name":"Sala 3","floor":{"level":2}}"#);

        let ValidatedJson(room) = ValidatedJson::<Room>::from_request(request, &()).await.unwrap();

        assert_eq!(room.name, "Sala 3");
        assert_eq!(room.floor.level, 2);
    }

    #[tokio::test]
    async fn test_reports_nested_field_paths() {
        let request = json_request(r#"{"name":"","floor":{"level":-1}}"#);

        let result = ValidatedJson::<Room>::from_request(request, &()).await;

        assert_matches!(
            result,
            Err(AppError::ValidationError(msg))
                if msg == "floor.level: must not be negative; name: must not be blank"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = json_request(r#"{"name": 12"#);

        let result = ValidatedJson::<Room>::from_request(request, &()).await;

        assert_matches!(result, Err(AppError::BadRequest(_)));
    }
}
