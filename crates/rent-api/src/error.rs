//! Error handling for the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rent_lib::PredictError;
use serde_json::json;
use std::collections::BTreeMap;
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Malformed body that could not be decoded
    BadRequest(String),

    /// Well-formed body with invalid fields
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    NotFound(String),

    InternalError(String),
}

impl AppError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.into()]);
        AppError::Validation {
            message: format!("Invalid field: {}", field),
            fields,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => json!({
                "error": msg,
                "status": status.as_u16()
            }),
            AppError::Validation { message, fields } => json!({
                "error": message,
                "status": status.as_u16(),
                "fields": fields
            }),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                json!({
                    "error": "Internal server error",
                    "status": status.as_u16()
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: BTreeMap<String, Vec<String>> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("failed `{}` check", e.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        AppError::Validation {
            message: format!("Invalid fields: {}", names.join(", ")),
            fields,
        }
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        if err.is_client_error() {
            AppError::NotFound(err.to_string())
        } else {
            AppError::InternalError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rent_lib::InferenceError;

    #[test]
    fn test_predict_error_mapping() {
        let err: AppError = PredictError::RegionNotFound("atlantis".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: AppError = PredictError::Inference {
            region: "suginami".into(),
            variant: "base".into(),
            source: InferenceError::EmptyOutput,
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_field_error_is_bad_request() {
        let err = AppError::field("region", "unknown region");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        match err {
            AppError::Validation { fields, .. } => {
                assert_eq!(fields["region"], vec!["unknown region".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
