/// API route handlers
///
/// - `auth`: Sign-up and sign-in
/// - `health`: Liveness check
/// - `tasks`: Task lifecycle with cache and notification coordination
/// - `projects`: Owner-scoped project CRUD

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use crate::error::{ApiError, ValidationErrorDetail};
use validator::Validate;

/// Runs validator-derive checks and maps failures to a 422 response
pub(crate) fn validate_request<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate().map_err(|e| {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    })
}
