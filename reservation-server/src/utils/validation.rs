//! Input validation helpers
//!
//! Payload structs derive `validator::Validate`; the helpers here turn the
//! resulting errors into a single [`AppError`] and cover the few checks a
//! derive cannot express.

use crate::utils::AppError;
use validator::{Validate, ValidationErrors};

/// Entity names (user display name)
pub const MAX_NAME_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Run the derived validator and convert failures into a validation error.
///
/// The first message becomes the error message; every field is listed in
/// `details` so clients can highlight them.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(into_app_error)
}

fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation failed".to_string());

    let mut err = AppError::validation(message);
    for (field, errs) in fields {
        let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
        err = err.with_detail(field.to_string(), codes);
    }
    err
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}
