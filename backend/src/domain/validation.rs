//! Field-level validation shared by the domain drafts and patches.
//!
//! Every rule reports the offending field with a stable snake_case code so
//! clients can highlight the right input.

use serde_json::json;

use super::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    code: &'static str,
    message: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// Name of the rejected field, in client (camelCase) spelling.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Machine-readable reason.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable explanation.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FieldError {}

impl From<FieldError> for Error {
    fn from(value: FieldError) -> Self {
        Error::invalid_request(value.message).with_details(json!({
            "field": value.field,
            "code": value.code,
        }))
    }
}

/// Maximum accepted URL length.
pub const URL_MAX: usize = 2048;

/// Trim `value` and require between 1 and `max` characters.
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(
            field,
            "required",
            format!("{field} must not be empty"),
        ));
    }
    check_max(field, trimmed, max)?;
    Ok(trimmed.to_owned())
}

/// Trim an optional value; blank input becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            check_max(field, trimmed, max)?;
            Ok(Some(trimmed.to_owned()))
        }
    }
}

/// Validate an optional image or avatar reference.
///
/// Accepts absolute `http(s)` URLs and paths produced by the upload endpoint.
pub fn optional_url(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, FieldError> {
    let Some(url) = optional_text(field, value, URL_MAX)? else {
        return Ok(None);
    };
    let accepted = ["http://", "https://", "/uploads/"]
        .iter()
        .any(|prefix| url.starts_with(prefix) && url.len() > prefix.len());
    if accepted && !url.chars().any(char::is_whitespace) {
        Ok(Some(url))
    } else {
        Err(FieldError::new(
            field,
            "invalid_url",
            format!("{field} must be an http(s) URL or an uploaded file path"),
        ))
    }
}

fn check_max(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::new(
            field,
            "too_long",
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(())
}
