//! Common validation helpers for use cases.

/// Validation error type.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field_name} cannot be empty")]
    Empty { field_name: &'static str },

    #[error("{field_name} is invalid: {reason}")]
    Invalid {
        field_name: &'static str,
        reason: String,
    },
}

/// Validate a string is non-empty after trimming.
pub fn require_non_empty(value: &str, field_name: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field_name });
    }
    Ok(())
}

/// Validate an optional string is non-empty if present.
pub fn require_non_empty_if_present(
    value: Option<&str>,
    field_name: &'static str,
) -> Result<(), ValidationError> {
    if let Some(v) = value {
        require_non_empty(v, field_name)?;
    }
    Ok(())
}

/// The explicit code when one was given, else a slug of `name`.
///
/// Fails when neither yields anything usable, e.g. a name made only of
/// punctuation.
pub fn base_code(
    explicit: Option<&str>,
    name: &str,
    field_name: &'static str,
) -> Result<String, ValidationError> {
    let code = match explicit.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => code.to_string(),
        None => fieldreg_domain::slugify(name),
    };
    if code.is_empty() {
        return Err(ValidationError::Invalid {
            field_name,
            reason: format!("cannot derive a code from {name:?}"),
        });
    }
    Ok(code)
}
