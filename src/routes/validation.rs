use crate::error::{AppError, Result};

/// Interpret an HTML checkbox style form value
///
/// Browsers send `on` for a checked box and omit unchecked ones entirely.
pub fn parse_checkbox(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

/// Unwrap a required form field, rejecting missing or blank values
pub fn required_field(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::InvalidInput(format!("Field '{}' is required", name))),
    }
}

/// Blank optional text becomes `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
