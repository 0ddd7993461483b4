//! Text normalisation for user-supplied fields.

use crate::error::{DomainError, DomainResult};

/// Trim a required field; blank input is a validation error.
pub fn required(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field, defaulting to the empty string.
pub fn optional(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Read  ").unwrap(), "Read");
        assert!(matches!(
            required("name", " \t "),
            Err(DomainError::Validation(msg)) if msg == "name cannot be empty"
        ));
    }

    #[test]
    fn optional_defaults_to_empty() {
        assert_eq!(optional(None), "");
        assert_eq!(optional(Some("  x ")), "x");
    }
}
