//! Form validation rules
//!
//! Each submission form is validated in full before anything is persisted, so
//! a rejected submission reports every missing field at once.
//!
//! # Validation Rules
//!
//! ## Quick upload
//! - Claimant name is required
//! - At least one file must be attached
//!
//! ## Guided claim
//! - Name, policy number and incident date are required
//! - Incident date must be `YYYY-MM-DD`
//! - Email, when provided, must look like an email address
//!
//! ## Commercial FNOL
//! - Contact person and incident date are required
//! - At least one vehicle must be selected, and every selected VIN must be on
//!   the uploaded fleet schedule

use chrono::NaiveDate;

use crate::error::ClaimError;

/// Result of form validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Records `message` when `value` is blank
    pub fn require(&mut self, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add_error(message);
        }
    }

    /// Records an error unless `value` is a `YYYY-MM-DD` date; blank values
    /// are left to [`ValidationResult::require`]
    pub fn require_date_format(&mut self, value: &str, field: &str) {
        let value = value.trim();
        if !value.is_empty() && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
            self.add_error(format!("{} must be a date in YYYY-MM-DD format", field));
        }
    }

    /// Records an error when a non-blank email is obviously malformed
    pub fn optional_email(&mut self, value: Option<&str>) {
        if let Some(email) = value.map(str::trim).filter(|e| !e.is_empty()) {
            if !email.contains('@') || !email.contains('.') {
                self.add_error(format!("Invalid email format: {}", email));
            }
        }
    }

    /// Converts into `Err(ClaimError::Validation)` when any error was recorded
    pub fn into_result(self) -> Result<(), ClaimError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ClaimError::Validation(self.errors))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_blank() {
        let mut result = ValidationResult::ok();
        result.require("   ", "Name is required");
        result.require("Jane", "unused");
        assert_eq!(result.errors, vec!["Name is required".to_string()]);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_date_format() {
        let mut result = ValidationResult::ok();
        result.require_date_format("2024-01-15", "Incident date");
        result.require_date_format("", "Incident date");
        assert!(result.is_valid);

        result.require_date_format("15/01/2024", "Incident date");
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_optional_email() {
        let mut result = ValidationResult::ok();
        result.optional_email(None);
        result.optional_email(Some(""));
        result.optional_email(Some("john@example.com"));
        assert!(result.is_valid);

        result.optional_email(Some("john-at-example"));
        assert!(matches!(result.into_result(), Err(ClaimError::Validation(e)) if e.len() == 1));
    }
}
