// --- File: crates/safari_common/src/validation.rs ---
//! Validation utilities for forms and user input

use crate::error::SafariError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

/// All problems found in one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error of a failed check.
    pub fn check(&mut self, result: Result<(), FieldError>) {
        if let Err(error) = result {
            self.errors.push(error);
        }
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.message.clone()).collect()
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for FormErrors {
    fn from(error: FieldError) -> Self {
        FormErrors {
            errors: vec![error],
        }
    }
}

impl From<FormErrors> for SafariError {
    fn from(errors: FormErrors) -> Self {
        SafariError::ValidationError(errors.messages().join(" "))
    }
}

pub fn validate_required(field: &'static str, label: &str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, format!("{} is required", label)));
    }
    Ok(())
}

pub fn validate_max_len(field: &'static str, label: &str, value: &str, max: usize) -> Result<(), FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::new(
            field,
            format!("{} cannot exceed {} characters", label, max),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), FieldError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FieldError::new("email", "Email is required"));
    }

    let invalid = || FieldError::new("email", "Please enter a valid email address");
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.contains("..")
    {
        return Err(invalid());
    }

    Ok(())
}

/// At least 8 characters with a letter and a digit.
pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.is_empty() {
        return Err(FieldError::new("password", "Password is required"));
    }

    if password.chars().count() < 8 {
        return Err(FieldError::new("password", "Password must be at least 8 characters"));
    }

    if !password.chars().any(char::is_alphabetic) || !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(FieldError::new(
            "password",
            "Password must contain at least one letter and one number",
        ));
    }

    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), FieldError> {
    if password != confirmation {
        return Err(FieldError::new("confirm_password", "Passwords do not match"));
    }
    Ok(())
}

/// Digits, spaces and `+ - ( )`, 7 to 20 characters, at least 7 digits.
pub fn validate_phone(phone: &str) -> Result<(), FieldError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(FieldError::new("phone", "Phone number is required"));
    }

    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    let length = phone.chars().count();
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !allowed || !(7..=20).contains(&length) || digits < 7 {
        return Err(FieldError::new("phone", "Please enter a valid phone number"));
    }

    Ok(())
}

pub fn validate_name(field: &'static str, name: &str) -> Result<(), FieldError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FieldError::new(field, "Name is required"));
    }

    if name.chars().count() < 2 {
        return Err(FieldError::new(field, "Name must be at least 2 characters"));
    }

    validate_max_len(field, "Name", name, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("guest@example.com").is_ok());
        assert!(validate_email("  guest@example.co.ke ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("guest.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("guest@localhost").is_err());
        assert!(validate_email("guest@ex..com").is_err());
        assert!(validate_email("gu est@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("simba2026").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password_confirmation("a", "b").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+254 (0) 700-123-456").is_ok());
        assert!(validate_phone("0700123456").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me maybe").is_err());
        assert!(validate_phone("+1 234 567 890 123 456 789").is_err());
        assert!(validate_phone("(+) - - - ()").is_err());
    }

    #[test]
    fn test_form_errors_collects() {
        let mut errors = FormErrors::new();
        errors.check(validate_email("nope"));
        errors.check(validate_name("name", "Zawadi"));
        errors.check(validate_required("subject", "Subject", " "));
        assert!(errors.has("email"));
        assert!(!errors.has("name"));
        assert_eq!(errors.messages().len(), 2);
        assert!(errors.into_result().is_err());
    }
}
