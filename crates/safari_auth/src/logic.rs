// --- File: crates/safari_auth/src/logic.rs ---
//! Form handling for sign in, registration and password recovery.

use safari_common::models::{LoginRequest, RegisterRequest};
use safari_common::validation::{
    validate_email, validate_name, validate_password, validate_password_confirmation,
    validate_required, FormErrors,
};
use serde::Deserialize;

/// Shown for every failed sign in, whatever the remote reason.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Shown after a password reset request whether or not the address exists.
pub const RESET_REQUESTED: &str =
    "If an account exists for that address, we have sent a link to reset your password.";

/// Returns `next` when it is a local path.
///
/// Absolute URLs, protocol-relative `//host` paths and backslash tricks are
/// rejected so the login form cannot be used as an open redirect.
pub fn sanitize_next(next: Option<&str>) -> Option<String> {
    let next = next?.trim();
    if !next.starts_with('/') || next.starts_with("//") || next.contains('\\') {
        return None;
    }
    if next.chars().any(char::is_control) {
        return None;
    }
    // Never bounce back into the auth pages themselves.
    if next == "/login" || next.starts_with("/login?") || next == "/logout" {
        return None;
    }
    Some(next.to_string())
}

/// Where to send a visitor after signing in.
pub fn landing_path(next: Option<&str>, is_admin: bool) -> String {
    match sanitize_next(next) {
        Some(path) => path,
        None if is_admin => "/admin".to_string(),
        None => "/".to_string(),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub expired: Option<String>,
}

impl LoginQuery {
    pub fn session_expired(&self) -> bool {
        matches!(self.expired.as_deref(), Some("1") | Some("true"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

pub fn validate_login(form: &LoginForm) -> Result<LoginRequest, FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_email(&form.email));
    errors.check(validate_required("password", "Password", &form.password));
    errors.into_result()?;

    Ok(LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

pub fn validate_registration(form: &RegisterForm) -> Result<RegisterRequest, FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_name("name", &form.name));
    errors.check(validate_email(&form.email));
    errors.check(validate_password(&form.password));
    errors.check(validate_password_confirmation(&form.password, &form.confirm_password));
    errors.into_result()?;

    Ok(RegisterRequest {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

pub fn validate_forgot_password(form: &ForgotPasswordForm) -> Result<String, FormErrors> {
    validate_email(&form.email)?;
    Ok(form.email.trim().to_string())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// The new password, once it satisfies the password rules.
pub fn validate_reset(form: &ResetPasswordForm) -> Result<String, FormErrors> {
    let mut errors = FormErrors::new();
    errors.check(validate_password(&form.password));
    errors.check(validate_password_confirmation(&form.password, &form.confirm_password));
    errors.into_result()?;
    Ok(form.password.clone())
}
