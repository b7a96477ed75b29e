// File: crates/safari_auth/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Form,
};
use leptos::prelude::*;
use safari_common::http::{error_response, html_response, redirect_response};
use safari_common::logging::log_error;
use safari_common::services::ServiceFactory;
use safari_common::session::{Flash, RequestContext, Session, SessionManager};
use safari_common::ui::render_document;
use safari_common::SafariError;
use safari_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

use crate::logic::{
    landing_path, sanitize_next, validate_forgot_password, validate_login, validate_registration,
    validate_reset, ForgotPasswordForm, LoginForm, LoginQuery, RegisterForm, ResetPasswordForm,
    INVALID_CREDENTIALS, RESET_REQUESTED,
};
use crate::views::{ForgotPasswordPage, LoginPage, RegisterPage, ResetPasswordPage, VerifyEmailPage};

// Define shared state needed by the auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AppConfig>,
    pub services: Arc<dyn ServiceFactory>,
    pub sessions: SessionManager,
}

impl AuthState {
    fn set_flash(&self, ctx: &mut RequestContext, flash: Flash) {
        if let Err(err) = self.sessions.flash(&mut ctx.changes, flash) {
            log_error(&err, "Failed to set flash cookie");
        }
    }
}

fn render_login(
    state: &AuthState,
    ctx: &mut RequestContext,
    status: StatusCode,
    email: String,
    next: Option<String>,
    notice: Option<String>,
    errors: Vec<String>,
) -> Response {
    let page = ctx.page(&state.config.site);
    let body = render_document("Sign in", &page, move || {
        view! { <LoginPage email=email next=next notice=notice errors=errors/> }
    });
    html_response(status, body, ctx.take_changes())
}

pub async fn login_form_handler(
    State(state): State<Arc<AuthState>>,
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    if let Some(session) = ctx.session.as_ref() {
        let target = landing_path(query.next.as_deref(), session.is_admin());
        return redirect_response(&target, ctx.take_changes());
    }

    let notice = query
        .session_expired()
        .then(|| "Your session has expired. Please sign in again.".to_string());
    let next = sanitize_next(query.next.as_deref());
    render_login(&state, &mut ctx, StatusCode::OK, String::new(), next, notice, Vec::new())
}

pub async fn login_submit_handler(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let next = sanitize_next(form.next.as_deref());

    let request = match validate_login(&form) {
        Ok(request) => request,
        Err(errors) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return render_login(&state, &mut ctx, status, form.email, next, None, errors.messages());
        }
    };

    let auth = match state.services.auth_service().login(request).await {
        Ok(auth) => auth,
        Err(SafariError::AuthError(reason)) => {
            info!("sign in rejected: {}", reason);
            let errors = vec![INVALID_CREDENTIALS.to_string()];
            return render_login(&state, &mut ctx, StatusCode::UNAUTHORIZED, form.email, next, None, errors);
        }
        // Unverified or deactivated accounts: the API's reason is worth showing.
        Err(SafariError::ForbiddenError(reason)) | Err(SafariError::ValidationError(reason)) => {
            return render_login(&state, &mut ctx, StatusCode::FORBIDDEN, form.email, next, None, vec![reason]);
        }
        Err(err) => {
            log_error(&err, "Login request failed");
            let errors = vec![err.user_message()];
            return render_login(&state, &mut ctx, StatusCode::BAD_GATEWAY, form.email, next, None, errors);
        }
    };

    let session = Session::from(auth);
    if let Err(err) = state.sessions.start_session(&mut ctx.changes, &session) {
        return error_response(&mut ctx, &state.config.site, err);
    }
    info!("user {} signed in", session.user.id);
    state.set_flash(&mut ctx, Flash::success(format!("Welcome back, {}!", session.user.name)));

    let target = landing_path(next.as_deref(), session.is_admin());
    redirect_response(&target, ctx.take_changes())
}

pub async fn logout_handler(State(state): State<Arc<AuthState>>, headers: HeaderMap) -> Response {
    let mut ctx = state.sessions.context(&headers);
    if let Some(user) = ctx.user() {
        info!("user {} signed out", user.id);
    }
    state.sessions.end_session(&mut ctx.changes);
    state.set_flash(&mut ctx, Flash::info("You have been signed out."));
    redirect_response("/", ctx.take_changes())
}

fn render_register(
    state: &AuthState,
    ctx: &mut RequestContext,
    status: StatusCode,
    form: RegisterForm,
    errors: Vec<String>,
) -> Response {
    let page = ctx.page(&state.config.site);
    let body = render_document("Create an account", &page, move || {
        view! { <RegisterPage name=form.name email=form.email errors=errors/> }
    });
    html_response(status, body, ctx.take_changes())
}

pub async fn register_form_handler(State(state): State<Arc<AuthState>>, headers: HeaderMap) -> Response {
    let mut ctx = state.sessions.context(&headers);
    if ctx.session.is_some() {
        return redirect_response("/", ctx.take_changes());
    }
    render_register(&state, &mut ctx, StatusCode::OK, RegisterForm::default(), Vec::new())
}

pub async fn register_submit_handler(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);

    let request = match validate_registration(&form) {
        Ok(request) => request,
        Err(errors) => {
            return render_register(&state, &mut ctx, StatusCode::UNPROCESSABLE_ENTITY, form, errors.messages());
        }
    };

    match state.services.auth_service().register(request).await {
        Ok(()) => {
            info!("new account registered");
            state.set_flash(
                &mut ctx,
                Flash::success("Account created. Please check your inbox to verify your email address."),
            );
            redirect_response("/login", ctx.take_changes())
        }
        Err(SafariError::ConflictError(message)) | Err(SafariError::ValidationError(message)) => {
            render_register(&state, &mut ctx, StatusCode::UNPROCESSABLE_ENTITY, form, vec![message])
        }
        Err(err) => {
            log_error(&err, "Registration request failed");
            let errors = vec![err.user_message()];
            render_register(&state, &mut ctx, StatusCode::BAD_GATEWAY, form, errors)
        }
    }
}

pub async fn verify_email_handler(
    State(state): State<Arc<AuthState>>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let (status, verified, message) = match state.services.auth_service().verify_email(&token).await {
        Ok(()) => (
            StatusCode::OK,
            true,
            "Thank you, your email address is confirmed. You can now sign in.".to_string(),
        ),
        Err(SafariError::ValidationError(_))
        | Err(SafariError::NotFoundError(_))
        | Err(SafariError::AuthError(_))
        | Err(SafariError::ConflictError(_)) => (
            StatusCode::BAD_REQUEST,
            false,
            "This verification link is invalid or has already been used.".to_string(),
        ),
        Err(err) => {
            log_error(&err, "Email verification request failed");
            (StatusCode::BAD_GATEWAY, false, err.user_message())
        }
    };

    let page = ctx.page(&state.config.site);
    let body = render_document("Verify email", &page, move || {
        view! { <VerifyEmailPage verified=verified message=message/> }
    });
    html_response(status, body, ctx.take_changes())
}

fn render_forgot(
    state: &AuthState,
    ctx: &mut RequestContext,
    status: StatusCode,
    email: String,
    errors: Vec<String>,
) -> Response {
    let page = ctx.page(&state.config.site);
    let body = render_document("Forgot password", &page, move || {
        view! { <ForgotPasswordPage email=email errors=errors/> }
    });
    html_response(status, body, ctx.take_changes())
}

pub async fn forgot_password_form_handler(State(state): State<Arc<AuthState>>, headers: HeaderMap) -> Response {
    let mut ctx = state.sessions.context(&headers);
    render_forgot(&state, &mut ctx, StatusCode::OK, String::new(), Vec::new())
}

pub async fn forgot_password_submit_handler(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let email = match validate_forgot_password(&form) {
        Ok(email) => email,
        Err(errors) => {
            return render_forgot(&state, &mut ctx, StatusCode::UNPROCESSABLE_ENTITY, form.email, errors.messages());
        }
    };

    // The outcome is never revealed, so unknown addresses cannot be probed.
    if let Err(err) = state.services.auth_service().forgot_password(&email).await {
        warn!("password reset request failed: {}", err);
    }
    state.set_flash(&mut ctx, Flash::info(RESET_REQUESTED));
    redirect_response("/login", ctx.take_changes())
}

fn render_reset(
    state: &AuthState,
    ctx: &mut RequestContext,
    status: StatusCode,
    token: String,
    errors: Vec<String>,
) -> Response {
    let page = ctx.page(&state.config.site);
    let body = render_document("Reset password", &page, move || {
        view! { <ResetPasswordPage token=token errors=errors/> }
    });
    html_response(status, body, ctx.take_changes())
}

pub async fn reset_password_form_handler(
    State(state): State<Arc<AuthState>>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    render_reset(&state, &mut ctx, StatusCode::OK, token, Vec::new())
}

pub async fn reset_password_submit_handler(
    State(state): State<Arc<AuthState>>,
    Path(token): Path<String>,
    headers: HeaderMap,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let mut ctx = state.sessions.context(&headers);
    let password = match validate_reset(&form) {
        Ok(password) => password,
        Err(errors) => {
            return render_reset(&state, &mut ctx, StatusCode::UNPROCESSABLE_ENTITY, token, errors.messages());
        }
    };

    match state.services.auth_service().reset_password(&token, &password).await {
        Ok(()) => {
            info!("password reset completed");
            // Any existing session belongs to the old password.
            state.sessions.end_session(&mut ctx.changes);
            state.set_flash(&mut ctx, Flash::success("Your password has been updated. Please sign in."));
            redirect_response("/login", ctx.take_changes())
        }
        Err(SafariError::ValidationError(message)) => {
            render_reset(&state, &mut ctx, StatusCode::UNPROCESSABLE_ENTITY, token, vec![message])
        }
        Err(SafariError::NotFoundError(_)) | Err(SafariError::AuthError(_)) => {
            let errors = vec!["This reset link is invalid or has expired.".to_string()];
            render_reset(&state, &mut ctx, StatusCode::BAD_REQUEST, token, errors)
        }
        Err(err) => {
            log_error(&err, "Password reset request failed");
            let errors = vec![err.user_message()];
            render_reset(&state, &mut ctx, StatusCode::BAD_GATEWAY, token, errors)
        }
    }
}
