// --- File: crates/safari_admin/src/auth.rs ---

use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{Method, Request, Uri},
    middleware::Next,
    response::Response,
};
use safari_common::error::forbidden;
use safari_common::http::{error_response, login_redirect, request_target};
use safari_common::session::SessionManager;
use safari_config::AppConfig;
use std::sync::Arc;
use tracing::{debug, warn};

// The state that the admin guard has access to.
#[derive(Clone)]
pub struct AdminGuardState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionManager,
}

/// Lets only signed-in admins through to the admin pages.
///
/// Anonymous visitors are sent to the login page with `next` pointing back
/// here; signed-in customers get a 403 page. The admin's session is stored
/// in the request extensions for the handlers.
pub async fn admin_guard_middleware(
    State(guard): State<Arc<AdminGuardState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Response {
    let mut ctx = guard.sessions.context(req.headers());

    let Some(session) = ctx.session.clone() else {
        debug!("anonymous request for {} sent to login", req.uri().path());
        let next = return_path(req.method(), req.uri());
        return login_redirect(&next, ctx.take_changes());
    };

    if !session.is_admin() {
        warn!("user {} tried to open {}", session.user.id, req.uri().path());
        let err = forbidden("You need an administrator account to view this page.");
        return error_response(&mut ctx, &guard.config.site, err);
    }

    req.extensions_mut().insert(session);
    next.run(req).await
}

/// Where to come back to after signing in.
///
/// A GET returns to the page itself. Form posts return to the list page
/// they were sent from, since the browser follows `next` with a GET.
pub fn return_path(method: &Method, uri: &Uri) -> String {
    if method == Method::GET || method == Method::HEAD {
        return request_target(uri);
    }
    let section = uri.path().split('/').nth(2).unwrap_or_default();
    match section {
        "users" | "bookings" | "tours" => format!("/admin/{}", section),
        _ => "/admin".to_string(),
    }
}
