// --- File: crates/safari_common/src/http.rs ---
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::{error, warn};

use crate::error::{HttpStatusCode, SafariError};
use safari_config::SiteConfig;

use crate::session::{CookieChanges, RequestContext};
use crate::ui;

// Include the client module
pub mod client;

/// Extension trait for SafariError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for SafariError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!("request failed: {}", self);
        } else {
            warn!("request rejected: {}", self);
        }

        let body = ui::render_error_document(None, status_code.as_u16(), &self.user_message());
        (status_code, Html(body)).into_response()
    }
}

/// Implement IntoResponse for SafariError to make it easier to use in Axum handlers.
impl IntoResponse for SafariError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Renders `err` for a visitor with a known request context.
///
/// An authentication failure means the stored API token is no longer
/// accepted: the session is dropped and the visitor is sent to sign in.
pub fn error_response(ctx: &mut RequestContext, site: &SiteConfig, err: SafariError) -> Response {
    if matches!(err, SafariError::AuthError(_)) {
        warn!("API rejected session token: {}", err);
        ctx.clear_session();
        return redirect_response("/login?expired=1", ctx.take_changes());
    }

    let status_code =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status_code.is_server_error() {
        error!("request failed: {}", err);
    } else {
        warn!("request rejected: {}", err);
    }

    let page = ctx.page(site);
    let body = ui::render_error_document(Some(&page), status_code.as_u16(), &err.user_message());
    html_response(status_code, body, ctx.take_changes())
}

/// Appends every pending cookie change as a `Set-Cookie` header.
pub fn with_cookies(mut response: Response, changes: CookieChanges) -> Response {
    for cookie in changes.into_cookies() {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => error!("dropping cookie {} with invalid header value: {}", cookie.name(), err),
        }
    }
    response
}

/// A rendered HTML page plus cookie changes.
pub fn html_response(status: StatusCode, body: String, changes: CookieChanges) -> Response {
    with_cookies((status, Html(body)).into_response(), changes)
}

/// `303 See Other` so that a POSTed form is followed by a GET.
pub fn redirect_response(location: &str, changes: CookieChanges) -> Response {
    let response = match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            warn!("refusing to redirect to invalid location {:?}", location);
            (StatusCode::SEE_OTHER, [(header::LOCATION, HeaderValue::from_static("/"))]).into_response()
        }
    };
    with_cookies(response, changes)
}

/// Redirect to the login page, remembering where the visitor wanted to go.
pub fn login_redirect(next: &str, changes: CookieChanges) -> Response {
    let query = serde_urlencoded::to_string([("next", next)]).unwrap_or_default();
    redirect_response(&format!("/login?{query}"), changes)
}

/// Path plus query of a request URI, for `next=` parameters.
pub fn request_target(uri: &axum::http::Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}
