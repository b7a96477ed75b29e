use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use safari_api::mock::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, DEMO_USER_EMAIL, DEMO_USER_PASSWORD};
use safari_config::{AppConfig, SessionConfig};
use safari_common::session::SessionManager;
use safari_frontend::{build_router, build_service_factory};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let mut config = AppConfig::default();
    config.use_demo_data = true;
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../../static").to_string();
    let config = Arc::new(config);
    let services = build_service_factory(&config).unwrap();
    let sessions = SessionManager::from_config(&SessionConfig::default()).unwrap();
    build_router(config, services, sessions).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` pairs from `Set-Cookie`, ready for a `Cookie` header.
fn cookies_from(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter(|raw| !raw.contains("Max-Age=0"))
        .filter_map(|raw| raw.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_public_pages_render() {
    let app = app();
    for path in ["/", "/tours", "/tours/masai-mara-migration", "/about", "/faq", "/visa-info", "/packing-list", "/contact", "/login", "/register"] {
        let response = send(&app, get(path)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {}", path);
        let html = body_text(response).await;
        assert!(html.contains("<!DOCTYPE html>") || html.contains("<!doctype html>"), "GET {}", path);
    }
}

#[tokio::test]
async fn test_unknown_path_gets_not_found_page() {
    let app = app();
    let response = send(&app, get("/safaris-on-the-moon")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let app = app();
    let response = send(&app, get("/static/css/site.css")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/css"));
}

#[tokio::test]
async fn test_protected_pages_need_login() {
    let app = app();
    let response = send(&app, get("/my-bookings")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login?next=%2Fmy-bookings");

    let response = send(&app, get("/admin")).await;
    assert_eq!(response.headers()[header::LOCATION], "/login?next=%2Fadmin");
}

#[tokio::test]
async fn test_admin_signs_in_and_opens_dashboard() {
    let app = app();
    let form = format!(
        "email={}&password={}&next=%2Fadmin%2Ftours",
        DEMO_ADMIN_EMAIL.replace('@', "%40"),
        DEMO_ADMIN_PASSWORD
    );
    let login = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();
    let response = send(&app, login).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin/tours");
    let cookie = cookies_from(&response);

    let request = Request::builder()
        .uri("/admin/tours")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome back"));
    assert!(html.contains("Samburu Special Five"));
}

async fn sign_in(app: &Router, email: &str, password: &str, next: &str) -> Response<Body> {
    let form = serde_urlencoded::to_string([("email", email), ("password", password), ("next", next)]).unwrap();
    let login = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();
    send(app, login).await
}

fn next_param(location: &str) -> String {
    let query = location.split_once('?').map(|(_, query)| query).unwrap_or_default();
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
    pairs.into_iter().find(|(key, _)| key == "next").map(|(_, value)| value).unwrap()
}

#[tokio::test]
async fn test_post_after_expiry_lands_on_a_page_after_login() {
    let app = app();
    let expired = Request::builder()
        .method("POST")
        .uri("/book/masai-mara-migration/confirm")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, expired).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let next = next_param(response.headers()[header::LOCATION].to_str().unwrap());

    let response = sign_in(&app, DEMO_USER_EMAIL, DEMO_USER_PASSWORD, &next).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let landing = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert_eq!(landing, "/book/masai-mara-migration/review");
    let cookie = cookies_from(&response);

    // No draft yet, so the review page forwards to the first step
    let follow = |uri: String| {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap()
    };
    let response = send(&app, follow(landing)).await;
    assert_ne!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let step = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let response = send(&app, follow(step)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let expired = Request::builder()
        .method("POST")
        .uri("/admin/tours/okavango-delta/delete")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, expired).await;
    let next = next_param(response.headers()[header::LOCATION].to_str().unwrap());
    let response = sign_in(&app, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, &next).await;
    let landing = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert_eq!(landing, "/admin/tours");
    let request = Request::builder()
        .uri(landing)
        .header(header::COOKIE, cookies_from(&response))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.status(), StatusCode::OK);
}
