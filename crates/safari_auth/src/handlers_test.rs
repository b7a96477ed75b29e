#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use axum::Router;
    use safari_api::mock::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, DEMO_USER_EMAIL, DEMO_USER_PASSWORD};
    use safari_api::{InMemorySafariService, SharedServiceFactory};
    use safari_common::models::LoginRequest;
    use safari_common::services::AuthService;
    use safari_common::session::{CookieChanges, Session, SessionManager, SESSION_COOKIE};
    use safari_config::{AppConfig, SessionConfig};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::routes::routes;

    struct TestApp {
        router: Router,
        backend: Arc<InMemorySafariService>,
        sessions: SessionManager,
    }

    fn app() -> TestApp {
        let backend = Arc::new(InMemorySafariService::demo().unwrap());
        let factory = Arc::new(SharedServiceFactory::new(backend.clone()));
        let sessions = SessionManager::from_config(&SessionConfig::default()).unwrap();
        let router = routes(Arc::new(AppConfig::default()), factory, sessions.clone());
        TestApp {
            router,
            backend,
            sessions,
        }
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn set_cookies(response: &Response<Body>) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn cookie_header_for(app: &TestApp, email: &str, password: &str) -> String {
        let auth = app
            .backend
            .login(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap();
        let mut changes = CookieChanges::default();
        app.sessions.start_session(&mut changes, &Session::from(auth)).unwrap();
        changes
            .into_cookies()
            .into_iter()
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
            .collect::<Vec<_>>()
            .join("; ")
    }

    #[tokio::test]
    async fn test_login_sets_session_and_redirects_home() {
        let app = app();
        let body = format!("email={}&password={}", DEMO_USER_EMAIL, DEMO_USER_PASSWORD);
        let response = app.router.oneshot(form("/login", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookies = set_cookies(&response);
        assert!(cookies.iter().any(|c| c.starts_with(&format!("{}=", SESSION_COOKIE))));
        assert!(cookies.iter().any(|c| c.starts_with("safari_flash=")));
    }

    #[tokio::test]
    async fn test_admin_login_lands_on_dashboard() {
        let app = app();
        let body = format!("email={}&password={}", DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD);
        let response = app.router.oneshot(form("/login", &body)).await.unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/admin");
    }

    #[tokio::test]
    async fn test_login_honours_local_next_only() {
        let app = app();
        let body = format!(
            "email={}&password={}&next=%2Fmy-bookings",
            DEMO_USER_EMAIL, DEMO_USER_PASSWORD
        );
        let response = app.router.clone().oneshot(form("/login", &body)).await.unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/my-bookings");

        let body = format!(
            "email={}&password={}&next=%2F%2Fevil.example",
            DEMO_USER_EMAIL, DEMO_USER_PASSWORD
        );
        let response = app.router.oneshot(form("/login", &body)).await.unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_wrong_password_rerenders_form() {
        let app = app();
        let body = format!("email={}&password=nope", DEMO_USER_EMAIL);
        let response = app.router.oneshot(form("/login", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookies(&response).is_empty());
        let html = body_text(response).await;
        assert!(html.contains("Invalid email or password."));
    }

    #[tokio::test]
    async fn test_unverified_account_cannot_sign_in() {
        let app = app();
        let response = app
            .router
            .oneshot(form("/login", "email=tom.h%40example.co.uk&password=Safari2026"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains("verify your email"));
    }

    #[tokio::test]
    async fn test_expired_notice_on_login_page() {
        let app = app();
        let response = app
            .router
            .oneshot(Request::builder().uri("/login?expired=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Your session has expired"));
    }

    #[tokio::test]
    async fn test_signed_in_visitor_skips_login_page() {
        let app = app();
        let cookie = cookie_header_for(&app, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await;
        let request = Request::builder()
            .uri("/login")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_draft() {
        let app = app();
        let cookie = cookie_header_for(&app, DEMO_USER_EMAIL, DEMO_USER_PASSWORD).await;
        let mut request = form("/logout", "");
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        let response = app.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookies = set_cookies(&response);
        assert!(cookies
            .iter()
            .any(|c| c.starts_with("safari_session=;") && c.contains("Max-Age=0")));
        assert!(cookies
            .iter()
            .any(|c| c.starts_with("safari_booking=;") && c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_register_then_verify_then_login() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(form(
                "/register",
                "name=Amani+Mwangi&email=amani%40example.com&password=twiga2027&confirm_password=twiga2027",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let token = app.backend.verification_token_for("amani@example.com").unwrap();
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/verify-email/{}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Email verified"));

        let response = app
            .router
            .oneshot(form("/login", "email=amani%40example.com&password=twiga2027"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_shows_conflict() {
        let app = app();
        let body = format!(
            "name=Grace&email={}&password=twiga2027&confirm_password=twiga2027",
            DEMO_USER_EMAIL
        );
        let response = app.router.oneshot(form("/register", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("already exists"));
    }

    #[tokio::test]
    async fn test_invalid_verification_link() {
        let app = app();
        let response = app
            .router
            .oneshot(Request::builder().uri("/verify-email/bogus").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Verification failed"));
    }

    #[tokio::test]
    async fn test_forgot_password_is_neutral() {
        let app = app();
        let known = app
            .router
            .clone()
            .oneshot(form("/forgot-password", &format!("email={}", DEMO_USER_EMAIL)))
            .await
            .unwrap();
        let unknown = app
            .router
            .oneshot(form("/forgot-password", "email=nobody%40example.com"))
            .await
            .unwrap();

        assert_eq!(known.status(), StatusCode::SEE_OTHER);
        assert_eq!(unknown.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            known.headers()[header::LOCATION],
            unknown.headers()[header::LOCATION]
        );
        assert!(app.backend.reset_token_for(DEMO_USER_EMAIL).is_some());
    }

    #[tokio::test]
    async fn test_reset_password_flow() {
        let app = app();
        app.backend.forgot_password(DEMO_USER_EMAIL).await.unwrap();
        let token = app.backend.reset_token_for(DEMO_USER_EMAIL).unwrap();

        let response = app
            .router
            .clone()
            .oneshot(form(
                &format!("/reset-password/{}", token),
                "password=weak&confirm_password=weak",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .router
            .clone()
            .oneshot(form(
                &format!("/reset-password/{}", token),
                "password=Ngorongoro22&confirm_password=Ngorongoro22",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let body = format!("email={}&password=Ngorongoro22", DEMO_USER_EMAIL);
        let response = app.router.oneshot(form("/login", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
