#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use axum::Router;
    use chrono::Duration;
    use safari_api::mock::{DEMO_USER_EMAIL, DEMO_USER_PASSWORD};
    use safari_api::{InMemorySafariService, SharedServiceFactory};
    use safari_common::format::{site_timezone, today_in};
    use safari_common::models::{BookingStatus, LoginRequest, Role};
    use safari_common::services::AuthService;
    use safari_common::session::{CookieChanges, Session, SessionManager, SessionUser};
    use safari_config::{AppConfig, SessionConfig};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::routes::routes;

    const TOUR: &str = "masai-mara-migration";

    struct TestApp {
        router: Router,
        backend: Arc<InMemorySafariService>,
        sessions: SessionManager,
        config: AppConfig,
    }

    /// Cookies the browser would send, updated from `Set-Cookie` headers.
    #[derive(Clone, Default)]
    struct Browser {
        cookies: BTreeMap<String, String>,
    }

    impl Browser {
        fn header(&self) -> String {
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ")
        }

        fn absorb_changes(&mut self, changes: CookieChanges) {
            for cookie in changes.into_cookies() {
                self.cookies.insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }

        fn absorb(&mut self, response: &Response<Body>) {
            for value in response.headers().get_all(header::SET_COOKIE) {
                let raw = value.to_str().unwrap();
                let pair = raw.split(';').next().unwrap();
                let (name, value) = pair.split_once('=').unwrap();
                if raw.contains("Max-Age=0") {
                    self.cookies.remove(name);
                } else {
                    self.cookies.insert(name.to_string(), value.to_string());
                }
            }
        }

        fn has(&self, name: &str) -> bool {
            self.cookies.contains_key(name)
        }
    }

    fn app() -> TestApp {
        let backend = Arc::new(InMemorySafariService::demo().unwrap());
        let factory = Arc::new(SharedServiceFactory::new(backend.clone()));
        let sessions = SessionManager::from_config(&SessionConfig::default()).unwrap();
        let config = AppConfig::default();
        let router = routes(Arc::new(config.clone()), factory, sessions.clone());
        TestApp {
            router,
            backend,
            sessions,
            config,
        }
    }

    async fn signed_in(app: &TestApp) -> Browser {
        let auth = app
            .backend
            .login(LoginRequest {
                email: DEMO_USER_EMAIL.to_string(),
                password: DEMO_USER_PASSWORD.to_string(),
            })
            .await
            .unwrap();
        let mut changes = CookieChanges::default();
        app.sessions.start_session(&mut changes, &Session::from(auth)).unwrap();
        let mut browser = Browser::default();
        browser.absorb_changes(changes);
        browser
    }

    async fn send(app: &TestApp, browser: &mut Browser, method: &str, uri: &str, form: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if !browser.cookies.is_empty() {
            builder = builder.header(header::COOKIE, browser.header());
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };
        let response = app.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        browser.absorb(&response);
        response
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response<Body>) -> String {
        response.headers()[header::LOCATION].to_str().unwrap().to_string()
    }

    fn valid_start(app: &TestApp) -> String {
        let today = today_in(site_timezone(&app.config.site.timezone));
        (today + Duration::days(app.config.booking.min_lead_days + 30)).to_string()
    }

    #[tokio::test]
    async fn test_anonymous_visitor_is_sent_to_login() {
        let app = app();
        let mut browser = Browser::default();
        let response = send(&app, &mut browser, "GET", "/book/masai-mara-migration", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Fbook%2Fmasai-mara-migration");

        let response = send(&app, &mut browser, "GET", "/my-bookings", None).await;
        assert_eq!(location(&response), "/login?next=%2Fmy-bookings");
    }

    #[tokio::test]
    async fn test_expired_confirm_returns_to_a_page_after_login() {
        let app = app();
        let mut browser = Browser::default();
        let response = send(&app, &mut browser, "POST", "/book/masai-mara-migration/confirm", Some("")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Fbook%2Fmasai-mara-migration%2Freview");

        let response = send(&app, &mut browser, "POST", "/book/masai-mara-migration/travellers", Some("")).await;
        assert_eq!(location(&response), "/login?next=%2Fbook%2Fmasai-mara-migration%2Ftravellers");

        let response = send(&app, &mut browser, "POST", "/book/masai-mara-migration", Some("")).await;
        assert_eq!(location(&response), "/login?next=%2Fbook%2Fmasai-mara-migration");

        // Signed in again, the review page is a GET and leads back into the flow
        let mut browser = signed_in(&app).await;
        let response = send(&app, &mut browser, "GET", "/book/masai-mara-migration/review", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let step = location(&response);
        let response = send(&app, &mut browser, "GET", &step, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_special_requests_too_large_for_cookie_are_reported() {
        let app = app();
        let mut browser = signed_in(&app).await;
        let trip = format!("start_date={}&adults=2&children=0", valid_start(&app));
        send(&app, &mut browser, "POST", "/book/masai-mara-migration", Some(&trip)).await;
        let draft_before = browser.cookies["safari_booking"].clone();

        // 1000 characters passes the length rule, but not in one cookie
        let travellers = format!(
            "lead_name=Grace+Wanjiku&email=guest%40savannatrails.example&phone=%2B254+700+111+222&special_requests={}",
            "%E7%B4%A0".repeat(1000)
        );
        let response = send(
            &app,
            &mut browser,
            "POST",
            "/book/masai-mara-migration/travellers",
            Some(&travellers),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Please shorten them"));
        assert_eq!(browser.cookies["safari_booking"], draft_before);
    }

    #[tokio::test]
    async fn test_inactive_tour_cannot_be_booked() {
        let app = app();
        let mut browser = signed_in(&app).await;
        let response = send(&app, &mut browser, "GET", "/book/samburu-special-five", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_booking_flow_is_idempotent() {
        let app = app();
        let mut browser = signed_in(&app).await;
        let before = app.backend.bookings_snapshot().len();

        let response = send(&app, &mut browser, "GET", "/book/masai-mara-migration", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("When would you like to travel?"));

        // Skipping ahead goes back to the first step
        let response = send(&app, &mut browser, "GET", "/book/masai-mara-migration/review", None).await;
        assert_eq!(location(&response), "/book/masai-mara-migration");

        let trip = format!("start_date={}&adults=2&children=1", valid_start(&app));
        let response = send(&app, &mut browser, "POST", "/book/masai-mara-migration", Some(&trip)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/book/masai-mara-migration/travellers");
        assert!(browser.has("safari_booking"));

        let response = send(&app, &mut browser, "GET", "/book/masai-mara-migration/review", None).await;
        assert_eq!(location(&response), "/book/masai-mara-migration/travellers");

        // Contact details are pre-filled from the account
        let response = send(&app, &mut browser, "GET", "/book/masai-mara-migration/travellers", None).await;
        assert!(body_text(response).await.contains(DEMO_USER_EMAIL));

        let travellers = "lead_name=Grace+Wanjiku&email=guest%40savannatrails.example&phone=%2B254+700+111+222&special_requests=";
        let response = send(
            &app,
            &mut browser,
            "POST",
            "/book/masai-mara-migration/travellers",
            Some(travellers),
        )
        .await;
        assert_eq!(location(&response), "/book/masai-mara-migration/review");

        let response = send(&app, &mut browser, "GET", "/book/masai-mara-migration/review", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        // 2 × $2,850 + 1 × 50% of $2,850
        assert!(body_text(response).await.contains("$7,125.00"));

        let replay = browser.clone();
        let response = send(&app, &mut browser, "POST", "/book/masai-mara-migration/confirm", Some("")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/my-bookings");
        assert!(!browser.has("safari_booking"));

        let bookings = app.backend.bookings_snapshot();
        assert_eq!(bookings.len(), before + 1);
        let created = bookings.last().unwrap();
        assert_eq!(created.tour_id, TOUR);
        assert_eq!(created.total_price, 712_500);
        assert_eq!(created.status, BookingStatus::Pending);

        // A double submit with the old draft does not book twice
        let mut replay = replay;
        let response = send(&app, &mut replay, "POST", "/book/masai-mara-migration/confirm", Some("")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(app.backend.bookings_snapshot().len(), before + 1);
    }

    #[tokio::test]
    async fn test_trip_errors_are_shown() {
        let app = app();
        let mut browser = signed_in(&app).await;
        let response = send(
            &app,
            &mut browser,
            "POST",
            "/book/masai-mara-migration",
            Some("start_date=2020-01-01&adults=6&children=6"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!browser.has("safari_booking"));
        let html = body_text(response).await;
        assert!(html.contains("Start date must be at least"));
        assert!(html.contains("at most 8 travellers"));
    }

    #[tokio::test]
    async fn test_my_bookings_newest_first() {
        let app = app();
        let mut browser = signed_in(&app).await;
        let response = send(&app, &mut browser, "GET", "/my-bookings", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        let migration = html.find("Great Migration Safari").unwrap();
        let amboseli = html.find("Amboseli Elephants under Kilimanjaro").unwrap();
        assert!(migration < amboseli);
        assert!(html.contains("/my-bookings/bk-1002/cancel"));
    }

    #[tokio::test]
    async fn test_cancel_own_booking_only() {
        let app = app();
        let mut browser = signed_in(&app).await;

        let response = send(&app, &mut browser, "POST", "/my-bookings/bk-1002/cancel", Some("")).await;
        assert_eq!(location(&response), "/my-bookings");
        let status_of = |id: &str| {
            app.backend
                .bookings_snapshot()
                .into_iter()
                .find(|b| b.id == id)
                .map(|b| b.status)
        };
        assert_eq!(status_of("bk-1002"), Some(BookingStatus::Cancelled));

        // bk-1005 belongs to someone else
        let response = send(&app, &mut browser, "POST", "/my-bookings/bk-1005/cancel", Some("")).await;
        assert_eq!(location(&response), "/my-bookings");
        assert_eq!(status_of("bk-1005"), Some(BookingStatus::Pending));
    }

    #[tokio::test]
    async fn test_rejected_token_signs_out() {
        let app = app();
        let stale = Session {
            token: "revoked".to_string(),
            user: SessionUser {
                id: "u-grace".to_string(),
                name: "Grace".to_string(),
                email: DEMO_USER_EMAIL.to_string(),
                role: Role::User,
            },
        };
        let mut changes = CookieChanges::default();
        app.sessions.start_session(&mut changes, &stale).unwrap();
        let mut browser = Browser::default();
        browser.absorb_changes(changes);

        let response = send(&app, &mut browser, "GET", "/my-bookings", None).await;
        assert_eq!(location(&response), "/login?expired=1");
        assert!(!browser.has("safari_session"));
    }
}
