#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use safari_api::{InMemorySafariService, SharedServiceFactory};
    use safari_common::session::SessionManager;
    use safari_config::{AppConfig, SessionConfig};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::handlers::PackingQuery;
    use crate::routes::routes;

    fn app() -> (Router, Arc<InMemorySafariService>) {
        let backend = Arc::new(InMemorySafariService::demo().unwrap());
        let factory = Arc::new(SharedServiceFactory::new(backend.clone()));
        let sessions = SessionManager::from_config(&SessionConfig::default()).unwrap();
        let router = routes(Arc::new(AppConfig::default()), factory, sessions).unwrap();
        (router, backend)
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_home_shows_featured_tours() {
        let (router, _) = app();
        let (status, body) = get(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Great Migration Safari"));
        assert!(!body.contains("Samburu Special Five"));
    }

    #[tokio::test]
    async fn test_tour_list_filters_by_destination() {
        let (router, _) = app();
        let (status, body) = get(router, "/tours?destination=Uganda&q=&duration=").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Gorilla Trekking in Bwindi"));
        assert!(!body.contains("Great Migration Safari"));
        // Every destination stays selectable in the filter
        assert!(body.contains(r#"value="Uganda""#));
        assert!(body.contains(">Uganda</option>"));
    }

    #[tokio::test]
    async fn test_inactive_tour_is_not_found() {
        let (router, _) = app();
        let (status, _) = get(router.clone(), "/tours/samburu-special-five").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(router, "/tours/okavango-delta").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/book/okavango-delta"));
    }

    #[tokio::test]
    async fn test_unknown_visa_country_is_not_found() {
        let (router, _) = app();
        let (status, _) = get(router.clone(), "/visa-info/narnia").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get(router, "/visa-info/kenya").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Kenya"));
    }

    #[tokio::test]
    async fn test_faq_search_without_match_shows_empty_state() {
        let (router, _) = app();
        let (status, body) = get(router, "/faq?q=zeppelin").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No matching questions"));
    }

    #[test]
    fn test_packing_query_flags() {
        for raw in ["true", "1", "on"] {
            let query = PackingQuery {
                essentials: Some(raw.to_string()),
            };
            assert!(query.essentials_only(), "{raw}");
        }
        assert!(!PackingQuery { essentials: Some("no".to_string()) }.essentials_only());
        assert!(!PackingQuery::default().essentials_only());
    }

    #[tokio::test]
    async fn test_contact_submit_sends_enquiry_and_redirects() {
        let (router, backend) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "name=Lena+Fischer&email=lena%40example.de&subject=Honeymoon&message=Private+vehicle%3F",
            ))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/contact");
        let cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect();
        assert!(cookies.iter().any(|cookie| cookie.starts_with("safari_flash=")));

        let enquiries = backend.enquiries();
        assert_eq!(enquiries.len(), 1);
        assert_eq!(enquiries[0].subject, "Honeymoon");
    }

    #[tokio::test]
    async fn test_contact_submit_with_errors_rerenders_form() {
        let (router, backend) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=L&email=not-an-email&subject=&message="))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("Please enter a valid email address"));
        assert!(backend.enquiries().is_empty());
    }
}
