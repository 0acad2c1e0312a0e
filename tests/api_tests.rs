use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use notes_api::application::auth_service::AuthService;
use notes_api::application::note_service::NoteService;
use notes_api::data::note_repository::InMemoryNoteRepository;
use notes_api::data::user_repository::InMemoryUserRepository;
use notes_api::domain::user::CreateUser;
use notes_api::presentation::handlers::{AppState, configure, route_not_found};
use notes_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware, cors,
};
use serde_json::{Value, json};
use std::sync::Arc;

const JWT_SECRET: &str = "test-secret-key-for-testing-only";

macro_rules! setup_test {
    () => {{
        let auth = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            JWT_SECRET.to_string(),
        );

        // Register a test user up front and keep its token
        let registered = auth
            .register(CreateUser {
                email: "test@example.com".to_string(),
                password: "test123".to_string(),
            })
            .await
            .unwrap();

        let state = web::Data::new(AppState {
            notes: NoteService::new(Arc::new(InMemoryNoteRepository::new())),
            auth,
        });

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(JWT_SECRET))
                .wrap(cors("*"))
                .wrap(TimingMiddleware)
                .wrap(RequestIdMiddleware)
                .configure(configure)
                .default_service(web::to(route_not_found)),
        )
        .await;

        (app, registered.token)
    }};
}

#[actix_web::test]
async fn test_health_check() {
    let (app, _token) = setup_test!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert!(resp.headers().contains_key("x-response-time"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_unknown_routes_use_error_envelope() {
    let (app, _token) = setup_test!();

    for uri in ["/api/does-not-exist", "/totally/elsewhere"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert!(body["error"]["message"].as_str().unwrap().contains(uri));
    }
}

#[actix_web::test]
async fn test_malformed_json_is_validation_error() {
    let (app, token) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/notes")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_missing_required_field_is_validation_error() {
    let (app, token) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/notes")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "content": "no title here" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_protected_routes_require_token() {
    let (app, _token) = setup_test!();

    let requests = vec![
        test::TestRequest::get().uri("/api/notes"),
        test::TestRequest::post()
            .uri("/api/notes")
            .set_json(json!({ "title": "x" })),
        test::TestRequest::get().uri("/api/notes/123"),
        test::TestRequest::patch()
            .uri("/api/notes/123")
            .set_json(json!({ "title": "x" })),
        test::TestRequest::delete().uri("/api/notes/123"),
        test::TestRequest::get().uri("/api/categories"),
        test::TestRequest::get().uri("/api/auth/me"),
    ];

    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        // Rejected responses still pass through the outer middleware.
        assert!(resp.headers().contains_key("x-request-id"));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}

#[actix_web::test]
async fn test_invalid_token_is_rejected() {
    let (app, _token) = setup_test!();

    let req = test::TestRequest::get()
        .uri("/api/notes")
        .insert_header(("Authorization", "Bearer invalid.token.here"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Invalid token");
}

#[actix_web::test]
async fn test_bare_token_is_accepted() {
    let (app, token) = setup_test!();

    let req = test::TestRequest::get()
        .uri("/api/notes")
        .insert_header(("Authorization", token.as_str()))
        .to_request();
    let notes: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(notes, json!([]));
}

#[actix_web::test]
async fn test_public_routes_ignore_bad_tokens() {
    let (app, _token) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Authorization", "Bearer garbage"))
        .set_json(json!({ "email": "test@example.com", "password": "test123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_preflight_skips_auth_and_advertises_policy() {
    let (app, _token) = setup_test!();

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/notes")
        .insert_header((header::ORIGIN, "http://client.test"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization, content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(),
        "3600"
    );
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "missing {} in {}", method, methods);
    }
    let allowed_headers = headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed_headers.contains("authorization"));
    assert!(allowed_headers.contains("content-type"));
}

#[actix_web::test]
async fn test_cors_with_fixed_origin_refuses_others() {
    let app = test::init_service(
        App::new()
            .wrap(cors("http://a.test"))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/health")
        .insert_header((header::ORIGIN, "http://b.test"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((header::ORIGIN, "http://b.test"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((header::ORIGIN, "http://a.test"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://a.test"
    );
}
