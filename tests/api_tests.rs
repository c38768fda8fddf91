use echo_chat::message::{ChatResponse, ErrorResponse, HealthResponse, ResponseStatus};
use echo_chat::routes::{create_router, with_middleware};
use echo_chat::services::responder::EchoResponder;
use echo_chat::state::AppState;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use tower::util::ServiceExt;

fn app() -> Router {
    create_router().with_state(AppState::default().shared())
}

fn chat_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_chat_endpoint_echoes() {
    let response = app()
        .oneshot(chat_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"response": "Echo: hello", "status": "success"})
    );
}

#[tokio::test]
async fn test_chat_accepts_any_non_empty_message() {
    let app = app();
    for message in ["hi", "What's the weather in Singapore?", "ünïcödé 🚀", "  padded  "] {
        let body = serde_json::json!({ "message": message }).to_string();
        let response = app.clone().oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "message {message:?}");

        let chat: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(chat.status, ResponseStatus::Success);
        assert!(!chat.response.is_empty());
        assert!(chat.response.ends_with(message.trim()));
    }
}

#[tokio::test]
async fn test_whitespace_only_message_is_answered() {
    let app = app();
    for message in [" ", "   ", "\n\t"] {
        let body = serde_json::json!({ "message": message }).to_string();
        let response = app.clone().oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "message {message:?}");

        let chat: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(chat.status, ResponseStatus::Success);
        assert!(chat.response.starts_with("Echo:"));
    }
}

#[tokio::test]
async fn test_custom_responder_prefix() {
    let state = AppState::new(EchoResponder::new("You said: ")).shared();
    let app = create_router().with_state(state);

    let response = app
        .oneshot(chat_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let chat: ChatResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(chat.response, "You said: hello");
}

#[tokio::test]
async fn test_root_serves_chat_ui() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got {content_type}");

    let html = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("/api/chat"));
}

#[tokio::test]
async fn test_unknown_paths_miss_the_api() {
    let app = app();
    for uri in ["/api/unknown", "/nope.html"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");

        let bytes = body_bytes(response).await;
        assert!(serde_json::from_slice::<ChatResponse>(&bytes).is_err());
        assert!(serde_json::from_slice::<HealthResponse>(&bytes).is_err());
    }

    // GET on the chat route is not the chat handler either.
    let response = app
        .oneshot(Request::builder().uri("/api/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_same_request_same_response() {
    let app = app();
    let mut bodies = Vec::new();
    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(chat_request(r#"{"message": "again"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        bodies.push(body_bytes(response).await);
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_empty_or_missing_message_is_rejected() {
    let app = app();
    for body in [r#"{"message": ""}"#, r#"{}"#] {
        let response = app.clone().oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");

        let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(err.status, ResponseStatus::Error);
        assert!(!err.error.is_empty());
    }
}

#[tokio::test]
async fn test_malformed_bodies_are_client_errors() {
    let app = app();
    let cases = [
        (r#"{"message": "#, StatusCode::BAD_REQUEST),
        ("not json at all", StatusCode::BAD_REQUEST),
        (r#"{"message": 42}"#, StatusCode::UNPROCESSABLE_ENTITY),
        (r#"{"message": null}"#, StatusCode::UNPROCESSABLE_ENTITY),
    ];
    for (body, expected) in cases {
        let response = app.clone().oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), expected, "body {body}");

        let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(err.status, ResponseStatus::Error);
    }
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .body(Body::from(r#"{"message": "hello"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let message = "a".repeat(echo_chat::routes::MAX_BODY_BYTES + 1);
    let body = serde_json::json!({ "message": message }).to_string();

    let response = app().oneshot(chat_request(body)).await.unwrap();
    assert!(response.status().is_client_error());
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app();

    // Chat traffic before and after must not change the health answer.
    let _ = app
        .clone()
        .oneshot(chat_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(health.status, "healthy");
    }
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/chat")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_handler_panic_becomes_500() {
    async fn boom() -> &'static str {
        panic!("handler blew up")
    }
    let app = with_middleware(
        Router::new()
            .route("/boom", get(boom))
            .route("/ok", get(|| async { "ok" })),
    );

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(err.status, ResponseStatus::Error);
    assert_eq!(err.error, "Internal server error");

    // The service is still usable afterwards.
    let response = app
        .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
