//! End-to-end checks of the HTTP client and view derivation against an in-process backend.

use anew::client::{ClientError, Operation};
use anew::config::ApiConfig;
use anew::render::{self, Page};
use anew::view::{ContentKind, LOAD_ERROR_MESSAGE};
use anew::{ApiClient, HomeView, SummaryPayload, ViewState};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

async fn serve(app: Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ApiClient::new(&ApiConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 5,
    })
    .unwrap()
}

fn serve_data(body: Value) -> Router {
    Router::new().route(
        "/api/data",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    )
}

fn topic(title: &str) -> Value {
    json!({
        "title": title,
        "first_perspective": {
            "type": "first",
            "title": "Growth first",
            "icon": "🟢",
            "perspectives": ["Rate cuts support exporters"],
            "links": ["https://news.example.com/growth"]
        },
        "second_perspective": {
            "type": "second",
            "title": "Stability first",
            "icon": "🔴",
            "perspectives": ["Household debt is still climbing"],
            "links": []
        },
        "reference_url": ["https://news.example.com/rates"]
    })
}

#[tokio::test]
async fn ping_returns_json() {
    let app = Router::new().route("/api/ping", get(|| async { Json(json!({ "message": "pong" })) }));
    let client = serve(app).await;
    let pong = client.ping().await.unwrap();
    assert_eq!(pong["message"], "pong");
}

#[tokio::test]
async fn current_shape_is_decoded() {
    let client = serve(serve_data(json!({
        "summary_items": [topic("Base rate decision")],
        "created_at": "2025-06-20T13:00:00"
    })))
    .await;

    let payload = client.get_summary().await.unwrap();
    assert_eq!(payload.shape(), "summary_items");

    let mut view = HomeView::new();
    match view.settle(Ok::<_, ClientError>(payload)) {
        ViewState::Content(content) => {
            assert_eq!(content.kind(), ContentKind::NonEmpty);
            assert_eq!(content.topics[0].title, "Base rate decision");
            assert_eq!(content.updated_at().as_deref(), Some("2025.06.20, 13:00"));
        }
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test]
async fn bare_and_legacy_shapes_are_decoded() {
    let bare = serve(serve_data(json!([topic("A"), topic("B")]))).await;
    assert!(matches!(
        bare.get_summary().await.unwrap(),
        SummaryPayload::Bare(topics) if topics.len() == 2
    ));

    let legacy = serve(serve_data(json!({ "summary": [topic("C")] }))).await;
    assert!(matches!(
        legacy.get_summary().await.unwrap(),
        SummaryPayload::Legacy(topics) if topics[0].title == "C"
    ));
}

#[tokio::test]
async fn empty_summary_renders_empty_state() {
    let client = serve(serve_data(json!({ "summary_items": [], "created_at": null }))).await;

    let mut view = HomeView::new();
    let state = view.settle(client.get_summary().await);
    let page = render::page(state, &Default::default());

    assert!(matches!(page, Page::Empty(_)));
    assert!(page.cards().is_empty());
    let printed = page.to_string();
    assert!(printed.contains(render::EMPTY_ICON));
    assert!(printed.contains(render::EMPTY_MESSAGE));
}

#[tokio::test]
async fn error_status_is_labelled() {
    let app = Router::new().route("/api/data", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let client = serve(app).await;

    let err = client.get_summary().await.unwrap_err();
    assert_eq!(err.operation(), Operation::Summary);
    assert!(matches!(err, ClientError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.to_string().starts_with("summary fetch failed: "));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn non_json_body_is_a_transport_error() {
    let app = Router::new().route("/api/ping", get(|| async { "<html>maintenance</html>" }));
    let client = serve(app).await;

    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { op: Operation::Ping, .. }));
    assert!(err.to_string().starts_with("server connection failed: "));
}

#[tokio::test]
async fn malformed_topics_are_a_payload_error() {
    let client = serve(serve_data(json!({ "summary_items": [{ "headline": "no title" }] }))).await;
    let err = client.get_summary().await.unwrap_err();
    assert!(matches!(err, ClientError::Payload { op: Operation::Summary, .. }));
}

#[tokio::test]
async fn unreachable_backend_settles_to_error() {
    let client = ApiClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    let outcome = client.get_summary().await;
    let err = outcome.as_ref().unwrap_err();
    assert!(err.to_string().starts_with("summary fetch failed: "));

    let mut view = HomeView::new();
    let state = view.settle(outcome);
    assert_eq!(state, &ViewState::Error(LOAD_ERROR_MESSAGE.to_string()));
    assert!(!view.is_loading());
}
