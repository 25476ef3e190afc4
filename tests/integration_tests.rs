//! Integration tests for the localization middleware.
//!
//! These tests drive a real axum `Router` end to end: the middleware is
//! installed as a layer and handlers translate through the public API.

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Request};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

use axum_localize::i18n::format_fields;
use axum_localize::{
    current_language, translate, DirLoader, I18n, LanguageTag, Localizer, MapLoader,
};

// ==================== Test Helpers ====================

fn catalogs() -> MapLoader {
    MapLoader::new()
        .with_messages(
            LanguageTag::ENGLISH,
            [("welcome", "hello"), ("welcomeWithName", "hello {{.name}}")],
        )
        .with_messages(
            LanguageTag::GERMAN,
            [("welcome", "hallo"), ("welcomeWithName", "hallo {{.name}}")],
        )
}

fn routes() -> Router {
    Router::new()
        .route("/", get(|l: Localizer| async move { l.t("welcome") }))
        .route(
            "/messageId/:name",
            get(|l: Localizer, Path(name): Path<String>| async move {
                l.t_with("welcomeWithName", &json!({ "name": name }))
            }),
        )
        .route(
            "/messageIdWithField/:message_id/:field",
            get(
                |l: Localizer, Path((message_id, field)): Path<(String, String)>| async move {
                    l.t_with(&message_id, &json!({ "field": field }))
                },
            ),
        )
        .route(
            "/exist/:lng",
            get(|l: Localizer, Path(lng): Path<String>| async move {
                l.has_language(&lng).to_string()
            }),
        )
        .route(
            "/lng/default",
            get(|l: Localizer| async move { l.default_language().to_string() }),
        )
        .route(
            "/lng/current",
            get(|l: Localizer| async move { l.current_language().to_string() }),
        )
        .route(
            "/raw",
            get(|request: Request| async move {
                format!(
                    "{}:{}",
                    current_language(&request),
                    translate(&request, "welcome", None)
                )
            }),
        )
}

fn server_with(i18n: I18n) -> Router {
    routes().layer(i18n.localize().expect("catalogs load"))
}

fn server() -> Router {
    server_with(
        I18n::builder()
            .languages([LanguageTag::ENGLISH, LanguageTag::GERMAN])
            .loader(catalogs())
            .build(),
    )
}

async fn get_body(app: Router, uri: &str, accept: Option<&str>) -> String {
    let mut builder = axum::http::Request::builder().uri(uri);
    if let Some(accept) = accept {
        builder = builder.header("accept-language", accept);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn request(uri: &str, accept: &str) -> String {
    get_body(server(), uri, Some(accept)).await
}

// ==================== Translation Tests ====================

#[tokio::test]
async fn test_english_hello() {
    assert_eq!(request("/", "en").await, "hello");
}

#[tokio::test]
async fn test_english_hello_with_name() {
    assert_eq!(request("/messageId/alex", "en").await, "hello alex");
}

#[tokio::test]
async fn test_german_hello() {
    assert_eq!(request("/", "de").await, "hallo");
}

#[tokio::test]
async fn test_german_hello_with_name() {
    assert_eq!(request("/messageId/alex", "de").await, "hallo alex");
}

#[tokio::test]
async fn test_french_falls_back_to_default() {
    assert_eq!(request("/", "fr").await, "hello");
    assert_eq!(request("/messageId/alex", "fr").await, "hello alex");
}

#[tokio::test]
async fn test_weighted_header_picks_supported_language() {
    assert_eq!(request("/", "fr-FR, fr;q=0.9, de;q=0.8, en;q=0.7").await, "hallo");
}

#[tokio::test]
async fn test_unknown_message_id_echoes_key() {
    assert_eq!(request("/messageIdWithField/nothing/x", "de").await, "nothing");
}

// ==================== Language Query Tests ====================

#[tokio::test]
async fn test_language_exists() {
    assert_eq!(request("/exist/en", "en").await, "true");
    assert_eq!(request("/exist/de", "en").await, "true");
}

#[tokio::test]
async fn test_language_does_not_exist() {
    assert_eq!(request("/exist/zh-Hans", "en").await, "false");
}

#[tokio::test]
async fn test_default_language() {
    assert_eq!(request("/lng/default", "en").await, "en");
    assert_eq!(request("/lng/default", "de").await, "en");
}

#[tokio::test]
async fn test_current_language() {
    assert_eq!(request("/lng/current", "en").await, "en");
    assert_eq!(request("/lng/current", "de").await, "de");
    assert_eq!(request("/lng/current", "fr").await, "en");
}

#[tokio::test]
async fn test_query_override_beats_header() {
    assert_eq!(request("/?lng=de", "en").await, "hallo");
    assert_eq!(request("/lng/current?lng=de", "en").await, "de");
}

#[tokio::test]
async fn test_unsupported_query_override_is_kept_as_current_language() {
    // The override is not checked against the supported set, but catalog
    // lookup still falls back to the default.
    assert_eq!(request("/lng/current?lng=fr", "de").await, "fr");
    assert_eq!(request("/?lng=fr", "de").await, "hello");
}

#[tokio::test]
async fn test_malformed_query_override_falls_through_to_header() {
    assert_eq!(request("/lng/current?lng=en-12", "de").await, "de");
    assert_eq!(request("/?lng=en-x", "de").await, "hallo");
}

#[tokio::test]
async fn test_full_request_is_a_scope() {
    assert_eq!(request("/raw", "de").await, "de:hallo");
}

// ==================== Without Middleware Tests ====================

#[tokio::test]
async fn test_without_middleware_echoes_key() {
    assert_eq!(get_body(routes(), "/", Some("de")).await, "welcome");
}

#[tokio::test]
async fn test_without_middleware_renders_key_template() {
    assert_eq!(
        get_body(routes(), "/messageIdWithField/field%20is%20%7B%7B.field%7D%7D/x", None).await,
        "field is x"
    );
}

#[tokio::test]
async fn test_without_middleware_keeps_literal_close_braces() {
    assert_eq!(
        get_body(routes(), "/messageIdWithField/a%20%7D%7D%20%7B%7B.field%7D%7D/x", None).await,
        "a }} x"
    );
}

#[tokio::test]
async fn test_without_middleware_language_queries() {
    assert_eq!(get_body(routes(), "/exist/en", None).await, "false");
    assert_eq!(get_body(routes(), "/lng/default", Some("de")).await, "en");
    assert_eq!(get_body(routes(), "/lng/current?lng=de", Some("de")).await, "en");
    assert_eq!(get_body(routes(), "/raw", Some("de")).await, "en:welcome");
}

// ==================== Configuration Tests ====================

#[tokio::test]
async fn test_dir_loader_catalogs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("en.json"),
        r#"{"welcome": "hello", "welcomeWithName": "hello {{.name}}"}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("de.json"),
        r#"{"welcome": "hallo", "welcomeWithName": "hallo {{.name}}"}"#,
    )
    .unwrap();

    let app = server_with(
        I18n::builder()
            .languages([LanguageTag::ENGLISH, LanguageTag::GERMAN])
            .loader(DirLoader::new(dir.path()))
            .build(),
    );

    assert_eq!(get_body(app.clone(), "/messageId/alex", Some("de")).await, "hallo alex");
    assert_eq!(get_body(app, "/", Some("en")).await, "hello");
}

#[tokio::test]
async fn test_explicit_default_language() {
    let app = server_with(
        I18n::builder()
            .languages([LanguageTag::ENGLISH, LanguageTag::GERMAN])
            .default_language(LanguageTag::GERMAN)
            .loader(catalogs())
            .build(),
    );

    assert_eq!(get_body(app.clone(), "/", Some("fr")).await, "hallo");
    assert_eq!(get_body(app, "/lng/default", None).await, "de");
}

#[tokio::test]
async fn test_missing_key_warning_reaches_logger() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let app = server_with(
        I18n::builder()
            .languages([LanguageTag::ENGLISH, LanguageTag::GERMAN])
            .loader(catalogs())
            .logger(move |message: &str, fields: &[(&str, &str)]| {
                sink.lock()
                    .unwrap()
                    .push(format!("{} {}", message, format_fields(fields)));
            })
            .build(),
    );

    assert_eq!(
        get_body(app, "/messageIdWithField/missing/x", Some("de")).await,
        "missing"
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("msgID=missing"));
}

// ==================== Concurrency Tests ====================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_are_isolated() {
    let app = server();

    let mut handles = Vec::new();
    for i in 0..64 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let (accept, expected) = if i % 2 == 0 {
                ("de", "hallo alex")
            } else {
                ("en", "hello alex")
            };
            let body = get_body(app, "/messageId/alex", Some(accept)).await;
            (body, expected)
        }));
    }

    for handle in handles {
        let (body, expected) = handle.await.unwrap();
        assert_eq!(body, expected);
    }
}
