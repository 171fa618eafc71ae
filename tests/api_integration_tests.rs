//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tone_shift::{
    api::create_router,
    cache::{CacheSettings, CacheStore},
    upstream::{RewriteOptions, Rewriter, UpstreamError},
    AppState, Config, ToneService,
};
use tower::ServiceExt;

// == Helper Functions ==

/// Rewriter that either tags the text or fails with a fixed error.
struct StubRewriter {
    failure: Option<UpstreamError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubRewriter {
    fn ok() -> Self {
        Self {
            failure: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(error: UpstreamError) -> Self {
        Self {
            failure: Some(error),
            ..Self::ok()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok()
        }
    }
}

#[async_trait]
impl Rewriter for StubRewriter {
    async fn rewrite(
        &self,
        text: &str,
        tone_description: &str,
        _options: &RewriteOptions,
    ) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(format!("{text} ({tone_description})")),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn app_with(rewriter: Arc<StubRewriter>, config: Config) -> Router {
    let store = CacheStore::new(CacheSettings {
        ttl: Duration::from_secs(60),
        max_entries: 100,
        sweep_interval: Duration::from_secs(60),
        enabled: config.cache.enabled,
    });
    let options = RewriteOptions {
        timeout: Duration::from_millis(200),
        ..RewriteOptions::default()
    };
    let service = ToneService::new(store, rewriter, options);
    create_router(AppState::new(service, config))
}

fn create_test_app(rewriter: Arc<StubRewriter>) -> Router {
    app_with(rewriter, Config::default())
}

fn tone_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/tone")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Tone Endpoint Tests ==

#[tokio::test]
async fn test_tone_miss_then_hit() {
    let rewriter = Arc::new(StubRewriter::ok());
    let app = create_test_app(rewriter.clone());
    let body = r#"{"text":"hey, can u send the report?","toneValue":5}"#;

    let response = app.clone().oneshot(tone_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["originalText"], "hey, can u send the report?");
    assert_eq!(
        json["data"]["adjustedText"],
        "hey, can u send the report? (extremely formal and professional with academic language)"
    );
    assert_eq!(json["data"]["toneValue"], 5);
    assert_eq!(json["data"]["cached"], false);

    let response = app.oneshot(tone_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["data"]["cached"], true);

    assert_eq!(rewriter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tone_same_band_different_value_not_shared() {
    let rewriter = Arc::new(StubRewriter::ok());
    let app = create_test_app(rewriter.clone());

    for tone in [45, 46] {
        let body = format!(r#"{{"text":"hello","toneValue":{tone}}}"#);
        let response = app.clone().oneshot(tone_request(&body)).await.unwrap();
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["data"]["cached"], false);
    }

    assert_eq!(rewriter.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_tone_echoes_request_id() {
    let app = create_test_app(Arc::new(StubRewriter::ok()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tone")
        .header("content-type", "application/json")
        .header("x-request-id", "req-123")
        .body(Body::from(r#"{"text":"hello","toneValue":50}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["requestId"], "req-123");
}

#[tokio::test]
async fn test_tone_generates_request_id() {
    let app = create_test_app(Arc::new(StubRewriter::ok()));

    let response = app
        .oneshot(tone_request(r#"{"text":"hello","toneValue":50}"#))
        .await
        .unwrap();

    let header = response.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(!header.is_empty());
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["requestId"], header.as_str());
}

// == Validation Tests ==

#[tokio::test]
async fn test_tone_validation_errors() {
    let rewriter = Arc::new(StubRewriter::ok());
    let app = create_test_app(rewriter.clone());

    let cases = [
        (r#"{"toneValue":50}"#, "Text is required"),
        (r#"{"text":"","toneValue":50}"#, "Text cannot be empty"),
        (r#"{"text":"hi"}"#, "Tone value is required"),
        (r#"{"text":"hi","toneValue":101}"#, "Tone value must be between 0 and 100"),
        (r#"{"text":"hi","toneValue":-3}"#, "Tone value must be between 0 and 100"),
    ];

    for (body, message) in cases {
        let response = app.clone().oneshot(tone_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], 400);
        assert_eq!(json["message"], message, "body {body}");
    }

    assert_eq!(rewriter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_tone_text_too_long() {
    let app = create_test_app(Arc::new(StubRewriter::ok()));
    let body = serde_json::json!({"text": "a".repeat(5001), "toneValue": 10}).to_string();

    let response = app.oneshot(tone_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Text cannot exceed 5000 characters");
}

#[tokio::test]
async fn test_tone_malformed_json() {
    let app = create_test_app(Arc::new(StubRewriter::ok()));

    let response = app.oneshot(tone_request("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["kind"], "invalid_request");
}

// == Upstream Failure Tests ==

#[tokio::test]
async fn test_upstream_failures_map_to_status() {
    let cases = [
        (UpstreamError::RateLimited, StatusCode::TOO_MANY_REQUESTS, "AI service rate limit exceeded"),
        (UpstreamError::Server(503), StatusCode::BAD_GATEWAY, "AI service unavailable"),
        (
            UpstreamError::NotInitialized("no key".to_string()),
            StatusCode::BAD_GATEWAY,
            "AI service unavailable",
        ),
        (
            UpstreamError::Other("bad payload".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to adjust text tone",
        ),
    ];

    for (error, status, message) in cases {
        let app = create_test_app(Arc::new(StubRewriter::failing(error)));
        let response = app
            .oneshot(tone_request(r#"{"text":"hello","toneValue":50}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), status);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["message"], message);
    }
}

#[tokio::test]
async fn test_upstream_timeout() {
    let app = create_test_app(Arc::new(StubRewriter::slow(Duration::from_secs(5))));

    let response = app
        .oneshot(tone_request(r#"{"text":"hello","toneValue":50}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "AI service request timed out");
}

#[tokio::test]
async fn test_failure_is_not_cached() {
    let app = create_test_app(Arc::new(StubRewriter::failing(UpstreamError::Server(500))));

    let response = app
        .clone()
        .oneshot(tone_request(r#"{"text":"hello","toneValue":50}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = app
        .oneshot(empty_request("GET", "/api/v1/tone/cache"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["data"]["size"], 0);
}

#[tokio::test]
async fn test_detail_hidden_in_production() {
    let mut config = Config::default();
    config.server.environment = "production".to_string();
    let app = app_with(
        Arc::new(StubRewriter::failing(UpstreamError::Server(503))),
        config,
    );

    let response = app
        .oneshot(tone_request(r#"{"text":"hello","toneValue":50}"#))
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("detail").is_none());
}

#[tokio::test]
async fn test_detail_exposed_in_development() {
    let app = create_test_app(Arc::new(StubRewriter::failing(UpstreamError::Server(503))));

    let response = app
        .oneshot(tone_request(r#"{"text":"hello","toneValue":50}"#))
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["detail"], "upstream server error: HTTP 503");
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_cache_stats_and_clear() {
    let rewriter = Arc::new(StubRewriter::ok());
    let app = create_test_app(rewriter.clone());

    let body = r#"{"text":"hello","toneValue":50}"#;
    app.clone().oneshot(tone_request(body)).await.unwrap();
    app.clone().oneshot(tone_request(body)).await.unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/tone/cache"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["size"], 1);
    assert_eq!(json["data"]["maxSize"], 100);
    assert_eq!(json["data"]["ttl"], 60_000);
    assert_eq!(json["data"]["enabled"], true);
    assert_eq!(json["data"]["hits"], 1);
    assert_eq!(json["data"]["misses"], 1);
    assert_eq!(json["data"]["hitRate"], 0.5);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/v1/tone/cache"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Cache cleared successfully");

    let response = app.clone().oneshot(tone_request(body)).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["data"]["cached"], false);
    assert_eq!(rewriter.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_disabled_cache_always_calls_upstream() {
    let mut config = Config::default();
    config.cache.enabled = false;
    let rewriter = Arc::new(StubRewriter::ok());
    let app = app_with(rewriter.clone(), config);

    let body = r#"{"text":"hello","toneValue":50}"#;
    for _ in 0..2 {
        let response = app.clone().oneshot(tone_request(body)).await.unwrap();
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["data"]["cached"], false);
    }
    assert_eq!(rewriter.calls.load(Ordering::SeqCst), 2);

    let response = app
        .oneshot(empty_request("GET", "/api/v1/tone/cache"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["data"]["enabled"], false);
    assert_eq!(json["data"]["size"], 0);
}

// == Status and Fallback Tests ==

#[tokio::test]
async fn test_status_endpoint() {
    let app = create_test_app(Arc::new(StubRewriter::ok()));

    let response = app
        .oneshot(empty_request("GET", "/api/v1/status"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "API is operational");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app(Arc::new(StubRewriter::ok()));

    let response = app
        .oneshot(empty_request("GET", "/api/v1/unknown"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], 404);
    assert_eq!(json["message"], "Cannot GET /api/v1/unknown");
}

// == Rate Limit Tests ==

#[tokio::test]
async fn test_rate_limit_rejects_over_limit() {
    let mut config = Config::default();
    config.rate_limit.max_requests = 2;
    let app = app_with(Arc::new(StubRewriter::ok()), config);

    let body = r#"{"text":"hello","toneValue":50}"#;
    for remaining in ["1", "0"] {
        let response = app.clone().oneshot(tone_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["ratelimit-remaining"], remaining);
    }

    let response = app.clone().oneshot(tone_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Too many requests, please try again later");

    // Admin routes have their own, higher limit
    let response = app
        .oneshot(empty_request("GET", "/api/v1/tone/cache"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["ratelimit-limit"], "10");
}
