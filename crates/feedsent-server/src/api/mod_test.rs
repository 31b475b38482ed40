use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use feedsent_sentiment::{ClassifierArtifact, EmojiLexicon, LanguageError, LanguageService};
use tower::ServiceExt;

use super::*;

const MODEL: &str = include_str!("../../../feedsent-sentiment/tests/fixtures/tiny_model.json");

/// Everything is English; translation is never needed.
struct EnglishOnly;

#[async_trait]
impl LanguageService for EnglishOnly {
    async fn detect(&self, _text: &str) -> Result<String, LanguageError> {
        Ok("en".to_string())
    }

    async fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, LanguageError> {
        Ok(text.to_string())
    }
}

fn test_pipeline() -> Arc<SentimentPipeline> {
    let classifier = ClassifierArtifact::from_json_str(MODEL).expect("fixture artifact");
    Arc::new(SentimentPipeline::new(
        Arc::new(EmojiLexicon::builtin()),
        Arc::new(classifier),
        Arc::new(EnglishOnly),
    ))
}

fn app_without_db() -> Router {
    build_app(AppState {
        pipeline: test_pipeline(),
        pool: None,
    })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict_feedback")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 50);
    assert_eq!(normalize_limit(Some(0)), 1);
    assert_eq!(normalize_limit(Some(10_000)), 500);
    assert_eq!(normalize_limit(Some(25)), 25);
}

#[test]
fn api_error_codes_map_to_status() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("service_unavailable", StatusCode::SERVICE_UNAVAILABLE),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[tokio::test]
async fn predict_feedback_returns_comment_and_label() {
    let response = app_without_db()
        .oneshot(predict_request(r#"{"comment": "I love this!! 😊"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({ "comment": "I love this!! 😊", "sentiment": "positive" })
    );
}

#[tokio::test]
async fn predict_feedback_accepts_empty_comment() {
    let response = app_without_db()
        .oneshot(predict_request(r#"{"comment": ""}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["sentiment"], "neutral");
}

#[tokio::test]
async fn predict_feedback_rejects_missing_comment() {
    let response = app_without_db()
        .oneshot(predict_request(r#"{"text": "hello"}"#))
        .await
        .expect("response");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn predict_feedback_rejects_malformed_json() {
    let response = app_without_db()
        .oneshot(predict_request("{not json"))
        .await
        .expect("response");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn health_reports_disabled_database() {
    let response = app_without_db()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({ "status": "ok", "database": "disabled" })
    );
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let response = app_without_db()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("trace-123")
    );
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let response = app_without_db()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/predict_feedback")
                .header("origin", "https://dashboard.example.com")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn dashboard_routes_need_a_database() {
    for uri in [
        "/api/v1/feedback",
        "/api/v1/feedback/summary",
        "/api/v1/feedback/languages",
    ] {
        let response = app_without_db()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "service_unavailable");
        assert!(json["meta"]["request_id"].is_string());
    }
}

#[tokio::test]
async fn invalid_filter_is_rejected_before_touching_the_database() {
    let response = app_without_db()
        .oneshot(
            Request::builder()
                .uri("/api/v1/feedback?sentiment=furious")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
}

async fn seed_feedback(pool: &sqlx::PgPool) {
    for (rating, sentiment, language, comment) in [
        (5.0_f64, "positive", "en", "Great app 😊"),
        (1.0, "negative", "fr", "Nul"),
        (3.0, "neutral", "en", "ok"),
    ] {
        sqlx::query(
            "INSERT INTO feedback (rating, sentiment, timestamp, language, unique_code, comment) \
             VALUES ($1, $2, NOW(), $3, $4, $5)",
        )
        .bind(rating)
        .bind(sentiment)
        .bind(language)
        .bind(format!("user-{comment}"))
        .bind(comment)
        .execute(pool)
        .await
        .expect("insert feedback");
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn feedback_list_applies_filters(pool: sqlx::PgPool) {
    seed_feedback(&pool).await;

    let app = build_app(AppState {
        pipeline: test_pipeline(),
        pool: Some(pool),
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/feedback?language=en&rating_min=4")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["comment"], "Great app 😊");
    assert_eq!(data[0]["sentiment"], "positive");
}

#[sqlx::test(migrations = "../../migrations")]
async fn feedback_summary_counts_sentiments(pool: sqlx::PgPool) {
    seed_feedback(&pool).await;

    let app = build_app(AppState {
        pipeline: test_pipeline(),
        pool: Some(pool),
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/feedback/summary")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_comments"], 3);
    assert_eq!(json["data"]["sentiment_counts"]["negative"], 1);
    assert_eq!(json["data"]["emoji_comment_count"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_reports_database_ok(pool: sqlx::PgPool) {
    let app = build_app(AppState {
        pipeline: test_pipeline(),
        pool: Some(pool),
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["database"], "ok");
}
