//! Live integration tests for feedsent-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. `"../../migrations"` is relative to `crates/feedsent-db/`.

use chrono::{DateTime, TimeZone, Utc};
use feedsent_core::{FeedbackFilters, SentimentLabel};
use feedsent_db::{health_check, list_feedback, list_languages};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

async fn insert_feedback(
    pool: &sqlx::PgPool,
    rating: f64,
    sentiment: Option<&str>,
    timestamp: DateTime<Utc>,
    language: Option<&str>,
    comment: &str,
) {
    sqlx::query(
        "INSERT INTO feedback (rating, sentiment, timestamp, language, unique_code, comment) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(rating)
    .bind(sentiment)
    .bind(timestamp)
    .bind(language)
    .bind(format!("user-{comment}"))
    .bind(comment)
    .execute(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_feedback failed for '{comment}': {e}"));
}

async fn seed(pool: &sqlx::PgPool) {
    insert_feedback(pool, 5.0, Some("positive"), at(1, 9), Some("en"), "great").await;
    insert_feedback(pool, 2.0, Some("negative"), at(2, 10), Some("fr"), "nul").await;
    insert_feedback(pool, 3.0, Some("neutral"), at(3, 11), Some("en"), "ok").await;
    insert_feedback(pool, 4.0, None, at(4, 12), None, "unscored").await;
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_check_succeeds(pool: sqlx::PgPool) {
    health_check(&pool).await.expect("health check should pass");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_without_filters_returns_newest_first(pool: sqlx::PgPool) {
    seed(&pool).await;

    let rows = list_feedback(&pool, &FeedbackFilters::default(), None)
        .await
        .expect("list should succeed");

    let comments: Vec<_> = rows.iter().filter_map(|r| r.comment.as_deref()).collect();
    assert_eq!(comments, ["unscored", "ok", "nul", "great"]);
    assert!(rows[0].sentiment.is_none());
    assert_eq!(rows[3].sentiment, Some(SentimentLabel::Positive));
    assert!((rows[3].rating - 5.0).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "../../migrations")]
async fn limit_caps_row_count(pool: sqlx::PgPool) {
    seed(&pool).await;

    let rows = list_feedback(&pool, &FeedbackFilters::default(), Some(2))
        .await
        .expect("list should succeed");
    assert_eq!(rows.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn language_and_sentiment_filters_combine(pool: sqlx::PgPool) {
    seed(&pool).await;

    let filters = FeedbackFilters {
        languages: vec!["en".to_string()],
        sentiments: vec![SentimentLabel::Positive, SentimentLabel::Negative],
        ..FeedbackFilters::default()
    };
    let rows = list_feedback(&pool, &filters, None)
        .await
        .expect("list should succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].comment.as_deref(), Some("great"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn ranges_are_inclusive(pool: sqlx::PgPool) {
    seed(&pool).await;

    let filters = FeedbackFilters {
        rating_range: Some((2.0, 4.0)),
        date_range: Some((at(2, 10), at(4, 12))),
        ..FeedbackFilters::default()
    };
    let rows = list_feedback(&pool, &filters, None)
        .await
        .expect("list should succeed");

    let comments: Vec<_> = rows.iter().filter_map(|r| r.comment.as_deref()).collect();
    assert_eq!(comments, ["unscored", "ok", "nul"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn languages_are_distinct_and_sorted(pool: sqlx::PgPool) {
    seed(&pool).await;

    let languages = list_languages(&pool).await.expect("query should succeed");
    assert_eq!(languages, ["en", "fr"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn fractional_rating_matches_at_both_bounds(pool: sqlx::PgPool) {
    insert_feedback(&pool, 3.7, Some("positive"), at(5, 9), Some("en"), "decent").await;
    insert_feedback(&pool, 4.0, Some("positive"), at(5, 10), Some("en"), "good").await;

    let filters = FeedbackFilters {
        rating_range: Some((3.7, 3.7)),
        ..FeedbackFilters::default()
    };
    let rows = list_feedback(&pool, &filters, None)
        .await
        .expect("list should succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].comment.as_deref(), Some("decent"));
    assert_eq!(rows[0].rating, 3.7);
}
