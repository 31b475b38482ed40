//! Read queries for the `feedback` table.

use chrono::{DateTime, Utc};
use feedsent_core::{FeedbackFilters, FeedbackRecord};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::DbError;

/// A row from the `feedback` table, as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedbackRow {
    pub rating: f64,
    pub sentiment: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub language: Option<String>,
    pub unique_code: Option<String>,
    pub comment: Option<String>,
}

impl From<FeedbackRow> for FeedbackRecord {
    fn from(row: FeedbackRow) -> Self {
        Self {
            rating: row.rating,
            // Unrecognized labels are treated as unscored.
            sentiment: row.sentiment.as_deref().and_then(|s| s.parse().ok()),
            timestamp: row.timestamp,
            language: row.language,
            unique_code: row.unique_code,
            comment: row.comment,
        }
    }
}

/// Append the `WHERE` clause for `filters`. Every filter is ANDed; ranges are inclusive.
fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filters: &FeedbackFilters) {
    query.push(" WHERE TRUE");

    if !filters.languages.is_empty() {
        query
            .push(" AND language = ANY(")
            .push_bind(filters.languages.clone())
            .push(")");
    }
    if !filters.sentiments.is_empty() {
        let labels: Vec<String> = filters
            .sentiments
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        query
            .push(" AND sentiment = ANY(")
            .push_bind(labels)
            .push(")");
    }
    if let Some((min, max)) = filters.rating_range {
        query
            .push(" AND rating BETWEEN ")
            .push_bind(min)
            .push(" AND ")
            .push_bind(max);
    }
    if let Some((from, to)) = filters.date_range {
        query
            .push(" AND timestamp BETWEEN ")
            .push_bind(from)
            .push(" AND ")
            .push_bind(to);
    }
}

/// List feedback matching `filters`, newest first.
///
/// `limit` of `None` returns every matching row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_feedback(
    pool: &PgPool,
    filters: &FeedbackFilters,
    limit: Option<i64>,
) -> Result<Vec<FeedbackRecord>, DbError> {
    let mut query = QueryBuilder::<Postgres>::new(
        "SELECT rating, sentiment, timestamp, language, unique_code, comment \
         FROM feedback",
    );
    push_filters(&mut query, filters);
    query.push(" ORDER BY timestamp DESC");
    if let Some(limit) = limit {
        query.push(" LIMIT ").push_bind(limit);
    }

    let rows = query
        .build_query_as::<FeedbackRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(FeedbackRecord::from).collect())
}

/// Distinct non-null languages present in the table, sorted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_languages(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let languages = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT language FROM feedback WHERE language IS NOT NULL ORDER BY language",
    )
    .fetch_all(pool)
    .await?;
    Ok(languages)
}
