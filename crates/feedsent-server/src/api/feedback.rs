use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use feedsent_core::{summarize, FeedbackFilters, FeedbackRecord, FeedbackSummary, SentimentLabel};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, require_pool, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Default, Deserialize)]
pub(super) struct FeedbackQuery {
    /// Comma-separated language codes.
    pub language: Option<String>,
    /// Comma-separated sentiment labels.
    pub sentiment: Option<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (start of day).
    pub from: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (end of day).
    pub to: Option<String>,
    pub limit: Option<i64>,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("'{raw}' is not an RFC 3339 timestamp or YYYY-MM-DD date"))?;
    let time = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    };
    time.map(|t| date.and_time(t).and_utc())
        .ok_or_else(|| format!("'{raw}' is out of range"))
}

impl FeedbackQuery {
    /// Translate query parameters into store filters.
    ///
    /// A one-sided range is open on the missing side.
    pub(super) fn to_filters(&self) -> Result<FeedbackFilters, String> {
        let sentiments = split_list(self.sentiment.as_deref())
            .iter()
            .map(|s| s.parse::<SentimentLabel>().map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        let rating_range = match (self.rating_min, self.rating_max) {
            (None, None) => None,
            (min, max) => {
                let min = min.unwrap_or(f64::MIN);
                let max = max.unwrap_or(f64::MAX);
                if min > max {
                    return Err(format!("rating_min {min} is greater than rating_max {max}"));
                }
                Some((min, max))
            }
        };

        let date_range = match (self.from.as_deref(), self.to.as_deref()) {
            (None, None) => None,
            (from, to) => {
                let from = from
                    .map(|raw| parse_bound(raw, false))
                    .transpose()?
                    .unwrap_or(DateTime::UNIX_EPOCH);
                let to = to
                    .map(|raw| parse_bound(raw, true))
                    .transpose()?
                    .unwrap_or_else(Utc::now);
                if from > to {
                    return Err("'from' is after 'to'".to_string());
                }
                Some((from, to))
            }
        };

        Ok(FeedbackFilters {
            languages: split_list(self.language.as_deref()),
            sentiments,
            rating_range,
            date_range,
        })
    }
}

fn filters_or_400(query: &FeedbackQuery, request_id: &str) -> Result<FeedbackFilters, ApiError> {
    query
        .to_filters()
        .map_err(|message| ApiError::new(request_id, "validation_error", message))
}

pub(super) async fn list_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<ApiResponse<Vec<FeedbackRecord>>>, ApiError> {
    let filters = filters_or_400(&query, &req_id.0)?;
    let pool = require_pool(&state, &req_id.0)?;

    let data = feedsent_db::list_feedback(&pool, &filters, Some(normalize_limit(query.limit)))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn feedback_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<ApiResponse<FeedbackSummary>>, ApiError> {
    let filters = filters_or_400(&query, &req_id.0)?;
    let pool = require_pool(&state, &req_id.0)?;

    let records = feedsent_db::list_feedback(&pool, &filters, None)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: summarize(&records, Utc::now()),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_languages(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let pool = require_pool(&state, &req_id.0)?;

    let data = feedsent_db::list_languages(&pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
