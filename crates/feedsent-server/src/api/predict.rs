use axum::{extract::State, Extension, Json};
use feedsent_sentiment::PipelineResult;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct PredictRequest {
    pub comment: String,
}

/// Score one comment. Never fails once the body parses: provider errors
/// degrade inside the pipeline.
pub(super) async fn predict_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<PredictRequest>,
) -> Json<PipelineResult> {
    let result = state.pipeline.score(&request.comment).await;
    tracing::info!(
        request_id = %req_id.0,
        sentiment = %result.sentiment,
        chars = request.comment.chars().count(),
        "scored feedback comment"
    );
    Json(result)
}
