//! Admin statistics endpoints and response clearing.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::extractors::AdminGuard;
use crate::models::QuestionRole;
use crate::rejections::{AppError, ResultExt};
use crate::{names, stats, AppState};

use super::DateRange;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_STATS_URL, get(overview_stats))
        .route(names::ADMIN_REAL_TIME_STATS_URL, get(real_time_stats))
        .route(names::ADMIN_DETAILED_STATS_URL, get(detailed_stats))
        .route(names::ADMIN_CLEAR_DATA_URL, post(clear_data))
}

async fn overview_stats(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let responses = state
        .db
        .responses_filtered(None, None)
        .await
        .reject("loading responses")?;
    let questions = state.db.questions_ordered().await.reject("loading questions")?;

    let scores = stats::session_scores(&responses);

    Ok(Json(json!({
        "total_responses": stats::distinct_sessions(&responses),
        "total_questions": questions.len(),
        "avg_score": stats::round1(stats::average_score(&scores)),
    })))
}

async fn real_time_stats(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let responses = state
        .db
        .responses_filtered(None, None)
        .await
        .reject("loading responses")?;
    let questions = state.db.questions_ordered().await.reject("loading questions")?;

    Ok(Json(json!({
        "total_responses": stats::distinct_sessions(&responses),
        "question_stats": stats::question_breakdown(&questions, &responses),
    })))
}

async fn detailed_stats(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<Value>, AppError> {
    let (start, end) = range.parse()?;

    let responses = state
        .db
        .responses_filtered(start, end)
        .await
        .reject("loading responses")?;
    let questions = state.db.questions_ordered().await.reject("loading questions")?;

    let scores = stats::session_scores(&responses);
    let max_score = questions
        .iter()
        .filter(|q| q.role() == QuestionRole::Scored)
        .count() as i64;

    Ok(Json(json!({
        "total_responses": stats::distinct_sessions(&responses),
        "question_stats": stats::question_breakdown(&questions, &responses),
        "score_distribution": stats::score_distribution(&scores, max_score),
    })))
}

#[derive(Deserialize)]
struct ClearBody {
    #[serde(flatten)]
    range: DateRange,
    #[serde(default)]
    clear_all: bool,
}

async fn clear_data(
    AdminGuard(ctx): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<ClearBody>,
) -> Result<Json<Value>, AppError> {
    let deleted = if body.clear_all {
        state.db.clear_all_responses().await.reject("clearing responses")?
    } else {
        let (start, end) = body.range.parse()?;
        state
            .db
            .clear_responses(start, end)
            .await
            .reject("clearing responses")?
    };

    tracing::info!("admin {} cleared {deleted} responses", ctx.username);

    Ok(Json(json!({ "success": true, "deleted_count": deleted })))
}
