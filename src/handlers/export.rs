//! Report export endpoints. Both exporters return the document as a base64
//! payload in a JSON envelope; the admin frontend turns it into a download.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};

use crate::export::ReportData;
use crate::extractors::AdminGuard;
use crate::models::QuestionRole;
use crate::rejections::{AppError, ResultExt};
use crate::stats::QuestionStat;
use crate::{export, names, stats, AppState};

use super::DateRange;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            names::ADMIN_EXPORT_EXCEL_URL,
            get(export_excel_get).post(export_excel_post),
        )
        .route(
            names::ADMIN_EXPORT_POWERPOINT_URL,
            get(export_powerpoint_get).post(export_powerpoint_post),
        )
}

struct Report {
    period: String,
    total_responses: usize,
    total_questions: usize,
    avg_score: f64,
    observed_buckets: Vec<stats::ScoreBucket>,
    breakdown: Vec<QuestionStat>,
}

impl Report {
    fn data(&self) -> ReportData<'_> {
        ReportData {
            period: self.period.clone(),
            total_responses: self.total_responses,
            total_questions: self.total_questions,
            avg_score: self.avg_score,
            observed_buckets: &self.observed_buckets,
            breakdown: &self.breakdown,
        }
    }
}

/// Aggregates everything both exporters render, over an optional date range.
async fn build_report(state: &AppState, range: &DateRange) -> Result<Report, AppError> {
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

    let observed_buckets = stats::score_distribution(&scores, max_score)
        .into_iter()
        .filter(|bucket| bucket.count > 0)
        .collect();

    let period = format!(
        "{} 至 {}",
        range.start_date.as_deref().unwrap_or("開始"),
        range.end_date.as_deref().unwrap_or("現在"),
    );

    Ok(Report {
        period,
        total_responses: stats::distinct_sessions(&responses),
        total_questions: questions.len(),
        avg_score: stats::round1(stats::average_score(&scores)),
        observed_buckets,
        breakdown: stats::question_breakdown(&questions, &responses),
    })
}

fn envelope(bytes: Vec<u8>, extension: &str) -> Json<Value> {
    let filename = chrono::Local::now()
        .format(&format!("攝影問卷統計_%Y%m%d_%H%M%S.{extension}"))
        .to_string();

    Json(json!({
        "success": true,
        "data": BASE64.encode(bytes),
        "filename": filename,
    }))
}

async fn export_excel(state: &AppState, range: &DateRange) -> Result<Json<Value>, AppError> {
    let report = build_report(state, range).await?;
    let bytes = export::build_excel(&report.data()).reject("building excel report")?;

    tracing::info!("excel report exported ({} sessions)", report.total_responses);
    Ok(envelope(bytes, "xlsx"))
}

async fn export_powerpoint(state: &AppState, range: &DateRange) -> Result<Json<Value>, AppError> {
    let report = build_report(state, range).await?;
    let bytes = export::build_powerpoint(&report.data()).reject("building powerpoint report")?;

    tracing::info!("powerpoint report exported ({} sessions)", report.total_responses);
    Ok(envelope(bytes, "pptx"))
}

async fn export_excel_get(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<Value>, AppError> {
    export_excel(&state, &range).await
}

async fn export_excel_post(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    body: Option<Json<DateRange>>,
) -> Result<Json<Value>, AppError> {
    let range = body.map(|Json(range)| range).unwrap_or_default();
    export_excel(&state, &range).await
}

async fn export_powerpoint_get(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> Result<Json<Value>, AppError> {
    export_powerpoint(&state, &range).await
}

async fn export_powerpoint_post(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    body: Option<Json<DateRange>>,
) -> Result<Json<Value>, AppError> {
    let range = body.map(|Json(range)| range).unwrap_or_default();
    export_powerpoint(&state, &range).await
}
