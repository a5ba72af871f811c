//! Admin question management.

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::models::QuestionRow;
use crate::extractors::AdminGuard;
use crate::models::{AnswerValue, QuestionRole, QuestionType};
use crate::rejections::{AppError, OptionExt, ResultExt};
use crate::{names, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_QUESTIONS_URL, get(list_questions).post(create_question))
        .route(
            &format!("{}/{{id}}", names::ADMIN_QUESTIONS_URL),
            put(update_question).delete(delete_question),
        )
        .route(names::ADMIN_QUESTIONS_REORDER_URL, post(reorder_questions))
}

/// Admin view of a question, correct answer included.
fn question_json(q: &QuestionRow) -> Value {
    json!({
        "id": q.id,
        "content": q.content,
        "question_type": q.question_type,
        "role": q.role,
        "order": q.display_order,
        "options": q.options(),
        "correct_answer": q.correct_answer(),
        "created_at": q.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

async fn list_questions(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let questions = state.db.questions_ordered().await.reject("loading questions")?;
    let payload: Vec<Value> = questions.iter().map(question_json).collect();
    Ok(Json(json!(payload)))
}

#[derive(Deserialize)]
struct QuestionBody {
    content: String,
    question_type: String,
    #[serde(default = "default_role")]
    role: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: Option<AnswerValue>,
}

fn default_role() -> String {
    QuestionRole::Scored.as_str().to_string()
}

impl QuestionBody {
    fn validate(&self) -> Result<(QuestionType, QuestionRole), AppError> {
        if self.content.is_empty() {
            return Err(AppError::Input("問題內容不能為空".to_string()));
        }
        let question_type = QuestionType::parse(&self.question_type)
            .ok_or_else(|| AppError::Input("無效的問題類型".to_string()))?;
        let role = QuestionRole::parse(&self.role)
            .ok_or_else(|| AppError::Input("無效的問題角色".to_string()))?;
        Ok((question_type, role))
    }
}

async fn create_question(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<QuestionBody>,
) -> Result<Json<Value>, AppError> {
    let (question_type, role) = body.validate()?;

    let question = state
        .db
        .create_question(
            &body.content,
            question_type,
            role,
            &body.options,
            body.correct_answer.as_ref(),
        )
        .await
        .reject("creating question")?;

    Ok(Json(json!({ "success": true, "question": question_json(&question) })))
}

async fn update_question(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<QuestionBody>,
) -> Result<Json<Value>, AppError> {
    let (question_type, role) = body.validate()?;

    let question = state
        .db
        .update_question(
            id,
            &body.content,
            question_type,
            role,
            &body.options,
            body.correct_answer.as_ref(),
        )
        .await
        .reject("updating question")?
        .or_not_found("問題不存在")?;

    Ok(Json(json!({ "success": true, "question": question_json(&question) })))
}

async fn delete_question(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let deleted = state.db.delete_question(id).await.reject("deleting question")?;
    if !deleted {
        return Err(AppError::NotFound("問題不存在"));
    }

    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
struct ReorderBody {
    questions: Vec<ReorderEntry>,
}

#[derive(Deserialize)]
struct ReorderEntry {
    id: i64,
    order: i64,
}

async fn reorder_questions(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Value>, AppError> {
    let orders: Vec<(i64, i64)> = body.questions.iter().map(|e| (e.id, e.order)).collect();
    state
        .db
        .reorder_questions(&orders)
        .await
        .reject("reordering questions")?;

    Ok(Json(json!({ "success": true })))
}
