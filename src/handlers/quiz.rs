//! Public quiz surface: question delivery and submission grading.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use ulid::Ulid;

use crate::db::NewResponse;
use crate::models::{QuestionRole, SubmitResult, SubmittedAnswer};
use crate::rejections::{AppError, ResultExt};
use crate::{names, recommend, scoring, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::QUESTIONS_URL, get(get_questions))
        .route(names::SUBMIT_URL, post(submit_quiz))
}

/// Questions in display order, without their correct answers.
async fn get_questions(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let questions = state.db.questions_ordered().await.reject("loading questions")?;

    let payload: Vec<Value> = questions
        .iter()
        .map(|q| {
            json!({
                "id": q.id,
                "content": q.content,
                "question_type": q.question_type,
                "role": q.role,
                "order": q.display_order,
                "options": q.options(),
            })
        })
        .collect();

    Ok(Json(json!(payload)))
}

/// Grades a submission, persists it under a fresh session id and responds
/// with the score, the resolved level and the recommended courses.
async fn submit_quiz(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<SubmitResult>, AppError> {
    let Some(raw_answers) = body.get("answers").and_then(Value::as_array) else {
        return Err(AppError::Input("無效的請求數據".to_string()));
    };

    if let Some(other_inputs) = body.get("other_inputs") {
        if !other_inputs.is_null() {
            tracing::info!("用戶自定義輸入: {other_inputs}");
        }
    }

    let answers: Vec<SubmittedAnswer> = raw_answers
        .iter()
        .filter_map(|value| serde_json::from_value(value.clone()).ok())
        .collect();

    let questions = state.db.questions_by_id().await.reject("loading questions")?;

    let mut score = 0;
    let mut max_score = 0;
    let mut rows = Vec::with_capacity(answers.len());

    for answer in &answers {
        let Some(question) = questions.get(&answer.question_id) else {
            tracing::warn!("answer for unknown question {} dropped", answer.question_id);
            continue;
        };

        let is_correct = scoring::grade(question, &answer.answer);
        if question.role() == QuestionRole::Scored {
            max_score += 1;
            if is_correct == Some(true) {
                score += 1;
            }
        }

        rows.push(NewResponse {
            question_id: answer.question_id,
            answer: answer.answer.clone(),
            is_correct,
        });
    }

    let session_id = Ulid::new().to_string();
    state
        .db
        .insert_responses(&session_id, &rows)
        .await
        .reject("storing responses")?;

    let percentage = if max_score > 0 {
        crate::stats::round1(score as f64 / max_score as f64 * 100.0)
    } else {
        0.0
    };

    let level = state.db.user_level_by_score(score).await;
    let recommended_courses = recommend::recommended_courses(&state.db, &answers).await;

    tracing::info!("session {session_id} scored {score}/{max_score}, level {level:?}");

    Ok(Json(SubmitResult {
        session_id,
        score,
        max_score,
        percentage,
        level_color: names::level_color(&level),
        level,
        recommended_courses,
    }))
}
