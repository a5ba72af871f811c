//! Admin course catalog management.

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::models::CourseRow;
use crate::extractors::AdminGuard;
use crate::rejections::{AppError, OptionExt, ResultExt};
use crate::{names, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_COURSES_URL, get(list_courses).post(create_course))
        .route(
            &format!("{}/{{id}}", names::ADMIN_COURSES_URL),
            put(update_course).delete(delete_course),
        )
}

fn course_json(c: &CourseRow) -> Value {
    json!({
        "id": c.id,
        "title": c.title,
        "category": c.category,
        "description": c.description,
        "level": c.level,
        "is_active": c.is_active,
        "interest_tags": c.interest_tags(),
        "created_at": c.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

async fn list_courses(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let courses = state.db.all_courses().await.reject("loading courses")?;
    let payload: Vec<Value> = courses.iter().map(course_json).collect();
    Ok(Json(json!(payload)))
}

#[derive(Deserialize)]
struct CourseBody {
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    level: String,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    interest_tags: Vec<String>,
}

fn default_active() -> bool {
    true
}

async fn create_course(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<CourseBody>,
) -> Result<Json<Value>, AppError> {
    if body.title.is_empty() {
        return Err(AppError::Input("課程標題不能為空".to_string()));
    }

    let course = state
        .db
        .create_course(
            &body.title,
            &body.category,
            &body.description,
            &body.level,
            body.is_active,
            &body.interest_tags,
        )
        .await
        .reject("creating course")?;

    Ok(Json(json!({ "success": true, "course": course_json(&course) })))
}

async fn update_course(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CourseBody>,
) -> Result<Json<Value>, AppError> {
    if body.title.is_empty() {
        return Err(AppError::Input("課程標題不能為空".to_string()));
    }

    let course = state
        .db
        .update_course(
            id,
            &body.title,
            &body.category,
            &body.description,
            &body.level,
            body.is_active,
            &body.interest_tags,
        )
        .await
        .reject("updating course")?
        .or_not_found("課程不存在")?;

    Ok(Json(json!({ "success": true, "course": course_json(&course) })))
}

async fn delete_course(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let deleted = state.db.delete_course(id).await.reject("deleting course")?;
    if !deleted {
        return Err(AppError::NotFound("課程不存在"));
    }

    Ok(Json(json!({ "success": true })))
}
