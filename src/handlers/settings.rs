//! Admin scoring-band and recommendation-setting management.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::models::{RecommendationSettingRow, ScoreBandRow};
use crate::extractors::AdminGuard;
use crate::rejections::{AppError, OptionExt, ResultExt};
use crate::{names, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            names::ADMIN_SCORE_SETTINGS_URL,
            get(list_score_bands).post(create_score_band),
        )
        .route(
            &format!("{}/{{id}}", names::ADMIN_SCORE_SETTINGS_URL),
            axum::routing::put(update_score_band).delete(delete_score_band),
        )
        .route(
            names::ADMIN_RECOMMENDATION_SETTINGS_URL,
            get(list_reco_settings).post(create_reco_setting),
        )
        .route(
            &format!("{}/{{id}}", names::ADMIN_RECOMMENDATION_SETTINGS_URL),
            axum::routing::put(update_reco_setting).delete(delete_reco_setting),
        )
        .route(
            &format!("{}/{{id}}/activate", names::ADMIN_RECOMMENDATION_SETTINGS_URL),
            post(activate_reco_setting),
        )
}

// ----- score bands ----------------------------------------------------------

fn band_json(band: &ScoreBandRow) -> Value {
    json!({
        "id": band.id,
        "level_name": band.level_name,
        "min_score": band.min_score,
        "max_score": band.max_score,
        "description": band.description,
        "is_active": band.is_active,
        "display_order": band.display_order,
        "created_at": band.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "updated_at": band.updated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

async fn list_score_bands(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let bands = state.db.score_bands_ordered().await.reject("loading score bands")?;
    let payload: Vec<Value> = bands.iter().map(band_json).collect();
    Ok(Json(json!({ "success": true, "settings": payload })))
}

#[derive(Deserialize)]
struct ScoreBandBody {
    level_name: Option<String>,
    min_score: Option<i64>,
    max_score: Option<i64>,
    description: Option<String>,
    is_active: Option<bool>,
    display_order: Option<i64>,
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Input(format!("缺少必填欄位: {field}")))
}

/// Rejects a band whose range intersects another active band.
async fn check_overlap(
    state: &AppState,
    min_score: i64,
    max_score: i64,
    exclude_id: i64,
) -> Result<(), AppError> {
    if let Some(level) = state
        .db
        .overlapping_band(min_score, max_score, exclude_id)
        .await
        .reject("checking band overlap")?
    {
        return Err(AppError::Input(format!("分數範圍與「{level}」重疊")));
    }
    Ok(())
}

async fn create_score_band(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<ScoreBandBody>,
) -> Result<Json<Value>, AppError> {
    let level_name = require(body.level_name, "level_name")?;
    let min_score = require(body.min_score, "min_score")?;
    let max_score = require(body.max_score, "max_score")?;
    let is_active = body.is_active.unwrap_or(true);

    if min_score >= max_score {
        return Err(AppError::Input("最低分數必須小於最高分數".to_string()));
    }
    if is_active {
        check_overlap(&state, min_score, max_score, 0).await?;
    }

    let band = state
        .db
        .create_score_band(
            &level_name,
            min_score,
            max_score,
            body.description.as_deref(),
            is_active,
            body.display_order,
        )
        .await
        .reject("creating score band")?;

    Ok(Json(json!({
        "success": true,
        "message": "評分設定創建成功",
        "setting_id": band.id,
    })))
}

async fn update_score_band(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ScoreBandBody>,
) -> Result<Json<Value>, AppError> {
    let existing = state
        .db
        .score_band(id)
        .await
        .reject("loading score band")?
        .or_not_found("評分設定不存在")?;

    let level_name = body.level_name.unwrap_or(existing.level_name);
    let min_score = body.min_score.unwrap_or(existing.min_score);
    let max_score = body.max_score.unwrap_or(existing.max_score);
    let description = body.description.or(existing.description);
    let is_active = body.is_active.unwrap_or(existing.is_active);
    let display_order = body.display_order.unwrap_or(existing.display_order);

    if min_score >= max_score {
        return Err(AppError::Input("最低分數必須小於最高分數".to_string()));
    }
    if is_active {
        check_overlap(&state, min_score, max_score, id).await?;
    }

    state
        .db
        .update_score_band(
            id,
            &level_name,
            min_score,
            max_score,
            description.as_deref(),
            is_active,
            display_order,
        )
        .await
        .reject("updating score band")?;

    Ok(Json(json!({ "success": true, "message": "評分設定更新成功" })))
}

async fn delete_score_band(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let deleted = state.db.delete_score_band(id).await.reject("deleting score band")?;
    if !deleted {
        return Err(AppError::NotFound("評分設定不存在"));
    }

    Ok(Json(json!({ "success": true, "message": "評分設定刪除成功" })))
}

// ----- recommendation settings ----------------------------------------------

fn setting_json(setting: &RecommendationSettingRow) -> Value {
    json!({
        "id": setting.id,
        "setting_name": setting.setting_name,
        "min_courses": setting.min_courses,
        "max_courses": setting.max_courses,
        "is_active": setting.is_active,
        "description": setting.description,
        "created_at": setting.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "updated_at": setting.updated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

fn check_course_count(value: i64, message: &str) -> Result<(), AppError> {
    if !(0..=names::COURSE_COUNT_LIMIT).contains(&value) {
        return Err(AppError::Input(message.to_string()));
    }
    Ok(())
}

async fn list_reco_settings(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let settings = state
        .db
        .recommendation_settings()
        .await
        .reject("loading recommendation settings")?;
    let payload: Vec<Value> = settings.iter().map(setting_json).collect();
    Ok(Json(json!(payload)))
}

#[derive(Deserialize)]
struct RecoSettingBody {
    setting_name: Option<String>,
    min_courses: Option<i64>,
    max_courses: Option<i64>,
    is_active: Option<bool>,
    description: Option<String>,
}

async fn create_reco_setting(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<RecoSettingBody>,
) -> Result<Json<Value>, AppError> {
    let setting_name = body.setting_name.unwrap_or_default();
    if setting_name.trim().is_empty() {
        return Err(AppError::Input("設定名稱不能為空".to_string()));
    }

    let min_courses = body.min_courses.unwrap_or(names::DEFAULT_MIN_COURSES);
    let max_courses = body.max_courses.unwrap_or(names::DEFAULT_MAX_COURSES);
    check_course_count(min_courses, "課程數量必須在0-100範圍內")?;
    check_course_count(max_courses, "課程數量必須在0-100範圍內")?;
    if min_courses > max_courses {
        return Err(AppError::Input("最少課程數量不能大於最多課程數量".to_string()));
    }

    let taken = state
        .db
        .recommendation_setting_name_taken(&setting_name, 0)
        .await
        .reject("checking setting name")?;
    if taken {
        return Err(AppError::Input("設定名稱已存在".to_string()));
    }

    let setting = state
        .db
        .create_recommendation_setting(
            &setting_name,
            min_courses,
            max_courses,
            body.is_active.unwrap_or(false),
            body.description.as_deref(),
        )
        .await
        .reject("creating recommendation setting")?;

    Ok(Json(json!({
        "success": true,
        "message": "推薦設定創建成功",
        "setting": setting_json(&setting),
    })))
}

async fn update_reco_setting(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<RecoSettingBody>,
) -> Result<Json<Value>, AppError> {
    let existing = state
        .db
        .recommendation_setting(id)
        .await
        .reject("loading recommendation setting")?
        .or_not_found("推薦設定不存在")?;

    let setting_name = match body.setting_name {
        Some(name) => {
            if name.trim().is_empty() {
                return Err(AppError::Input("設定名稱不能為空".to_string()));
            }
            if name != existing.setting_name {
                let taken = state
                    .db
                    .recommendation_setting_name_taken(&name, id)
                    .await
                    .reject("checking setting name")?;
                if taken {
                    return Err(AppError::Input("設定名稱已存在".to_string()));
                }
            }
            name
        }
        None => existing.setting_name,
    };

    let min_courses = body.min_courses.unwrap_or(existing.min_courses);
    let max_courses = body.max_courses.unwrap_or(existing.max_courses);
    check_course_count(min_courses, "最少課程數量必須在0-100範圍內")?;
    check_course_count(max_courses, "最多課程數量必須在0-100範圍內")?;
    if min_courses > max_courses {
        return Err(AppError::Input("最少課程數量不能大於最多課程數量".to_string()));
    }

    state
        .db
        .update_recommendation_setting(
            id,
            &setting_name,
            min_courses,
            max_courses,
            body.is_active.unwrap_or(existing.is_active),
            body.description.or(existing.description).as_deref(),
        )
        .await
        .reject("updating recommendation setting")?;

    let setting = state
        .db
        .recommendation_setting(id)
        .await
        .reject("loading recommendation setting")?
        .or_not_found("推薦設定不存在")?;

    Ok(Json(json!({
        "success": true,
        "message": "推薦設定更新成功",
        "setting": setting_json(&setting),
    })))
}

async fn delete_reco_setting(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let existing = state
        .db
        .recommendation_setting(id)
        .await
        .reject("loading recommendation setting")?
        .or_not_found("推薦設定不存在")?;

    if existing.setting_name == names::DEFAULT_SETTING_NAME {
        return Err(AppError::Input("不能刪除默認設定".to_string()));
    }

    state
        .db
        .delete_recommendation_setting(id)
        .await
        .reject("deleting recommendation setting")?;

    Ok(Json(json!({ "success": true, "message": "推薦設定刪除成功" })))
}

async fn activate_reco_setting(
    AdminGuard(_): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let setting = state
        .db
        .activate_recommendation_setting(id)
        .await
        .reject("activating recommendation setting")?
        .or_not_found("推薦設定不存在")?;

    Ok(Json(json!({
        "success": true,
        "message": format!("推薦設定 \"{}\" 已啟用", setting.setting_name),
        "active_setting": {
            "id": setting.id,
            "setting_name": setting.setting_name,
            "min_courses": setting.min_courses,
            "max_courses": setting.max_courses,
        },
    })))
}
