//! Admin authentication and profile management.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::extractors::AdminGuard;
use crate::rejections::{AppError, OptionExt, ResultExt};
use crate::{names, utils, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_LOGIN_URL, post(login))
        .route(names::ADMIN_LOGOUT_URL, post(logout))
        .route(names::ADMIN_PROFILE_URL, get(get_profile).put(update_profile))
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Response, AppError> {
    let admin = state
        .db
        .find_admin(&body.username)
        .await
        .reject("loading admin account")?;

    match admin {
        Some(admin) if utils::verify_password(&body.password, &admin.password_hash) => {
            let session = state
                .db
                .create_admin_session(admin.id)
                .await
                .reject("creating admin session")?;

            let headers = AppendHeaders([(
                SET_COOKIE,
                utils::cookie(names::ADMIN_SESSION_COOKIE_NAME, &session, state.secure_cookies),
            )]);

            Ok((headers, Json(json!({ "success": true }))).into_response())
        }
        _ => {
            tracing::warn!("failed login for {:?}", body.username);
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "用戶名或密碼錯誤" })),
            )
                .into_response())
        }
    }
}

/// Drops the server-side session (if any) and expires the cookie. Does not
/// require a valid session: logging out twice is fine.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = jar.get(names::ADMIN_SESSION_COOKIE_NAME) {
        state
            .db
            .delete_admin_session(cookie.value())
            .await
            .reject("deleting admin session")?;
    }

    let headers = AppendHeaders([(
        SET_COOKIE,
        utils::expired_cookie(names::ADMIN_SESSION_COOKIE_NAME),
    )]);

    Ok((headers, Json(json!({ "success": true }))))
}

async fn get_profile(
    AdminGuard(ctx): AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let admin = state
        .db
        .admin_by_id(ctx.id)
        .await
        .reject("loading admin account")?
        .or_not_found("管理員不存在")?;

    Ok(Json(json!({
        "id": admin.id,
        "username": admin.username,
        "created_at": admin.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })))
}

#[derive(Deserialize)]
struct ProfileBody {
    username: Option<String>,
    password: Option<String>,
}

async fn update_profile(
    AdminGuard(ctx): AdminGuard,
    State(state): State<AppState>,
    Json(body): Json<ProfileBody>,
) -> Result<Json<Value>, AppError> {
    let mut username = ctx.username.clone();

    if let Some(new_username) = body.username.filter(|u| !u.is_empty()) {
        if new_username != ctx.username {
            let taken = state
                .db
                .username_taken(&new_username, ctx.id)
                .await
                .reject("checking username")?;
            if taken {
                return Err(AppError::Input("用戶名已存在".to_string()));
            }

            state
                .db
                .update_admin_username(ctx.id, &new_username)
                .await
                .reject("updating username")?;
            username = new_username;
        }
    }

    if let Some(password) = body.password.filter(|p| !p.is_empty()) {
        state
            .db
            .update_admin_password(ctx.id, &utils::hash_password(&password))
            .await
            .reject("updating password")?;
    }

    Ok(Json(json!({
        "success": true,
        "admin": { "id": ctx.id, "username": username },
    })))
}
