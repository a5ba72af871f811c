mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use photoquiz::names;
use serde_json::json;
use tower::ServiceExt;

fn admin_routes() -> Vec<(&'static str, String)> {
    vec![
        ("GET", names::ADMIN_PROFILE_URL.to_string()),
        ("PUT", names::ADMIN_PROFILE_URL.to_string()),
        ("GET", names::ADMIN_QUESTIONS_URL.to_string()),
        ("POST", names::ADMIN_QUESTIONS_URL.to_string()),
        ("PUT", format!("{}/1", names::ADMIN_QUESTIONS_URL)),
        ("DELETE", format!("{}/1", names::ADMIN_QUESTIONS_URL)),
        ("POST", names::ADMIN_QUESTIONS_REORDER_URL.to_string()),
        ("GET", names::ADMIN_COURSES_URL.to_string()),
        ("POST", names::ADMIN_COURSES_URL.to_string()),
        ("GET", names::ADMIN_SCORE_SETTINGS_URL.to_string()),
        ("POST", names::ADMIN_SCORE_SETTINGS_URL.to_string()),
        ("GET", names::ADMIN_RECOMMENDATION_SETTINGS_URL.to_string()),
        ("POST", format!("{}/1/activate", names::ADMIN_RECOMMENDATION_SETTINGS_URL)),
        ("GET", names::ADMIN_STATS_URL.to_string()),
        ("GET", names::ADMIN_REAL_TIME_STATS_URL.to_string()),
        ("GET", names::ADMIN_DETAILED_STATS_URL.to_string()),
        ("POST", names::ADMIN_CLEAR_DATA_URL.to_string()),
        ("GET", names::ADMIN_EXPORT_EXCEL_URL.to_string()),
        ("GET", names::ADMIN_EXPORT_POWERPOINT_URL.to_string()),
    ]
}

#[tokio::test]
async fn admin_routes_reject_missing_sessions() {
    let state = common::test_state().await;
    let app = common::app(&state);

    for (method, path) in admin_routes() {
        let (status, body) = common::send(&app, common::request(method, &path, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {path}");
        assert_eq!(body["error"], "未登錄", "{method} {path}");
    }
}

#[tokio::test]
async fn admin_routes_reject_stale_session_tokens() {
    let state = common::test_state().await;
    let app = common::app(&state);
    let cookie = format!("{}=01ARZ3NDEKTSV4RRFFQ69G5FAV", names::ADMIN_SESSION_COOKIE_NAME);

    let (status, body) = common::send(
        &app,
        common::request("GET", names::ADMIN_PROFILE_URL, Some(&cookie), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "未登錄");
}

#[tokio::test]
async fn valid_session_reaches_admin_handlers() {
    let state = common::test_state().await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;

    let (status, body) = common::send(
        &app,
        common::request("GET", names::ADMIN_PROFILE_URL, Some(&cookie), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], names::DEFAULT_ADMIN_USERNAME);
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let state = common::test_state().await;
    common::login(&state).await;
    let app = common::app(&state);

    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            names::ADMIN_LOGIN_URL,
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "用戶名或密碼錯誤");
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let state = common::test_state().await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;

    let response = app
        .clone()
        .oneshot(common::request("POST", names::ADMIN_LOGOUT_URL, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let expired = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(expired.contains("Max-Age=0"));

    let (status, _) = common::send(
        &app,
        common::request("GET", names::ADMIN_PROFILE_URL, Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
