#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use photoquiz::db::Db;
use photoquiz::models::{AnswerValue, QuestionRole, QuestionType};
use photoquiz::{names, utils, AppState};

static DB_COUNTER: AtomicU32 = AtomicU32::new(0);

pub const TEST_PASSWORD: &str = "secret";

/// Fresh on-disk SQLite database per call; unique path per test.
pub async fn test_db() -> Db {
    let n = DB_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("photoquiz-test-{}-{n}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);

    Db::new(path.to_str().expect("temp path is utf-8"))
        .await
        .expect("open test database")
}

pub async fn test_state() -> AppState {
    AppState {
        db: test_db().await,
        secure_cookies: false,
    }
}

pub fn app(state: &AppState) -> Router {
    photoquiz::router(state.clone())
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

pub fn request(method: &str, path: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }

    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// Runs one request against a fresh clone of the router and decodes the
/// JSON response body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Creates the admin account and logs in, returning the session cookie pair.
pub async fn login(state: &AppState) -> String {
    state
        .db
        .ensure_admin(names::DEFAULT_ADMIN_USERNAME, &utils::hash_password(TEST_PASSWORD))
        .await
        .expect("seed admin");

    let request = request(
        "POST",
        names::ADMIN_LOGIN_URL,
        None,
        Some(json!({ "username": names::DEFAULT_ADMIN_USERNAME, "password": TEST_PASSWORD })),
    );
    let response = app(state).oneshot(request).await.expect("infallible");
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("login sets a cookie")
        .to_str()
        .expect("cookie is ascii");

    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

// ----- seeding helpers ------------------------------------------------------

pub async fn seed_scored_question(db: &Db, content: &str, correct: AnswerValue) -> i64 {
    let options = vec!["甲".to_string(), "乙".to_string(), "丙".to_string(), "丁".to_string()];
    let question_type = match correct {
        AnswerValue::Single(_) => QuestionType::Single,
        AnswerValue::Multiple(_) => QuestionType::Multiple,
    };

    db.create_question(content, question_type, QuestionRole::Scored, &options, Some(&correct))
        .await
        .expect("seed question")
        .id
}

pub async fn seed_interest_question(db: &Db, content: &str, options: &[&str]) -> i64 {
    let options: Vec<String> = options.iter().map(|s| s.to_string()).collect();

    db.create_question(content, QuestionType::Multiple, QuestionRole::InterestSelector, &options, None)
        .await
        .expect("seed interest question")
        .id
}

pub async fn seed_band(db: &Db, level_name: &str, min_score: i64, max_score: i64) -> i64 {
    db.create_score_band(level_name, min_score, max_score, None, true, None)
        .await
        .expect("seed score band")
        .id
}

pub async fn seed_course(db: &Db, title: &str, level: &str, tags: &[&str]) -> i64 {
    let tags: Vec<String> = tags.iter().map(|s| s.to_string()).collect();

    db.create_course(title, "攝影課程", "課程介紹", level, true, &tags)
        .await
        .expect("seed course")
        .id
}
