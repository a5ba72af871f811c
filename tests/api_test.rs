mod common;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use photoquiz::models::AnswerValue;
use photoquiz::names;
use serde_json::json;

/// Seeds a small quiz: two single-choice questions, one multiple-choice
/// question (all scored, correct answers 0 / 0 / [0,1]) and one interest
/// selector.
async fn seed_quiz(db: &photoquiz::db::Db) {
    common::seed_scored_question(db, "光圈題", AnswerValue::Single(0)).await;
    common::seed_scored_question(db, "快門題", AnswerValue::Single(0)).await;
    common::seed_scored_question(db, "構圖題", AnswerValue::Multiple(vec![0, 1])).await;
    common::seed_interest_question(db, "興趣題", &["人像攝影", "舞台攝影"]).await;

    common::seed_band(db, "攝影新手", 0, 1).await;
    common::seed_band(db, "進階攝影師", 2, 3).await;

    common::seed_course(db, "人像用光實戰", "進階攝影師", &["人像攝影"]).await;
    common::seed_course(db, "舞台攝影入門", "攝影新手", &["舞台攝影"]).await;
}

#[tokio::test]
async fn public_question_list_hides_correct_answers() {
    let state = common::test_state().await;
    seed_quiz(&state.db).await;
    let app = common::app(&state);

    let (status, body) = common::send(&app, common::get(names::QUESTIONS_URL)).await;
    assert_eq!(status, StatusCode::OK);

    let questions = body.as_array().expect("array payload");
    assert_eq!(questions.len(), 4);
    for question in questions {
        assert!(question.get("correct_answer").is_none());
        assert!(question["options"].is_array());
    }
    assert_eq!(questions[0]["order"], 1);
    assert_eq!(questions[3]["role"], "interest_selector");
}

#[tokio::test]
async fn submission_grades_classifies_and_recommends() {
    let state = common::test_state().await;
    seed_quiz(&state.db).await;
    let app = common::app(&state);

    let payload = json!({
        "answers": [
            { "question_id": 1, "answer": 0 },
            { "question_id": 2, "answer": 1 },
            { "question_id": 3, "answer": [1, 0] },
            { "question_id": 4, "answer": [0] },
        ],
    });

    let (status, body) =
        common::send(&app, common::request("POST", names::SUBMIT_URL, None, Some(payload))).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["score"], 2);
    assert_eq!(body["max_score"], 3);
    assert_eq!(body["percentage"], 66.7);
    assert_eq!(body["level"], "進階攝影師");
    assert_eq!(body["level_color"], "#FF9800");
    assert!(!body["session_id"].as_str().unwrap().is_empty());

    let titles: Vec<&str> = body["recommended_courses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"人像用光實戰"), "interest match missing: {titles:?}");
}

#[tokio::test]
async fn submissions_get_distinct_sessions_with_equal_scores() {
    let state = common::test_state().await;
    seed_quiz(&state.db).await;
    let app = common::app(&state);

    let payload = json!({ "answers": [{ "question_id": 1, "answer": 0 }] });

    let (_, first) = common::send(
        &app,
        common::request("POST", names::SUBMIT_URL, None, Some(payload.clone())),
    )
    .await;
    let (_, second) =
        common::send(&app, common::request("POST", names::SUBMIT_URL, None, Some(payload))).await;

    assert_ne!(first["session_id"], second["session_id"]);
    assert_eq!(first["score"], second["score"]);

    let responses = state.db.responses_filtered(None, None).await.unwrap();
    assert_eq!(responses.len(), 2);
}

#[tokio::test]
async fn submission_without_answers_is_rejected() {
    let state = common::test_state().await;
    let app = common::app(&state);

    let (status, body) = common::send(
        &app,
        common::request("POST", names::SUBMIT_URL, None, Some(json!({ "foo": 1 }))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "無效的請求數據");
}

#[tokio::test]
async fn question_management_round_trip() {
    let state = common::test_state().await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;

    let create = json!({
        "content": "測光題",
        "question_type": "single",
        "options": ["點測光", "評價測光"],
        "correct_answer": 1,
    });
    let (status, body) = common::send(
        &app,
        common::request("POST", names::ADMIN_QUESTIONS_URL, Some(&cookie), Some(create)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["role"], "scored");
    assert_eq!(body["question"]["correct_answer"], 1);
    let id = body["question"]["id"].as_i64().unwrap();

    let update = json!({
        "content": "興趣題",
        "question_type": "multiple",
        "role": "interest_selector",
        "options": ["人像攝影"],
    });
    let (status, body) = common::send(
        &app,
        common::request(
            "PUT",
            &format!("{}/{id}", names::ADMIN_QUESTIONS_URL),
            Some(&cookie),
            Some(update.clone()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["role"], "interest_selector");

    let (status, body) = common::send(
        &app,
        common::request(
            "PUT",
            &format!("{}/9999", names::ADMIN_QUESTIONS_URL),
            Some(&cookie),
            Some(update),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "問題不存在");

    let (status, _) = common::send(
        &app,
        common::request(
            "DELETE",
            &format!("{}/{id}", names::ADMIN_QUESTIONS_URL),
            Some(&cookie),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.db.questions_ordered().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_question_type_is_rejected() {
    let state = common::test_state().await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;

    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            names::ADMIN_QUESTIONS_URL,
            Some(&cookie),
            Some(json!({ "content": "題目", "question_type": "essay", "options": [] })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "無效的問題類型");
}

#[tokio::test]
async fn score_setting_validation_errors() {
    let state = common::test_state().await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;

    // Missing required field.
    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            names::ADMIN_SCORE_SETTINGS_URL,
            Some(&cookie),
            Some(json!({ "level_name": "攝影新手", "min_score": 0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "缺少必填欄位: max_score");

    // Inverted range.
    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            names::ADMIN_SCORE_SETTINGS_URL,
            Some(&cookie),
            Some(json!({ "level_name": "攝影新手", "min_score": 9, "max_score": 3 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "最低分數必須小於最高分數");

    // Overlap with an existing active band.
    let (status, _) = common::send(
        &app,
        common::request(
            "POST",
            names::ADMIN_SCORE_SETTINGS_URL,
            Some(&cookie),
            Some(json!({ "level_name": "攝影新手", "min_score": 0, "max_score": 9 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            names::ADMIN_SCORE_SETTINGS_URL,
            Some(&cookie),
            Some(json!({ "level_name": "進階攝影師", "min_score": 5, "max_score": 12 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "分數範圍與「攝影新手」重疊");
}

#[tokio::test]
async fn recommendation_setting_lifecycle_and_validation() {
    let state = common::test_state().await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;
    let base = names::ADMIN_RECOMMENDATION_SETTINGS_URL;

    for (payload, error) in [
        (json!({ "setting_name": " " }), "設定名稱不能為空"),
        (json!({ "setting_name": "多", "min_courses": 200 }), "課程數量必須在0-100範圍內"),
        (
            json!({ "setting_name": "反", "min_courses": 5, "max_courses": 2 }),
            "最少課程數量不能大於最多課程數量",
        ),
        (json!({ "setting_name": "default" }), "設定名稱已存在"),
    ] {
        let (status, body) =
            common::send(&app, common::request("POST", base, Some(&cookie), Some(payload))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], error);
    }

    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            base,
            Some(&cookie),
            Some(json!({ "setting_name": "精簡", "min_courses": 2, "max_courses": 4 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "推薦設定創建成功");
    let id = body["setting"]["id"].as_i64().unwrap();

    let (status, body) = common::send(
        &app,
        common::request("POST", &format!("{base}/{id}/activate"), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active_setting"]["setting_name"], "精簡");

    let bounds = state.db.active_recommendation_bounds().await;
    assert_eq!(bounds.min_courses, 2);
    assert_eq!(bounds.max_courses, 4);

    // The seeded default can never be deleted.
    let default_id = state
        .db
        .recommendation_settings()
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.setting_name == names::DEFAULT_SETTING_NAME)
        .unwrap()
        .id;
    let (status, body) = common::send(
        &app,
        common::request("DELETE", &format!("{base}/{default_id}"), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "不能刪除默認設定");

    let (status, _) = common::send(
        &app,
        common::request("DELETE", &format!("{base}/{id}"), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn stats_reflect_submissions_and_clearing() {
    let state = common::test_state().await;
    seed_quiz(&state.db).await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;

    let payload = json!({ "answers": [
        { "question_id": 1, "answer": 0 },
        { "question_id": 2, "answer": 2 },
    ]});
    common::send(&app, common::request("POST", names::SUBMIT_URL, None, Some(payload))).await;

    let (status, body) = common::send(
        &app,
        common::request("GET", names::ADMIN_STATS_URL, Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_responses"], 1);
    assert_eq!(body["total_questions"], 4);
    assert_eq!(body["avg_score"], 1.0);

    let (status, body) = common::send(
        &app,
        common::request("GET", names::ADMIN_DETAILED_STATS_URL, Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Three scored questions, so buckets 0..=3.
    assert_eq!(body["score_distribution"].as_array().unwrap().len(), 4);
    assert_eq!(body["question_stats"][0]["correct_rate"], 100.0);

    let (status, body) = common::send(
        &app,
        common::request(
            "POST",
            names::ADMIN_CLEAR_DATA_URL,
            Some(&cookie),
            Some(json!({ "clear_all": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_count"], 2);
    assert!(state.db.responses_filtered(None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn exports_return_base64_documents() {
    let state = common::test_state().await;
    seed_quiz(&state.db).await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;

    let payload = json!({ "answers": [{ "question_id": 1, "answer": 0 }] });
    common::send(&app, common::request("POST", names::SUBMIT_URL, None, Some(payload))).await;

    for (url, extension) in [
        (names::ADMIN_EXPORT_EXCEL_URL, ".xlsx"),
        (names::ADMIN_EXPORT_POWERPOINT_URL, ".pptx"),
    ] {
        let (status, body) =
            common::send(&app, common::request("GET", url, Some(&cookie), None)).await;
        assert_eq!(status, StatusCode::OK, "{url}");
        assert_eq!(body["success"], true);
        assert!(body["filename"].as_str().unwrap().ends_with(extension));

        // Both formats are zip containers.
        let bytes = BASE64.decode(body["data"].as_str().unwrap()).unwrap();
        assert_eq!(&bytes[..2], b"PK", "{url}");
    }
}

#[tokio::test]
async fn profile_update_checks_username_conflicts() {
    let state = common::test_state().await;
    let app = common::app(&state);
    let cookie = common::login(&state).await;

    state.db.ensure_admin("second", "hash").await.unwrap();

    let (status, body) = common::send(
        &app,
        common::request(
            "PUT",
            names::ADMIN_PROFILE_URL,
            Some(&cookie),
            Some(json!({ "username": "second" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "用戶名已存在");

    let (status, body) = common::send(
        &app,
        common::request(
            "PUT",
            names::ADMIN_PROFILE_URL,
            Some(&cookie),
            Some(json!({ "username": "chief", "password": "rotated" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admin"]["username"], "chief");

    // The rotated credentials log in.
    let (status, _) = common::send(
        &app,
        common::request(
            "POST",
            names::ADMIN_LOGIN_URL,
            None,
            Some(json!({ "username": "chief", "password": "rotated" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
