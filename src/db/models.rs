// Database row structs. JSON-valued columns are stored as TEXT and decoded
// on access; malformed stored JSON degrades to an empty/None value instead
// of failing the whole query.

use chrono::NaiveDateTime;

use crate::models::{AnswerValue, QuestionRole, QuestionType};

#[derive(Clone, sqlx::FromRow)]
pub struct AdminContext {
    pub id: i64,
    pub username: String,
}

#[derive(sqlx::FromRow)]
pub struct AdminRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, sqlx::FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub content: String,
    pub question_type: String,
    pub role: String,
    pub display_order: i64,
    pub options: String,
    pub correct_answer: Option<String>,
    pub created_at: NaiveDateTime,
}

impl QuestionRow {
    pub fn question_type(&self) -> QuestionType {
        QuestionType::parse(&self.question_type).unwrap_or(QuestionType::Single)
    }

    /// Unknown role strings grade as free text, never as scored.
    pub fn role(&self) -> QuestionRole {
        QuestionRole::parse(&self.role).unwrap_or(QuestionRole::FreeText)
    }

    pub fn options(&self) -> Vec<String> {
        serde_json::from_str(&self.options).unwrap_or_default()
    }

    pub fn correct_answer(&self) -> Option<AnswerValue> {
        self.correct_answer
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
    }
}

#[derive(Clone, sqlx::FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub level: String,
    pub is_active: bool,
    pub interest_tags: String,
    pub created_at: NaiveDateTime,
}

impl CourseRow {
    pub fn interest_tags(&self) -> Vec<String> {
        serde_json::from_str(&self.interest_tags).unwrap_or_default()
    }
}

#[derive(Clone, sqlx::FromRow)]
pub struct ResponseRow {
    pub id: i64,
    pub session_id: String,
    pub question_id: i64,
    pub answer: String,
    pub is_correct: Option<bool>,
    pub created_at: NaiveDateTime,
}

impl ResponseRow {
    pub fn answer(&self) -> Option<AnswerValue> {
        serde_json::from_str(&self.answer).ok()
    }
}

#[derive(Clone, sqlx::FromRow)]
pub struct ScoreBandRow {
    pub id: i64,
    pub level_name: String,
    pub min_score: i64,
    pub max_score: i64,
    pub description: Option<String>,
    pub is_active: bool,
    pub display_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, sqlx::FromRow)]
pub struct RecommendationSettingRow {
    pub id: i64,
    pub setting_name: String,
    pub min_courses: i64,
    pub max_courses: i64,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Bounds the Recommendation Engine truncates and pads against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationBounds {
    pub min_courses: i64,
    pub max_courses: i64,
    pub setting_name: String,
}

impl Default for RecommendationBounds {
    fn default() -> Self {
        Self {
            min_courses: crate::names::DEFAULT_MIN_COURSES,
            max_courses: crate::names::DEFAULT_MAX_COURSES,
            setting_name: crate::names::DEFAULT_SETTING_NAME.to_string(),
        }
    }
}
