// API-facing types shared by handlers and services.

use serde::{Deserialize, Serialize};

/// How a question is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(QuestionType::Single),
            "multiple" => Some(QuestionType::Multiple),
            _ => None,
        }
    }
}

/// What a question contributes to a quiz attempt. Stored per question,
/// replacing the display-order cutoffs the legacy data model relied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionRole {
    /// Graded against a correct answer and counted into the score.
    Scored,
    /// Its selected option labels become the submitter's interests.
    InterestSelector,
    /// Recorded but never graded.
    FreeText,
}

impl QuestionRole {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionRole::Scored => "scored",
            QuestionRole::InterestSelector => "interest_selector",
            QuestionRole::FreeText => "free_text",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scored" => Some(QuestionRole::Scored),
            "interest_selector" => Some(QuestionRole::InterestSelector),
            "free_text" => Some(QuestionRole::FreeText),
            _ => None,
        }
    }
}

/// A submitted or stored answer value: one option index for single-choice
/// questions, a set of indices for multiple-choice ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(i64),
    Multiple(Vec<i64>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub answer: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedCourse {
    pub title: String,
    pub category: String,
    pub description: String,
    pub level: String,
    pub priority: i64,
}

#[derive(Serialize)]
pub struct SubmitResult {
    pub session_id: String,
    pub score: i64,
    pub max_score: i64,
    pub percentage: f64,
    pub level: String,
    pub level_color: &'static str,
    pub recommended_courses: Vec<RecommendedCourse>,
}
