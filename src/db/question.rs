use std::collections::HashMap;

use color_eyre::Result;

use crate::models::{AnswerValue, QuestionRole, QuestionType};

use super::models::QuestionRow;
use super::Db;

const QUESTION_COLUMNS: &str =
    "id, content, question_type, role, display_order, options, correct_answer, created_at";

impl Db {
    pub async fn questions_ordered(&self) -> Result<Vec<QuestionRow>> {
        let questions = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY display_order"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    pub async fn question(&self, question_id: i64) -> Result<Option<QuestionRow>> {
        let question = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    /// All questions keyed by id, for grading whole answer sets in one load.
    pub async fn questions_by_id(&self) -> Result<HashMap<i64, QuestionRow>> {
        let questions = self.questions_ordered().await?;
        Ok(questions.into_iter().map(|q| (q.id, q)).collect())
    }

    pub async fn create_question(
        &self,
        content: &str,
        question_type: QuestionType,
        role: QuestionRole,
        options: &[String],
        correct_answer: Option<&AnswerValue>,
    ) -> Result<QuestionRow> {
        let max_order: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(display_order), 0) FROM questions")
                .fetch_one(&self.pool)
                .await?;

        let options_json = serde_json::to_string(options)?;
        let correct_json = correct_answer.map(serde_json::to_string).transpose()?;

        let question = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            INSERT INTO questions (content, question_type, role, display_order, options, correct_answer)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(content)
        .bind(question_type.as_str())
        .bind(role.as_str())
        .bind(max_order + 1)
        .bind(options_json)
        .bind(correct_json)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("question {} created", question.id);
        Ok(question)
    }

    /// Returns the updated row, or `None` if the id does not exist.
    pub async fn update_question(
        &self,
        question_id: i64,
        content: &str,
        question_type: QuestionType,
        role: QuestionRole,
        options: &[String],
        correct_answer: Option<&AnswerValue>,
    ) -> Result<Option<QuestionRow>> {
        let options_json = serde_json::to_string(options)?;
        let correct_json = correct_answer.map(serde_json::to_string).transpose()?;

        let question = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            UPDATE questions
            SET content = $1, question_type = $2, role = $3, options = $4, correct_answer = $5
            WHERE id = $6
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(content)
        .bind(question_type.as_str())
        .bind(role.as_str())
        .bind(options_json)
        .bind(correct_json)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    /// Deletes a question; its responses go with it via the FK cascade.
    pub async fn delete_question(&self, question_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Applies `(id, display_order)` pairs atomically; unknown ids are ignored.
    pub async fn reorder_questions(&self, orders: &[(i64, i64)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (id, order) in orders {
            sqlx::query("UPDATE questions SET display_order = $1 WHERE id = $2")
                .bind(order)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
