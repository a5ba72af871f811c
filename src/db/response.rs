use chrono::NaiveDateTime;
use color_eyre::Result;

use crate::models::AnswerValue;

use super::models::ResponseRow;
use super::Db;

/// One graded answer waiting to be persisted.
pub struct NewResponse {
    pub question_id: i64,
    pub answer: AnswerValue,
    pub is_correct: Option<bool>,
}

impl Db {
    /// Persists one quiz attempt's answers in a single transaction; either
    /// every row lands or none does.
    pub async fn insert_responses(&self, session_id: &str, rows: &[NewResponse]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for row in rows {
            let answer_json = serde_json::to_string(&row.answer)?;

            sqlx::query(
                r#"
                INSERT INTO responses (session_id, question_id, answer, is_correct)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(session_id)
            .bind(row.question_id)
            .bind(answer_json)
            .bind(row.is_correct)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("stored {} responses for session {session_id}", rows.len());
        Ok(())
    }

    /// Responses, optionally limited to a `created_at` range (inclusive).
    pub async fn responses_filtered(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<ResponseRow>> {
        let responses = sqlx::query_as::<_, ResponseRow>(
            r#"
            SELECT id, session_id, question_id, answer, is_correct, created_at
            FROM responses
            WHERE ($1 IS NULL OR created_at >= $1)
              AND ($2 IS NULL OR created_at <= $2)
            ORDER BY id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(responses)
    }

    pub async fn clear_responses(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM responses
            WHERE ($1 IS NULL OR created_at >= $1)
              AND ($2 IS NULL OR created_at <= $2)
            "#,
        )
        .bind(start)
        .bind(end)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected();
        tracing::info!("cleared {deleted} responses");
        Ok(deleted)
    }

    pub async fn clear_all_responses(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM responses").execute(&self.pool).await?;

        let deleted = result.rows_affected();
        tracing::info!("cleared all {deleted} responses");
        Ok(deleted)
    }
}
