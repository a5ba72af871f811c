use color_eyre::Result;

use super::models::CourseRow;
use super::Db;

const COURSE_COLUMNS: &str =
    "id, title, category, description, level, is_active, interest_tags, created_at";

impl Db {
    pub async fn all_courses(&self) -> Result<Vec<CourseRow>> {
        let courses =
            sqlx::query_as::<_, CourseRow>(&format!("SELECT {COURSE_COLUMNS} FROM courses"))
                .fetch_all(&self.pool)
                .await?;

        Ok(courses)
    }

    /// The active catalog, in storage order (recommendation scans rely on it).
    pub async fn active_courses(&self) -> Result<Vec<CourseRow>> {
        let courses = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE is_active"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    pub async fn create_course(
        &self,
        title: &str,
        category: &str,
        description: &str,
        level: &str,
        is_active: bool,
        interest_tags: &[String],
    ) -> Result<CourseRow> {
        let tags_json = serde_json::to_string(interest_tags)?;

        let course = sqlx::query_as::<_, CourseRow>(&format!(
            r#"
            INSERT INTO courses (title, category, description, level, is_active, interest_tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(category)
        .bind(description)
        .bind(level)
        .bind(is_active)
        .bind(tags_json)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("course {} ({title:?}) created", course.id);
        Ok(course)
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        title: &str,
        category: &str,
        description: &str,
        level: &str,
        is_active: bool,
        interest_tags: &[String],
    ) -> Result<Option<CourseRow>> {
        let tags_json = serde_json::to_string(interest_tags)?;

        let course = sqlx::query_as::<_, CourseRow>(&format!(
            r#"
            UPDATE courses
            SET title = $1, category = $2, description = $3, level = $4,
                is_active = $5, interest_tags = $6
            WHERE id = $7
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(category)
        .bind(description)
        .bind(level)
        .bind(is_active)
        .bind(tags_json)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    pub async fn delete_course(&self, course_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
