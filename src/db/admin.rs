use color_eyre::Result;
use ulid::Ulid;

use super::models::{AdminContext, AdminRow};
use super::Db;

impl Db {
    /// Creates the admin account or rotates its password hash.
    pub async fn ensure_admin(&self, username: &str, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (username, password_hash) VALUES ($1, $2)
            ON CONFLICT(username) DO UPDATE SET password_hash = excluded.password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        tracing::info!("admin credentials set for {username:?}");
        Ok(())
    }

    pub async fn find_admin(&self, username: &str) -> Result<Option<AdminRow>> {
        let admin = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, password_hash, created_at FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn admin_by_id(&self, admin_id: i64) -> Result<Option<AdminRow>> {
        let admin = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, password_hash, created_at FROM admins WHERE id = $1",
        )
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn username_taken(&self, username: &str, exclude_id: i64) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM admins WHERE username = $1 AND id != $2)",
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    pub async fn update_admin_username(&self, admin_id: i64, username: &str) -> Result<()> {
        sqlx::query("UPDATE admins SET username = $1 WHERE id = $2")
            .bind(username)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn update_admin_password(&self, admin_id: i64, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE admins SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("admin {admin_id} password updated");
        Ok(())
    }

    pub async fn create_admin_session(&self, admin_id: i64) -> Result<String> {
        let session = Ulid::new().to_string();

        sqlx::query("INSERT INTO admin_sessions (id, admin_id) VALUES ($1, $2)")
            .bind(&session)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("new admin session created for admin {admin_id}");
        Ok(session)
    }

    pub async fn delete_admin_session(&self, session: &str) -> Result<()> {
        sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
            .bind(session)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn admin_by_session(&self, session: &str) -> Result<Option<AdminContext>> {
        let admin = sqlx::query_as::<_, AdminContext>(
            r#"
            SELECT a.id, a.username
            FROM admin_sessions s
            JOIN admins a ON a.id = s.admin_id
            WHERE s.id = $1
            "#,
        )
        .bind(session)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }
}
