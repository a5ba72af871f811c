// Database schema initialization

use color_eyre::Result;
use sqlx::SqlitePool;

use crate::names;

pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_sessions (
            id TEXT PRIMARY KEY,
            admin_id INTEGER NOT NULL,
            FOREIGN KEY(admin_id) REFERENCES admins(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY,
            content TEXT NOT NULL,
            question_type TEXT NOT NULL DEFAULT 'single',
            role TEXT NOT NULL DEFAULT 'scored',
            display_order INTEGER NOT NULL,
            options TEXT NOT NULL,
            correct_answer TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS responses (
            id INTEGER PRIMARY KEY,
            session_id TEXT NOT NULL,
            question_id INTEGER NOT NULL,
            answer TEXT NOT NULL,
            is_correct BOOLEAN DEFAULT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(question_id) REFERENCES questions(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            level TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            interest_tags TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS score_settings (
            id INTEGER PRIMARY KEY,
            level_name TEXT NOT NULL,
            min_score INTEGER NOT NULL,
            max_score INTEGER NOT NULL,
            description TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recommendation_settings (
            id INTEGER PRIMARY KEY,
            setting_name TEXT NOT NULL UNIQUE,
            min_courses INTEGER NOT NULL DEFAULT 3,
            max_courses INTEGER NOT NULL DEFAULT 8,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Ensures the protected `default` recommendation setting exists, and that
/// at least one setting is active (re-activating `default` if none is).
pub async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    let default_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM recommendation_settings WHERE setting_name = $1)",
    )
    .bind(names::DEFAULT_SETTING_NAME)
    .fetch_one(pool)
    .await?;

    if !default_exists {
        sqlx::query(
            r#"
            INSERT INTO recommendation_settings
                (setting_name, min_courses, max_courses, is_active, description)
            VALUES ($1, $2, $3, 1, '系統默認推薦設定，推薦3-8個課程')
            "#,
        )
        .bind(names::DEFAULT_SETTING_NAME)
        .bind(names::DEFAULT_MIN_COURSES)
        .bind(names::DEFAULT_MAX_COURSES)
        .execute(pool)
        .await?;

        tracing::info!("default recommendation setting created");
        return Ok(());
    }

    let any_active: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM recommendation_settings WHERE is_active)")
            .fetch_one(pool)
            .await?;

    if !any_active {
        sqlx::query(
            "UPDATE recommendation_settings SET is_active = 1, updated_at = datetime('now') WHERE setting_name = $1",
        )
        .bind(names::DEFAULT_SETTING_NAME)
        .execute(pool)
        .await?;

        tracing::info!("no active recommendation setting found, re-activated default");
    }

    Ok(())
}
