// Database module - provides data access layer

use std::str::FromStr;

use color_eyre::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub mod models;

mod schema;

mod admin;
mod course;
mod question;
mod response;
mod settings;

pub use response::NewResponse;

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Opens (creating if missing) the SQLite database at `url`. Accepts
    /// `file:path`, `sqlite:path` or a bare path.
    pub async fn new(url: &str) -> Result<Self> {
        let path = url
            .strip_prefix("file:")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{path}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        // Verify connection
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(one, 1);

        schema::create_schema(&pool).await?;
        schema::seed_defaults(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }
}
