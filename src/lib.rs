//! Photography quiz backend: public quiz taking plus an admin API for
//! questions, courses, scoring bands, recommendation settings, statistics
//! and report exports.

use axum::Router;

pub mod db;
pub mod export;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod recommend;
pub mod rejections;
pub mod scoring;
pub mod stats;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    /// Mark the admin session cookie `Secure` (for TLS deployments).
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::quiz::routes())
        .merge(handlers::admin::routes())
        .merge(handlers::questions::routes())
        .merge(handlers::courses::routes())
        .merge(handlers::settings::routes())
        .merge(handlers::stats::routes())
        .merge(handlers::export::routes())
        .with_state(state)
}
