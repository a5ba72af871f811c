use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::{db::models::AdminContext, names, rejections::AppError, AppState};

/// Guard extractor that verifies the admin session cookie against the
/// database. Carries the authenticated admin's identity for use in handlers;
/// there is no ambient logged-in flag anywhere else.
pub struct AdminGuard(pub AdminContext);

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(token) = jar
            .get(names::ADMIN_SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
        {
            if let Ok(Some(admin)) = state.db.admin_by_session(&token).await {
                return Ok(AdminGuard(admin));
            }
        }

        Err(AppError::Unauthorized)
    }
}
