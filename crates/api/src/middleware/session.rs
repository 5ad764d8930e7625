//! Cookie-session authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use plexus_core::error::CoreError;
use plexus_db::models::user::User;
use plexus_db::repositories::{SessionRepo, UserRepo};
use tower_cookies::Cookies;

use crate::auth::session::{hash_session_token, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// The user owning the active session named by the `plexus_sid` cookie.
///
/// Rejects with 401 when the cookie is absent, or its session is unknown,
/// revoked or expired.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
}

fn not_authenticated() -> AppError {
    AppError::Core(CoreError::Unauthorized("Not authenticated".into()))
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::InternalError(msg.to_string()))?;

        let token = cookies
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(not_authenticated)?;

        let session =
            SessionRepo::find_active_by_token_hash(&state.pool, &hash_session_token(&token))
                .await?
                .ok_or_else(not_authenticated)?;

        let user = UserRepo::find_by_id(&state.pool, session.user_id)
            .await?
            .ok_or_else(not_authenticated)?;

        Ok(SessionUser { user })
    }
}
