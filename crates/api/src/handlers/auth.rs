//! Handlers for the `/auth` resource (signup, login, me, logout).
//!
//! Signup and login issue both credentials the API understands: a bearer
//! token in the body and a session cookie. `me` and `logout` read the cookie;
//! everything else requires the bearer token.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use plexus_core::error::CoreError;
use plexus_db::models::session::CreateSession;
use plexus_db::models::user::{CreateUser, User, UserResponse};
use plexus_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{
    generate_session_token, hash_session_token, removal_cookie, session_cookie, SESSION_COOKIE,
};
use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful signup/login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Bearer token for the CRUD routes.
    pub token: String,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
///
/// Register a new user. Returns the user and a bearer token, and sets the
/// session cookie.
pub async fn signup(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let (Some(name), Some(email), Some(password)) = (
        required(input.name.as_deref()),
        required(input.email.as_deref()),
        required(input.password.as_deref()),
    ) else {
        return Err(AppError::Core(CoreError::Validation(
            "Name, email and password are required".into(),
        )));
    };

    if UserRepo::find_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User already exists".into(),
        )));
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User signed up");

    let response = start_session(&state, &cookies, &headers, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns the user and a bearer token,
/// and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (
        required(input.email.as_deref()),
        required(input.password.as_deref()),
    ) else {
        return Err(AppError::Core(CoreError::Validation(
            "Email and password are required".into(),
        )));
    };

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");

    let response = start_session(&state, &cookies, &headers, &user).await?;
    Ok(Json(response))
}

/// GET /api/auth/me
///
/// The user owning the current session cookie.
pub async fn me(SessionUser { user }: SessionUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: UserResponse::from(&user),
    })
}

/// POST /api/auth/logout
///
/// Revoke the current session (if any) and clear the cookie. Always succeeds.
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> AppResult<Json<MessageResponse>> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        let revoked =
            SessionRepo::revoke_by_token_hash(&state.pool, &hash_session_token(cookie.value()))
                .await?;
        tracing::info!(revoked, "Session logged out");
    }
    cookies.remove(removal_cookie());

    Ok(Json(MessageResponse {
        message: "Logged out",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trimmed, non-empty value of an optional field.
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Issue a bearer token, persist a session row, and set the session cookie.
async fn start_session(
    state: &AppState,
    cookies: &Cookies,
    headers: &HeaderMap,
    user: &User,
) -> AppResult<AuthResponse> {
    let token = generate_token(user.id, &user.email, &user.name, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (session_token, session_hash) = generate_session_token();
    let session_config = &state.config.session;

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            session_token_hash: session_hash,
            expires_at: Utc::now() + chrono::Duration::hours(session_config.expiry_hours),
            user_agent: headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        },
    )
    .await?;

    cookies.add(session_cookie(session_token, session_config));

    Ok(AuthResponse {
        user: UserResponse::from(user),
        token,
    })
}
