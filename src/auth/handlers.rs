use std::str::FromStr;

use axum::{
    extract::{FromRef, State},
    response::Response,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::claims::Role;
use super::dto::{LoginRequest, LoginResult};
use super::jwt::{format_expiry, JwtKeys};
use super::password::verify_password;
use super::repo::User;
use crate::error::ApiError;
use crate::response::ok;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/admin/login", post(admin_login))
}

/// Shared credential check for both login surfaces. Unknown email returns
/// before any hash comparison; the argon2 verify itself is the timing-safe
/// primitive.
async fn authenticate(state: &AppState, payload: &LoginRequest) -> Result<(User, Role), ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    // Presence was just validated.
    let email = payload.email.as_deref().unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();

    let user = User::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "login with unknown email");
            ApiError::unauthorized("Invalid credentials")
        })?;

    if !verify_password(password, &user.password)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let role = Role::from_str(&user.role_type)?;
    Ok((user, role))
}

fn issue_token(state: &AppState, user: &User, role: Role) -> Result<(String, String), ApiError> {
    let keys = JwtKeys::from_ref(state);
    let (token, expires_at) = keys.sign(user.id, role)?;
    Ok((token, format_expiry(expires_at)?))
}

/// POST /api/login: mobile login, ordinary users only.
#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let (user, role) = authenticate(&state, &payload).await?;

    if role != Role::User {
        warn!(user_id = %user.id, role = %role, "non-user role on mobile login");
        return Err(ApiError::forbidden("Forbidden"));
    }

    let (access_token, expires_at) = issue_token(&state, &user, role)?;
    info!(user_id = %user.id, "user logged in");
    Ok(ok(
        "Logged in",
        LoginResult {
            user_id: user.id,
            access_token,
            token_type: "Bearer",
            role_type: role,
            expires_at,
            name: None,
            email: None,
        },
    ))
}

/// POST /api/admin/login: admin panel login.
#[instrument(skip(state, payload))]
async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let (user, role) = authenticate(&state, &payload).await?;

    if role != Role::Admin {
        warn!(user_id = %user.id, role = %role, "non-admin role on admin login");
        return Err(ApiError::forbidden("Admin access required"));
    }

    let (access_token, expires_at) = issue_token(&state, &user, role)?;
    info!(user_id = %user.id, "admin logged in");
    Ok(ok(
        "Admin logged in successfully",
        LoginResult {
            user_id: user.id,
            access_token,
            token_type: "Bearer",
            role_type: role,
            expires_at,
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
        },
    ))
}
