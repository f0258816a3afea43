use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{CreateUserRequest, DashboardStats, UpdateUserRequest, UserPage};
use crate::auth::extractors::RequireAdmin;
use crate::auth::password::hash_password;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::listings::repo::Listing;
use crate::response::{created, ok, ok_message};
use crate::state::AppState;
use crate::validate::PageQuery;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/dashboard", get(dashboard))
        .route("/api/admin/users", get(list_users).post(create_user))
        .route(
            "/api/admin/users/:id",
            axum::routing::put(update_user).delete(delete_user),
        )
}

/// GET /api/admin/dashboard: aggregate counts plus the newest listings.
#[instrument(skip(state, _claims))]
async fn dashboard(
    State(state): State<AppState>,
    _claims: RequireAdmin,
) -> Result<Response, ApiError> {
    let (total_users, total_listings, total_admins, recent_listings) = tokio::try_join!(
        User::count(&state.db),
        Listing::count(&state.db),
        User::count_admins(&state.db),
        Listing::recent_with_owner(&state.db, 5),
    )?;

    Ok(ok(
        "Success",
        DashboardStats {
            total_users,
            total_listings,
            total_admins,
            recent_listings,
        },
    ))
}

/// GET /api/admin/users
#[instrument(skip(state, _claims))]
async fn list_users(
    State(state): State<AppState>,
    _claims: RequireAdmin,
    Query(paging): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let (page, per_page) = (paging.page(), paging.per_page());
    let offset = (page - 1) * per_page;

    let data = User::list(&state.db, per_page, offset).await?;
    let total = User::count(&state.db).await?;

    Ok(ok(
        "Success",
        UserPage {
            current_page: page,
            per_page,
            total,
            data,
        },
    ))
}

/// POST /api/admin/users
#[instrument(skip(state, _claims, payload))]
async fn create_user(
    State(state): State<AppState>,
    _claims: RequireAdmin,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    // Validated present just above.
    let name = payload.name.as_deref().unwrap_or_default().trim();
    let email = payload.email.as_deref().unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();
    let role = payload.role_type.as_deref().unwrap_or_default();

    if User::find_by_email(&state.db, email).await?.is_some() {
        warn!(email = %email, "create user with duplicate email");
        return Err(ApiError::conflict("Email already exists"));
    }

    let hash = hash_password(password)?;
    let user = User::create(&state.db, name, email, &hash, role).await?;

    info!(user_id = %user.id, "user created");
    Ok(created("User created successfully", user))
}

/// PUT /api/admin/users/:id. Partial update; absent fields are kept.
#[instrument(skip(state, _claims, payload))]
async fn update_user(
    State(state): State<AppState>,
    _claims: RequireAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let existing = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(email) = payload.email.as_deref() {
        if email != existing.email && User::email_taken_by_other(&state.db, email, id).await? {
            warn!(email = %email, "update user to a taken email");
            return Err(ApiError::conflict("Email already exists"));
        }
    }

    let hash = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        payload.name.as_deref().map(str::trim),
        payload.email.as_deref(),
        hash.as_deref(),
        payload.role_type.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(user_id = %id, "user updated");
    Ok(ok("User updated successfully", user))
}

/// The one guard on user deletion: an admin may not remove their own
/// account.
fn ensure_not_self(caller_id: i64, target_id: i64) -> Result<(), ApiError> {
    if caller_id == target_id {
        return Err(ApiError::forbidden("Cannot delete your own account"));
    }
    Ok(())
}

/// DELETE /api/admin/users/:id. Cascades to the user's listings.
#[instrument(skip(state, claims), fields(caller_id = %claims.user_id))]
async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(claims): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    ensure_not_self(claims.user_id, id)?;

    User::delete(&state.db, id).await?;
    info!(user_id = %id, "user deleted");
    Ok(ok_message("User deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_deletion_is_forbidden() {
        let err = ensure_not_self(2, 2).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(m) if m == "Cannot delete your own account"));
    }

    #[test]
    fn deleting_another_user_is_allowed() {
        assert!(ensure_not_self(2, 3).is_ok());
    }
}
