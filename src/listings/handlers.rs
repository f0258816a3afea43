use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{AdminListingPage, CreateListingRequest, ListingQuery, UpdateListingRequest};
use super::repo::Listing;
use super::service;
use crate::auth::extractors::{RequireAdmin, RequireUser};
use crate::auth::repo::User;
use crate::describe::synthesize;
use crate::error::ApiError;
use crate::response::{created, ok, ok_message};
use crate::state::AppState;
use crate::validate::{validate_coordinates, PageQuery};

pub fn mobile_routes() -> Router<AppState> {
    Router::new().route("/api/listing/get", get(get_listings))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/listings",
            get(admin_list).post(admin_create),
        )
        .route(
            "/api/admin/listings/:id",
            get(admin_get).put(admin_update).delete(admin_delete),
        )
}

/// GET /api/listing/get: the caller's listings ranked by distance from
/// the supplied coordinate.
#[instrument(skip(state, claims), fields(user_id = %claims.user_id))]
async fn get_listings(
    State(state): State<AppState>,
    RequireUser(claims): RequireUser,
    Query(query): Query<ListingQuery>,
) -> Result<Response, ApiError> {
    let (latitude, longitude) =
        validate_coordinates(query.latitude.as_deref(), query.longitude.as_deref())
            .map_err(ApiError::Validation)?;

    let page = service::get_listings(
        &state.db,
        claims.user_id,
        latitude,
        longitude,
        query.page(),
        query.per_page(),
    )
    .await?;

    Ok(ok("Success", page))
}

/// GET /api/admin/listings: all listings with owner details, SQL-paged.
#[instrument(skip(state, _claims))]
async fn admin_list(
    State(state): State<AppState>,
    _claims: RequireAdmin,
    Query(paging): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let (page, per_page) = (paging.page(), paging.per_page());
    let offset = (page - 1) * per_page;

    let data = Listing::list_with_owner(&state.db, per_page, offset).await?;
    let total = Listing::count(&state.db).await?;

    Ok(ok(
        "Success",
        AdminListingPage {
            current_page: page,
            per_page,
            total,
            data,
        },
    ))
}

/// GET /api/admin/listings/:id
#[instrument(skip(state, _claims))]
async fn admin_get(
    State(state): State<AppState>,
    _claims: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let listing = Listing::find_with_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;
    Ok(ok("Success", listing))
}

/// POST /api/admin/listings
#[instrument(skip(state, _claims, payload))]
async fn admin_create(
    State(state): State<AppState>,
    _claims: RequireAdmin,
    Json(payload): Json<CreateListingRequest>,
) -> Result<Response, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    // Validated present just above.
    let name = payload.name.as_deref().unwrap_or_default().trim();
    let latitude = payload.latitude.unwrap_or_default();
    let longitude = payload.longitude.unwrap_or_default();
    let user_id = payload.user_id.unwrap_or_default();

    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let description = match payload.description.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => synthesize(state.describer.as_ref(), name).await,
    };

    let listing =
        Listing::create(&state.db, name, &description, latitude, longitude, user_id).await?;
    info!(listing_id = %listing.id, user_id = %user_id, "listing created");
    Ok(created("Listing created successfully", listing))
}

/// PUT /api/admin/listings/:id. Partial update; absent fields are kept.
#[instrument(skip(state, _claims, payload))]
async fn admin_update(
    State(state): State<AppState>,
    _claims: RequireAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateListingRequest>,
) -> Result<Response, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if Listing::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::not_found("Listing not found"));
    }

    if let Some(user_id) = payload.user_id {
        if User::find_by_id(&state.db, user_id).await?.is_none() {
            return Err(ApiError::not_found("User not found"));
        }
    }

    // A renamed listing with no supplied description gets a fresh one.
    let description = match (&payload.name, &payload.description) {
        (_, Some(text)) if !text.is_empty() => Some(text.clone()),
        (Some(name), None) => Some(synthesize(state.describer.as_ref(), name.trim()).await),
        _ => None,
    };

    let listing = Listing::update(
        &state.db,
        id,
        payload.name.as_deref().map(str::trim),
        description.as_deref(),
        payload.latitude,
        payload.longitude,
        payload.user_id,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Listing not found"))?;

    info!(listing_id = %id, "listing updated");
    Ok(ok("Listing updated successfully", listing))
}

/// DELETE /api/admin/listings/:id
#[instrument(skip(state, _claims))]
async fn admin_delete(
    State(state): State<AppState>,
    _claims: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    if !Listing::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Listing not found"));
    }
    info!(listing_id = %id, "listing deleted");
    Ok(ok_message("Listing deleted successfully"))
}
