use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::claims::{Claims, Role};
use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Pull the bearer credential out of a request, in priority order:
/// `Authorization: Bearer <t>` header, then the `access_token` query
/// parameter, then the `x-access-token` header.
pub fn bearer_token(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some(token) = pair.strip_prefix("access_token=") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    headers
        .get("x-access-token")
        .and_then(|v| v.to_str().ok())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}

/// Verify the request's credential and, when `allowed` is non-empty, its
/// role. An empty `allowed` set admits any authenticated principal.
fn authorize(keys: &JwtKeys, parts: &Parts, allowed: &[Role]) -> Result<Claims, ApiError> {
    let token = bearer_token(&parts.headers, parts.uri.query())
        .ok_or_else(|| ApiError::unauthorized("Missing token"))?;

    let claims = keys.verify(&token).map_err(|e| {
        warn!(error = %e, "token verification failed");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    if !allowed.is_empty() && !allowed.contains(&claims.role_type) {
        return Err(ApiError::forbidden("Forbidden"));
    }

    Ok(claims)
}

/// Authenticated principal with role `user`.
pub struct RequireUser(pub Claims);

/// Authenticated principal with role `admin`.
pub struct RequireAdmin(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize(&JwtKeys::from_ref(state), parts, &[Role::User]).map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize(&JwtKeys::from_ref(state), parts, &[Role::Admin]).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::Request;

    fn parts_for(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    #[test]
    fn header_takes_priority_over_query_and_custom_header() {
        let parts = parts_for(
            "/api/listing/get?access_token=from-query",
            &[
                ("authorization", "Bearer from-header"),
                ("x-access-token", "from-custom"),
            ],
        );
        assert_eq!(
            bearer_token(&parts.headers, parts.uri.query()).as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn query_param_beats_custom_header() {
        let parts = parts_for(
            "/api/listing/get?latitude=3.1&access_token=from-query",
            &[("x-access-token", "from-custom")],
        );
        assert_eq!(
            bearer_token(&parts.headers, parts.uri.query()).as_deref(),
            Some("from-query")
        );
    }

    #[test]
    fn custom_header_is_the_last_resort() {
        let parts = parts_for("/api/listing/get", &[("x-access-token", "from-custom")]);
        assert_eq!(
            bearer_token(&parts.headers, parts.uri.query()).as_deref(),
            Some("from-custom")
        );
    }

    #[test]
    fn malformed_authorization_scheme_falls_through() {
        let parts = parts_for(
            "/x?access_token=tok",
            &[("authorization", "Basic dXNlcjpwdw==")],
        );
        assert_eq!(
            bearer_token(&parts.headers, parts.uri.query()).as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn no_credential_yields_missing_token() {
        let parts = parts_for("/api/listing/get", &[]);
        let err = authorize(&keys(), &parts, &[Role::User]).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(m) if m == "Missing token"));
    }

    #[test]
    fn bad_token_yields_invalid_or_expired() {
        let parts = parts_for("/x", &[("authorization", "Bearer junk.junk.junk")]);
        let err = authorize(&keys(), &parts, &[]).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(m) if m == "Invalid or expired token"));
    }

    #[test]
    fn wrong_role_yields_forbidden() {
        let keys = keys();
        let (token, _) = keys.sign(1, Role::Admin).unwrap();
        let parts = parts_for("/x", &[("authorization", &format!("Bearer {token}"))]);
        let err = authorize(&keys, &parts, &[Role::User]).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(m) if m == "Forbidden"));
    }

    #[test]
    fn empty_allowed_set_admits_any_role() {
        let keys = keys();
        let (token, _) = keys.sign(5, Role::Admin).unwrap();
        let parts = parts_for("/x", &[("authorization", &format!("Bearer {token}"))]);
        let claims = authorize(&keys, &parts, &[]).unwrap();
        assert_eq!(claims.user_id, 5);
        assert_eq!(claims.role_type, Role::Admin);
    }

    #[test]
    fn matching_role_is_admitted_via_query_token() {
        let keys = keys();
        let (token, _) = keys.sign(7, Role::User).unwrap();
        let parts = parts_for(&format!("/api/listing/get?access_token={token}"), &[]);
        let claims = authorize(&keys, &parts, &[Role::User]).unwrap();
        assert_eq!(claims.user_id, 7);
    }
}
