use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{macros::format_description, Duration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, Role};
use crate::state::AppState;

/// JWT signing and verification keys plus the fixed validity window.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self {
            encoding: EncodingKey::from_secret(jwt.secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt.secret.as_bytes()),
            ttl: Duration::hours(jwt.ttl_hours),
        }
    }
}

impl JwtKeys {
    /// Sign a claim token for `user_id`. Returns the token together with
    /// its expiry instant so callers can report a human-readable expiry
    /// computed from the same clock read the token itself encodes.
    pub fn sign(&self, user_id: i64, role: Role) -> anyhow::Result<(String, OffsetDateTime)> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + self.ttl;
        let claims = Claims {
            user_id,
            role_type: role,
            iat: now.unix_timestamp() as usize,
            exp: expires_at.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, role = %role, "jwt signed");
        Ok((token, expires_at))
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = %data.claims.user_id, role = %data.claims.role_type, "jwt verified");
        Ok(data.claims)
    }
}

/// Human-readable UTC expiry, `YYYY-MM-DD HH:MM:SS`.
pub fn format_expiry(at: OffsetDateTime) -> anyhow::Result<String> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    Ok(at.format(&format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let keys = make_keys();
        let (token, expires_at) = keys.sign(42, Role::User).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.role_type, Role::User);
        assert_eq!(claims.exp as i64, expires_at.unix_timestamp());
        // 24h window.
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn admin_role_survives_the_token() {
        let keys = make_keys();
        let (token, _) = keys.sign(1, Role::Admin).expect("sign");
        assert_eq!(keys.verify(&token).unwrap().role_type, Role::Admin);
    }

    #[test]
    fn verify_rejects_garbage_and_wrong_secret() {
        let keys = make_keys();
        assert!(keys.verify("not.a.token").is_err());

        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"different-secret"),
            decoding: DecodingKey::from_secret(b"different-secret"),
            ttl: Duration::hours(24),
        };
        let (token, _) = other.sign(1, Role::User).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys();
        let past = OffsetDateTime::now_utc() - Duration::hours(2);
        let claims = Claims {
            user_id: 9,
            role_type: Role::User,
            iat: (past - Duration::hours(24)).unix_timestamp() as usize,
            exp: past.unix_timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn expiry_formats_to_the_second() {
        let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(format_expiry(at).unwrap(), "2023-11-14 22:13:20");
    }
}
