use serde::{Deserialize, Serialize};

use super::claims::Role;
use crate::validate::{is_valid_email, FieldError};

/// Request body for both login entry points.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match self.email.as_deref() {
            Some(email) if is_valid_email(email) => {}
            _ => errors.push(FieldError::new("email", "Valid email is required")),
        }
        match self.password.as_deref() {
            Some(password) if !password.is_empty() => {}
            _ => errors.push(FieldError::new("password", "Password is required")),
        }
        errors
    }
}

/// Successful login payload. `name` and `email` are only present on admin
/// login.
#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub user_id: i64,
    pub access_token: String,
    pub token_type: &'static str,
    pub role_type: Role,
    pub expires_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_validation_flags_each_field() {
        let req = LoginRequest {
            email: None,
            password: None,
        };
        let errors = req.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[1].field, "password");

        let req = LoginRequest {
            email: Some("nope".into()),
            password: Some("secret".into()),
        };
        let errors = req.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");

        let req = LoginRequest {
            email: Some("user@example.com".into()),
            password: Some("secret".into()),
        };
        assert!(req.validate().is_empty());
    }

    #[test]
    fn mobile_login_result_omits_admin_fields() {
        let result = LoginResult {
            user_id: 1,
            access_token: "tok".into(),
            token_type: "Bearer",
            role_type: Role::User,
            expires_at: "2026-01-01 00:00:00".into(),
            name: None,
            email: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["role_type"], "user");
        assert!(json.get("name").is_none());
        assert!(json.get("email").is_none());
    }
}
