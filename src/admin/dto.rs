use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth::claims::Role;
use crate::auth::repo::User;
use crate::listings::repo::RecentListing;
use crate::validate::{is_valid_email, FieldError};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role_type: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() && name.len() <= 255 => {}
            _ => errors.push(FieldError::new(
                "name",
                "Name is required and must be less than 255 characters",
            )),
        }
        match self.email.as_deref() {
            Some(email) if is_valid_email(email) => {}
            _ => errors.push(FieldError::new("email", "Valid email is required")),
        }
        match self.password.as_deref() {
            Some(password) if password.len() >= 6 => {}
            _ => errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            )),
        }
        match self.role_type.as_deref().map(Role::from_str) {
            Some(Ok(_)) => {}
            _ => errors.push(FieldError::new(
                "role_type",
                "Role type must be either \"user\" or \"admin\"",
            )),
        }
        errors
    }
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role_type: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(name) = self.name.as_deref().map(str::trim) {
            if name.is_empty() || name.len() > 255 {
                errors.push(FieldError::new(
                    "name",
                    "Name is required and must be less than 255 characters",
                ));
            }
        }
        if let Some(email) = self.email.as_deref() {
            if !is_valid_email(email) {
                errors.push(FieldError::new("email", "Valid email is required"));
            }
        }
        if let Some(password) = self.password.as_deref() {
            if password.len() < 6 {
                errors.push(FieldError::new(
                    "password",
                    "Password must be at least 6 characters",
                ));
            }
        }
        if let Some(role) = self.role_type.as_deref() {
            if Role::from_str(role).is_err() {
                errors.push(FieldError::new(
                    "role_type",
                    "Role type must be either \"user\" or \"admin\"",
                ));
            }
        }
        errors
    }
}

#[derive(Debug, Serialize)]
pub struct UserPage {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub data: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_listings: i64,
    pub total_admins: i64,
    pub recent_listings: Vec<RecentListing>,
}
