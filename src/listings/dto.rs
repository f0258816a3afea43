use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::ListingWithOwner;
use crate::validate::{lenient_i64, FieldError};

/// Query string of `GET /api/listing/get`. Coordinates are validated by
/// hand so a bad value yields a 422 envelope rather than a bare rejection;
/// paging uses the shared lenient coercion.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListingQuery {
    pub fn page(&self) -> i64 {
        lenient_i64(self.page.as_deref(), 1)
    }

    pub fn per_page(&self) -> i64 {
        lenient_i64(self.per_page.as_deref(), 10)
    }
}

/// One mobile listing row: distance is a two-decimal string; description
/// and coordinates are intentionally absent from this shape.
#[derive(Debug, Serialize)]
pub struct ListingItem {
    pub id: i64,
    pub name: String,
    pub distance: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Mobile listings result. Carries the current page but no totals.
#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub current_page: i64,
    pub data: Vec<ListingItem>,
}

/// Admin listings result, totals included.
#[derive(Debug, Serialize)]
pub struct AdminListingPage {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub data: Vec<ListingWithOwner>,
}

#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateListingRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() && name.len() <= 255 => {}
            _ => errors.push(FieldError::new(
                "name",
                "Name is required and must be less than 255 characters",
            )),
        }
        match self.latitude {
            Some(lat) if (-90.0..=90.0).contains(&lat) => {}
            _ => errors.push(FieldError::new(
                "latitude",
                "Latitude must be between -90 and 90",
            )),
        }
        match self.longitude {
            Some(lon) if (-180.0..=180.0).contains(&lon) => {}
            _ => errors.push(FieldError::new(
                "longitude",
                "Longitude must be between -180 and 180",
            )),
        }
        match self.user_id {
            Some(id) if id >= 1 => {}
            _ => errors.push(FieldError::new(
                "user_id",
                "User ID must be a positive integer",
            )),
        }
        if let Some(description) = &self.description {
            if description.len() > 1000 {
                errors.push(FieldError::new(
                    "description",
                    "Description must be less than 1000 characters",
                ));
            }
        }
        errors
    }
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateListingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateListingRequest {
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
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                errors.push(FieldError::new(
                    "latitude",
                    "Latitude must be between -90 and 90",
                ));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                errors.push(FieldError::new(
                    "longitude",
                    "Longitude must be between -180 and 180",
                ));
            }
        }
        if let Some(id) = self.user_id {
            if id < 1 {
                errors.push(FieldError::new(
                    "user_id",
                    "User ID must be a positive integer",
                ));
            }
        }
        if let Some(description) = &self.description {
            if description.len() > 1000 {
                errors.push(FieldError::new(
                    "description",
                    "Description must be less than 1000 characters",
                ));
            }
        }
        errors
    }
}
