use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One field-level validation problem, as surfaced in the `errors` array of
/// a 422 response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Lenient paging parameters shared by every paginated endpoint. Absent or
/// non-numeric values coerce to the defaults instead of rejecting the
/// request; `page` below 1 clamps to 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        lenient_i64(self.page.as_deref(), 1)
    }

    pub fn per_page(&self) -> i64 {
        lenient_i64(self.per_page.as_deref(), 10)
    }
}

pub(crate) fn lenient_i64(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// Coordinates supplied on the mobile listings query. Both must parse as
/// numbers and sit inside the geographic domain before storage is touched.
pub fn validate_coordinates(
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> Result<(f64, f64), Vec<FieldError>> {
    let mut errors = Vec::new();

    let lat = latitude.and_then(|s| s.trim().parse::<f64>().ok());
    let lon = longitude.and_then(|s| s.trim().parse::<f64>().ok());

    match lat {
        None => errors.push(FieldError::new("latitude", "Valid latitude is required")),
        Some(v) if !(-90.0..=90.0).contains(&v) => errors.push(FieldError::new(
            "latitude",
            "Latitude must be between -90 and 90",
        )),
        _ => {}
    }
    match lon {
        None => errors.push(FieldError::new("longitude", "Valid longitude is required")),
        Some(v) if !(-180.0..=180.0).contains(&v) => errors.push(FieldError::new(
            "longitude",
            "Longitude must be between -180 and 180",
        )),
        _ => {}
    }

    if errors.is_empty() {
        // Both parses succeeded if no errors were recorded.
        Ok((lat.unwrap_or_default(), lon.unwrap_or_default()))
    } else {
        Err(errors)
    }
}
