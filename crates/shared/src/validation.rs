//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// IANA timezone names like "Europe/Kyiv" or "America/Argentina/Ushuaia".
    static ref TIMEZONE_RE: Regex =
        Regex::new(r"^[A-Za-z_]+(/[A-Za-z0-9_+\-]+)+$").unwrap();

    /// Lowercase URL slugs like "kyiv" or "new-york".
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates an IANA timezone name ("Area/Location" form, or "UTC").
pub fn validate_timezone(tz: &str) -> Result<(), ValidationError> {
    if tz == "UTC" || TIMEZONE_RE.is_match(tz) {
        Ok(())
    } else {
        let mut err = ValidationError::new("timezone_format");
        err.message = Some("Timezone must be an IANA name like Europe/Kyiv".into());
        Err(err)
    }
}

/// Validates a URL slug (lowercase alphanumerics separated by single dashes).
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if (2..=64).contains(&slug.len()) && SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message = Some("Slug must be 2-64 lowercase alphanumerics and dashes".into());
        Err(err)
    }
}

/// Validates that a display name is not blank after trimming.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
