//! Restaurant (tenant) identity.
//!
//! Every user belongs to a restaurant. The backend identifies the active
//! restaurant either by numeric id or by slug; clients send whichever they
//! know in the `X-Restaurant-Id` / `X-Restaurant-Slug` headers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

// ---------------------------------------------------------------------------
// RestaurantSlug
// ---------------------------------------------------------------------------

/// A normalised restaurant slug: trimmed and lower-cased, never empty.
///
/// # Examples
///
/// ```
/// use kitchen_models::RestaurantSlug;
///
/// let slug = RestaurantSlug::new("  Chez-Louis ").unwrap();
/// assert_eq!(slug.as_str(), "chez-louis");
/// assert!(RestaurantSlug::new("   ").is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct RestaurantSlug(String);

impl RestaurantSlug {
    /// Normalise and validate a slug.
    pub fn new(raw: &str) -> Result<Self, ModelError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ModelError::InvalidSlug {
                value: raw.to_string(),
                reason: "must not be empty".into(),
            });
        }
        Ok(Self(normalized))
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestaurantSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RestaurantSlug {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RestaurantSlug {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RestaurantSlug> for String {
    fn from(slug: RestaurantSlug) -> Self {
        slug.0
    }
}

// ---------------------------------------------------------------------------
// RestaurantRef / RestaurantDetails
// ---------------------------------------------------------------------------

/// Compact restaurant reference embedded in user and login payloads.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantRef {
    /// Restaurant id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw slug as returned by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Full restaurant record (`GET /api/auth/my-restaurants/`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RestaurantDetails {
    /// Restaurant id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Slug.
    pub slug: String,
    /// Whether the restaurant is active.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Subscription tier label.
    #[serde(default)]
    pub subscription_tier: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Tenant context extracted from a backend response.
///
/// Login and profile responses carry the restaurant either as flat
/// `restaurant_id` / `restaurant_slug` fields or nested under `restaurant`;
/// flat fields win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    /// Restaurant id, if known.
    pub restaurant_id: Option<i64>,
    /// Restaurant slug, if known.
    pub restaurant_slug: Option<RestaurantSlug>,
}

impl TenantContext {
    /// Resolve tenant context from flat and nested fields, falling back to
    /// `requested_slug` when the response names no slug.
    pub fn resolve(
        flat_id: Option<i64>,
        flat_slug: Option<&str>,
        nested: Option<&RestaurantRef>,
        requested_slug: Option<&str>,
    ) -> Self {
        let restaurant_id = flat_id.or_else(|| nested.and_then(|r| r.id));
        let restaurant_slug = [
            flat_slug,
            nested.and_then(|r| r.slug.as_deref()),
            requested_slug,
        ]
        .into_iter()
        .flatten()
        .find_map(|s| RestaurantSlug::new(s).ok());

        Self {
            restaurant_id,
            restaurant_slug,
        }
    }
}
