//! Authentication payloads.
//!
//! The backend issues an opaque `access` / `refresh` token pair on login
//! and a new `access` token on refresh. Both are bearer strings; this crate
//! never inspects their contents.

use serde::{Deserialize, Serialize};

use crate::tenant::{RestaurantRef, TenantContext};

/// Token pair returned by `POST /api/auth/token/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    /// Short-lived bearer credential.
    pub access: String,
    /// Long-lived credential exchanged for new access tokens.
    pub refresh: String,
}

/// Body of `POST /api/auth/token/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginPayload {
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Restaurant slug, needed when the same e-mail exists in several
    /// restaurants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_slug: Option<String>,
}

impl LoginPayload {
    /// The same credentials without tenant information, for backends that
    /// do not accept `restaurant_slug`.
    pub fn without_tenant(&self) -> Self {
        Self {
            email: self.email.clone(),
            password: self.password.clone(),
            restaurant_slug: None,
        }
    }
}

/// Response of `POST /api/auth/token/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
    /// Flat restaurant id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    /// Flat restaurant slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_slug: Option<String>,
    /// Nested restaurant reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantRef>,
}

impl LoginResponse {
    /// The token pair carried by this response.
    pub fn tokens(&self) -> Tokens {
        Tokens {
            access: self.access.clone(),
            refresh: self.refresh.clone(),
        }
    }

    /// Tenant context carried by this response, falling back to the slug
    /// the user asked for.
    pub fn tenant(&self, requested_slug: Option<&str>) -> TenantContext {
        TenantContext::resolve(
            self.restaurant_id,
            self.restaurant_slug.as_deref(),
            self.restaurant.as_ref(),
            requested_slug,
        )
    }
}

/// Body of `POST /api/auth/token/refresh/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    /// The stored refresh token.
    pub refresh: String,
}

/// Body of `POST /api/auth/register/`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterPayload {
    /// Username; the backend derives one from the e-mail when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Account e-mail.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub password2: String,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Name of the restaurant created for a new owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    /// Slug of the restaurant created for a new owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_slug: Option<String>,
}

impl RegisterPayload {
    /// Whether this payload carries owner-onboarding fields.
    pub fn has_tenant_fields(&self) -> bool {
        self.restaurant_name.is_some() || self.restaurant_slug.is_some()
    }

    /// The payload accepted by single-tenant backends: restaurant fields
    /// removed.
    pub fn legacy(&self) -> Self {
        Self {
            restaurant_name: None,
            restaurant_slug: None,
            ..self.clone()
        }
    }
}

/// Response of `POST /api/auth/register/`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterResponse {
    /// New user id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// E-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Role granted to the new user.
    #[serde(default)]
    pub role: Option<String>,
    /// Restaurant created for the user.
    #[serde(default)]
    pub restaurant: Option<RestaurantRef>,
}

/// Current-user profile (`GET /api/auth/me/`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MeResponse {
    /// User id.
    pub id: i64,
    /// Username.
    pub username: String,
    /// E-mail.
    pub email: String,
    /// Role within the restaurant.
    #[serde(default)]
    pub role: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Nested restaurant reference.
    #[serde(default)]
    pub restaurant: Option<RestaurantRef>,
    /// Flat restaurant id.
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    /// Flat restaurant slug.
    #[serde(default)]
    pub restaurant_slug: Option<String>,
}

impl MeResponse {
    /// Tenant context carried by this profile.
    pub fn tenant(&self) -> TenantContext {
        TenantContext::resolve(
            self.restaurant_id,
            self.restaurant_slug.as_deref(),
            self.restaurant.as_ref(),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_payload_omits_missing_slug() {
        let payload = LoginPayload {
            email: "chef@example.com".into(),
            password: "pw".into(),
            restaurant_slug: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"email": "chef@example.com", "password": "pw"}));
    }

    #[test]
    fn login_response_tenant_from_nested_restaurant() {
        let res: LoginResponse = serde_json::from_value(json!({
            "access": "a",
            "refresh": "r",
            "restaurant": {"id": 7, "slug": "Bistro"}
        }))
        .unwrap();
        let tenant = res.tenant(None);
        assert_eq!(tenant.restaurant_id, Some(7));
        assert_eq!(tenant.restaurant_slug.unwrap().as_str(), "bistro");
        assert_eq!(res.tokens().access, "a");
    }

    #[test]
    fn legacy_register_payload_drops_restaurant_fields() {
        let payload = RegisterPayload {
            email: "owner@example.com".into(),
            password: "pw".into(),
            password2: "pw".into(),
            restaurant_name: Some("Bistro".into()),
            restaurant_slug: Some("bistro".into()),
            ..Default::default()
        };
        assert!(payload.has_tenant_fields());
        let legacy = payload.legacy();
        assert!(!legacy.has_tenant_fields());
        let value = serde_json::to_value(&legacy).unwrap();
        assert!(value.get("restaurant_name").is_none());
        assert_eq!(value["email"], "owner@example.com");
    }

    #[test]
    fn me_response_tolerates_missing_optional_fields() {
        let me: MeResponse = serde_json::from_value(json!({
            "id": 1,
            "username": "chef",
            "email": "chef@example.com",
            "restaurant_id": 3
        }))
        .unwrap();
        assert_eq!(me.tenant().restaurant_id, Some(3));
        assert!(me.role.is_none());
    }
}
