//! Restaurant staff accounts.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Role of a user within a restaurant.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum TeamRole {
    /// Restaurant owner; created at registration.
    Owner,
    /// Manager.
    Manager,
    /// Staff member.
    Staff,
    /// Read-only access.
    Viewer,
    /// Platform administrator.
    Admin,
}

impl TeamRole {
    /// Whether an owner may grant this role to a new team member.
    pub fn is_assignable(self) -> bool {
        matches!(self, Self::Manager | Self::Staff | Self::Viewer)
    }
}

/// A user account belonging to the current restaurant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    /// User id.
    pub id: i64,
    /// Username.
    pub username: String,
    /// E-mail.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Role.
    pub role: TeamRole,
    /// Whether the account may log in.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Restaurant id.
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    /// Restaurant slug.
    #[serde(default)]
    pub restaurant_slug: Option<String>,
}

/// Body of `POST /api/auth/users/`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewTeamMember {
    /// Username.
    pub username: String,
    /// E-mail.
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
    /// Role; never `OWNER` or `ADMIN`.
    pub role: TeamRole,
}

impl NewTeamMember {
    /// Build a new member request, rejecting roles that cannot be granted.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: TeamRole,
    ) -> Result<Self, ModelError> {
        if !role.is_assignable() {
            return Err(ModelError::RoleNotAssignable {
                role: role.to_string(),
            });
        }
        let password = password.into();
        Ok(Self {
            username: username.into(),
            email: email.into(),
            password2: password.clone(),
            password,
            first_name: None,
            last_name: None,
            role,
        })
    }
}

/// Body of `PATCH /api/auth/users/{id}/`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMemberUpdate {
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<TeamRole>,
    /// Activation flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_staff_roles_are_assignable() {
        use strum::IntoEnumIterator;
        let assignable: Vec<_> = TeamRole::iter().filter(|r| r.is_assignable()).collect();
        assert_eq!(
            assignable,
            vec![TeamRole::Manager, TeamRole::Staff, TeamRole::Viewer]
        );
    }

    #[test]
    fn new_member_rejects_owner() {
        let err = NewTeamMember::new("boss", "b@example.com", "pw", TeamRole::Owner).unwrap_err();
        assert_eq!(
            err,
            ModelError::RoleNotAssignable {
                role: "OWNER".into()
            }
        );
    }

    #[test]
    fn new_member_confirms_password() {
        let member = NewTeamMember::new("cook", "c@example.com", "pw", TeamRole::Staff).unwrap();
        assert_eq!(member.password, member.password2);
        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["role"], "STAFF");
    }
}
