//! Error types for the `kitchen-models` crate.
//!
//! Fallible constructors in this crate return variants of [`ModelError`].

/// Errors produced when constructing model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A restaurant slug was empty after normalisation.
    #[error("invalid restaurant slug \"{value}\": {reason}")]
    InvalidSlug {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A role that only the backend may grant was requested for a new member.
    #[error("role {role} cannot be assigned to a team member")]
    RoleNotAssignable {
        /// The rejected role.
        role: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_slug() {
        let err = ModelError::InvalidSlug {
            value: "  ".into(),
            reason: "must not be empty".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid restaurant slug \"  \": must not be empty"
        );
    }

    #[test]
    fn error_display_role() {
        let err = ModelError::RoleNotAssignable {
            role: "OWNER".into(),
        };
        assert_eq!(
            err.to_string(),
            "role OWNER cannot be assigned to a team member"
        );
    }
}
