//! Verified identity claims and the capability gate.

use super::id::UserId;
use super::status::UserRole;

/// A verified identity claim attached to a request.
///
/// Produced by the HTTP layer after bearer-token verification. Operations
/// receive it as an explicit value; nothing in the workspace consults
/// ambient per-request state for who the caller is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The caller's user ID.
    pub user_id: UserId,
    /// The caller's username, as asserted by the credential service.
    pub username: String,
    /// The caller's role.
    pub role: UserRole,
}

/// Permission level required by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any verified identity.
    Authenticated,
    /// A verified identity whose role is admin.
    Admin,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authenticated => write!(f, "authenticated"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Raised when an identity lacks a required capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{required} capability required")]
pub struct CapabilityError {
    /// The capability the operation demanded.
    pub required: Capability,
}

impl Identity {
    /// Create an identity claim.
    #[must_use]
    pub fn new(user_id: UserId, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
        }
    }

    /// Whether this identity carries the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Pure pass/fail predicate for a required capability.
    #[must_use]
    pub const fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::Authenticated => true,
            Capability::Admin => self.is_admin(),
        }
    }

    /// Demand a capability, failing if this identity does not grant it.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when the capability is not granted.
    pub const fn require(&self, capability: Capability) -> Result<(), CapabilityError> {
        if self.grants(capability) {
            Ok(())
        } else {
            Err(CapabilityError {
                required: capability,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shopper() -> Identity {
        Identity::new(UserId::new(7), "bob", UserRole::User)
    }

    fn operator() -> Identity {
        Identity::new(UserId::new(1), "alice", UserRole::Admin)
    }

    #[test]
    fn every_identity_grants_authenticated() {
        assert!(shopper().grants(Capability::Authenticated));
        assert!(operator().grants(Capability::Authenticated));
    }

    #[test]
    fn only_admins_grant_admin() {
        assert!(!shopper().grants(Capability::Admin));
        assert!(operator().grants(Capability::Admin));
    }

    #[test]
    fn require_reports_the_missing_capability() {
        let err = shopper().require(Capability::Admin).unwrap_err();
        assert_eq!(err.required, Capability::Admin);
        assert_eq!(err.to_string(), "admin capability required");
    }
}
