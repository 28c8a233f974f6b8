//! The authenticated caller identity.
//!
//! A `Principal` is resolved exactly once per request, at the server
//! boundary, from the `userId` header and the injected [`RoleDirectory`].
//! Everything downstream reads this struct; no handler or store ever
//! re-resolves a role from headers or globals.

use serde::Serialize;

use crate::error::{Result, TaskhubError};
use crate::role::{Role, RoleDirectory};

#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    /// Resolve a header-supplied username against the directory.
    /// Unknown usernames yield a principal with `Role::Unknown`; rejecting
    /// them is the existence gate's job, not the constructor's.
    pub fn resolve(username: impl Into<String>, directory: &RoleDirectory) -> Self {
        let username = username.into();
        let role = directory.role_of(&username);
        Self { username, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Rank check against a statically required role.
    pub fn require(&self, required: Role) -> Result<()> {
        if self.role.satisfies(required) {
            Ok(())
        } else {
            Err(TaskhubError::Authorization(format!(
                "{} is {} and does not have {} permission",
                self.username, self.role, required
            )))
        }
    }
}
