//! Role directives guarding the resolver operations.
//!
//! Resource scoping (membership/ownership) stays with the REST backend the
//! gateway proxies; the directives only enforce rank.

use taskhub_core::error::{Result, TaskhubError};
use taskhub_core::{Principal, Role};

pub fn require_permission(principal: &Principal, required: Role) -> Result<()> {
    if principal.role == Role::Unknown {
        return Err(TaskhubError::Validation("providing role is required".into()));
    }
    principal.require(required)
}
