//! Role hierarchy and the principal directory.
//!
//! Roles form a total order; every authorization question about rank reduces
//! to `satisfies`, which compares integer ranks. `Unknown` ranks below every
//! requirement, so an unresolved username can never pass a gate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Unknown,
    Reader,
    Writer,
    Owner,
    Admin,
}

impl Role {
    pub fn rank(self) -> i8 {
        match self {
            Role::Unknown => -1,
            Role::Reader => 1,
            Role::Writer => 2,
            Role::Owner => 3,
            Role::Admin => 4,
        }
    }

    /// True iff this role meets the required rank.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Unknown => "unknown",
            Role::Reader => "reader",
            Role::Writer => "writer",
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static username → role directory, supplied at construction.
///
/// Usernames absent from the directory resolve to `Role::Unknown`. The
/// directory is injected into router state rather than living in a global,
/// so tests and multiple server instances can carry different mappings.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    users: HashMap<String, Role>,
}

impl RoleDirectory {
    pub fn new(users: HashMap<String, Role>) -> Self {
        Self { users }
    }

    /// The directory shipped with the service configuration.
    pub fn with_defaults() -> Self {
        let users = HashMap::from([
            ("Niki".to_string(), Role::Admin),
            ("Ivan".to_string(), Role::Writer),
            ("Miro".to_string(), Role::Reader),
            ("Yosif".to_string(), Role::Writer),
        ]);
        Self { users }
    }

    pub fn role_of(&self, username: &str) -> Role {
        self.users.get(username).copied().unwrap_or(Role::Unknown)
    }
}
