//! Taskhub core — pure domain logic for the multi-user list/task manager.
//!
//! Holds the role hierarchy, the principal model, the error taxonomy, the
//! cursor paginator, and the storage port traits. No HTTP, no SQL: the
//! server and postgres crates depend on this crate, never the reverse.

pub mod error;
pub mod models;
pub mod pagination;
pub mod ports;
pub mod principal;
pub mod role;

pub use error::{Result, TaskhubError};
pub use pagination::{paginate, Page, PageInfo};
pub use principal::Principal;
pub use role::{Role, RoleDirectory};
