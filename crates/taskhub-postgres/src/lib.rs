//! Postgres implementations of the taskhub-core port traits.
//!
//! Each adapter is a newtype wrapping `PgPool`. All SQL is runtime-checked
//! (`sqlx::query`, not `sqlx::query!`) to avoid a compile-time database
//! requirement. Multi-statement writes run inside transactions.

mod store;

pub use store::{PgListStore, PgTodoStore};
