//! Taskhub REST server library.
//!
//! `main.rs` wires Postgres-backed stores into [`state::AppState`] and
//! serves [`router::build_router`]. The library split exists so the
//! integration tests can build the same router over in-memory stores.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
