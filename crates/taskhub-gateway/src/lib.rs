//! Taskhub GraphQL gateway library.
//!
//! The gateway owns no data: every resolver operation proxies the REST
//! backend over HTTP, forwarding the caller's identity header. What it adds
//! on top is the role-directive layer and cursor pagination over the
//! proxied result sets. The generated-schema executor in front of these
//! services is an external collaborator; each resolver operation is exposed
//! as a route on the gateway router.

pub mod error;
pub mod middleware;
pub mod model;
pub mod permission;
pub mod routes;
pub mod services;
pub mod transport;
