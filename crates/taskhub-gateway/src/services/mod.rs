//! Resolver services: each proxies the REST backend and applies the role
//! directive for its operation.

pub mod lists;
pub mod todos;

use serde::de::DeserializeOwned;

use taskhub_core::error::{Result, TaskhubError};

pub use lists::ListService;
pub use todos::TodoService;

pub(crate) fn parse<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        TaskhubError::Internal(anyhow::anyhow!("invalid response from REST backend: {e}"))
    })
}
