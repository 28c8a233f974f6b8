//! REST handlers for the list and todo resources.

pub mod lists;
pub mod todos;

use serde::Deserialize;

/// `first`/`after` query parameters shared by the collection endpoints,
/// with the cursor semantics of the core paginator.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub first: Option<usize>,
    pub after: Option<String>,
}

pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
