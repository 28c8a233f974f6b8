//! List CRUD and membership handlers.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use taskhub_core::models::{ListInput, ListMember, ListOutput, MemberInput, TodoList};
use taskhub_core::{paginate, Page, Principal, TaskhubError};

use crate::error::AppError;
use crate::middleware::ScopedIds;
use crate::state::AppState;

use super::PageQuery;

/// GET /todo/api/list — every list in the system (admin only).
pub async fn all_lists(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<ListOutput>>, AppError> {
    let lists = state.lists.all_lists().await?;
    let outputs: Vec<ListOutput> = lists.iter().map(ListOutput::from).collect();

    let page = paginate(
        &outputs,
        |l| l.id.to_string(),
        page.after.as_deref(),
        page.first,
    )?;
    Ok(Json(page))
}

/// POST /todo/api/list — create a list owned by the caller.
pub async fn create_list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<ListInput>,
) -> Result<(StatusCode, Json<ListOutput>), AppError> {
    if input.name.is_empty() {
        return Err(TaskhubError::Validation("list name is required".into()).into());
    }

    let list_id = Uuid::new_v4();
    state
        .lists
        .create_list(list_id, &input.name, &principal.username)
        .await?;

    tracing::info!(%list_id, name = %input.name, owner = %principal.username, "created list");
    Ok((
        StatusCode::CREATED,
        Json(ListOutput {
            id: list_id,
            name: input.name,
            owner: principal.username,
        }),
    ))
}

/// GET /todo/api/list/:list_id
pub async fn get_list(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
) -> Result<Json<TodoList>, AppError> {
    let list = state.lists.get_list(ids.list_id).await?;
    Ok(Json(list))
}

/// PUT /todo/api/list/:list_id — rename.
pub async fn update_list(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
    Json(input): Json<ListInput>,
) -> Result<Json<ListOutput>, AppError> {
    let updated = state.lists.update_list(ids.list_id, &input.name).await?;
    tracing::info!(list_id = %ids.list_id, name = %input.name, "renamed list");
    Ok(Json(ListOutput::from(&updated)))
}

/// DELETE /todo/api/list/:list_id
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
) -> Result<Json<TodoList>, AppError> {
    let deleted = state.lists.delete_list(ids.list_id).await?;
    tracing::info!(list_id = %ids.list_id, "deleted list");
    Ok(Json(deleted))
}

/// GET /todo/api/list/:list_id/users — the list with its membership.
pub async fn get_members(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
) -> Result<Json<TodoList>, AppError> {
    let list = state.lists.get_list(ids.list_id).await?;
    Ok(Json(list))
}

/// POST /todo/api/list/:list_id/users
pub async fn add_member(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
    Json(input): Json<MemberInput>,
) -> Result<Json<Value>, AppError> {
    if input.username.is_empty() {
        return Err(TaskhubError::Validation("username is required".into()).into());
    }

    state.lists.add_member(ids.list_id, &input.username).await?;
    tracing::info!(list_id = %ids.list_id, user = %input.username, "added member");
    Ok(Json(json!({
        "message": format!("added {} to list {}", input.username, ids.list_id)
    })))
}

fn username_param(params: &HashMap<String, String>) -> Result<&str, AppError> {
    match params.get("username").map(String::as_str) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(TaskhubError::Validation("username is required".into()).into()),
    }
}

/// GET /todo/api/list/:list_id/users/:username
pub async fn get_member(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<Json<ListMember>, AppError> {
    let username = username_param(&params)?;
    let member = state.lists.get_member(ids.list_id, username).await?;
    Ok(Json(member))
}

/// DELETE /todo/api/list/:list_id/users/:username — removing the owner
/// deletes the whole list.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
    Path(params): Path<HashMap<String, String>>,
) -> Result<Json<ListMember>, AppError> {
    let username = username_param(&params)?;
    let removed = state.lists.remove_member(ids.list_id, username).await?;
    tracing::info!(list_id = %ids.list_id, user = %username, "removed member");
    Ok(Json(removed))
}
