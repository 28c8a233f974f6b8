//! Todo CRUD handlers, all scoped to a list.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use taskhub_core::models::{MemberInput, Todo, TodoInput, TodoPriority, TodoStatus, TodoUpdate};
use taskhub_core::{paginate, Page, TaskhubError};

use crate::error::AppError;
use crate::middleware::ScopedIds;
use crate::state::AppState;

use super::PageQuery;

fn todo_id_of(ids: &ScopedIds) -> Result<Uuid, AppError> {
    ids.todo_id
        .ok_or_else(|| TaskhubError::Validation("todo ID is required".into()).into())
}

/// GET /todo/api/list/:list_id/todos
pub async fn todos_for_list(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<Todo>>, AppError> {
    let todos = state.todos.todos_for_list(ids.list_id).await?;
    let page = paginate(
        &todos,
        |t| t.id.to_string(),
        page.after.as_deref(),
        page.first,
    )?;
    Ok(Json(page))
}

/// GET /todo/api/list/:list_id/todo/:todo_id
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
) -> Result<Json<Todo>, AppError> {
    let todo_id = todo_id_of(&ids)?;
    let todo = state.todos.get_todo(ids.list_id, todo_id).await?;
    Ok(Json(todo))
}

/// POST /todo/api/list/:list_id/todo
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
    Json(input): Json<TodoInput>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    if input.name.is_empty() {
        return Err(TaskhubError::Validation("todo name is required".into()).into());
    }

    let todo = Todo {
        id: Uuid::new_v4(),
        list_id: ids.list_id,
        name: input.name,
        description: input.description.unwrap_or_default(),
        deadline: input.deadline,
        created_at: Utc::now(),
        assignee: None,
        status: TodoStatus::NotAssigned,
        priority: input.priority.unwrap_or(TodoPriority::Medium),
    };

    state.todos.create_todo(&todo).await?;
    tracing::info!(todo_id = %todo.id, list_id = %todo.list_id, name = %todo.name, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /todo/api/list/:list_id/todo/:todo_id — partial update.
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
    Json(update): Json<TodoUpdate>,
) -> Result<Json<Todo>, AppError> {
    let todo_id = todo_id_of(&ids)?;
    let updated = state.todos.update_todo(ids.list_id, todo_id, &update).await?;
    tracing::info!(%todo_id, list_id = %ids.list_id, "updated todo");
    Ok(Json(updated))
}

/// DELETE /todo/api/list/:list_id/todo/:todo_id
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
) -> Result<Json<Todo>, AppError> {
    let todo_id = todo_id_of(&ids)?;
    let deleted = state.todos.delete_todo(ids.list_id, todo_id).await?;
    tracing::info!(%todo_id, list_id = %ids.list_id, "deleted todo");
    Ok(Json(deleted))
}

/// PATCH /todo/api/list/:list_id/todo/:todo_id — assign a user.
pub async fn assign_todo(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
    Json(input): Json<MemberInput>,
) -> Result<Json<Value>, AppError> {
    let todo_id = todo_id_of(&ids)?;
    state
        .todos
        .assign_todo(ids.list_id, todo_id, &input.username)
        .await?;
    tracing::info!(%todo_id, list_id = %ids.list_id, user = %input.username, "assigned todo");
    Ok(Json(json!({
        "message": format!("assigned {} to todo {}", input.username, todo_id)
    })))
}

/// PATCH /todo/api/list/:list_id/todo/:todo_id/status — advance one step.
pub async fn advance_status(
    State(state): State<AppState>,
    Extension(ids): Extension<ScopedIds>,
) -> Result<Json<Todo>, AppError> {
    let todo_id = todo_id_of(&ids)?;
    let updated = state.todos.advance_status(ids.list_id, todo_id).await?;
    tracing::info!(%todo_id, list_id = %ids.list_id, status = %updated.status, "advanced todo status");
    Ok(Json(updated))
}
