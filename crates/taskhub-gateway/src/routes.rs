//! Gateway router: one route per resolver operation.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use taskhub_core::models::{ListMember, ListOutput, Todo, TodoList};
use taskhub_core::{Principal, RoleDirectory};

use crate::error::AppError;
use crate::middleware::user_context;
use crate::model::{ListConnection, ListInput, ListView, TodoConnection, TodoMutationInput, UserInput};
use crate::services::{ListService, TodoService};

#[derive(Clone)]
pub struct GatewayState {
    pub lists: Arc<ListService>,
    pub todos: Arc<TodoService>,
    pub directory: Arc<RoleDirectory>,
}

/// `first`/`after` connection arguments.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectionQuery {
    pub first: Option<usize>,
    pub after: Option<String>,
}

pub fn build_router(state: GatewayState) -> Router {
    let operations = Router::new()
        // Queries
        .route("/lists", get(lists))
        .route("/list/:list_id", get(list).put(update_list_name).delete(delete_list))
        .route("/list/:list_id/users", get(users).post(add_user))
        .route(
            "/list/:list_id/users/:username",
            get(user).delete(remove_user),
        )
        .route("/list/:list_id/todos", get(todos))
        .route(
            "/list/:list_id/todo/:todo_id",
            get(todo).put(update_todo).delete(delete_todo),
        )
        // Mutations without a natural verb mapping
        .route("/list", post(create_list))
        .route("/list/:list_id/todo", post(create_todo))
        .route("/list/:list_id/todo/:todo_id/assign", post(assign_user))
        .route("/list/:list_id/todo/:todo_id/status", post(change_status))
        .layer(axum_mw::from_fn_with_state(state.clone(), user_context));

    Router::new()
        .nest("/graphql", operations)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// ── Query handlers ────────────────────────────────────────────

async fn lists(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ConnectionQuery>,
) -> Result<Json<ListConnection>, AppError> {
    let conn = state
        .lists
        .get_lists(&principal, query.first, query.after.as_deref())
        .await?;
    Ok(Json(conn))
}

async fn list(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<String>,
) -> Result<Json<ListView>, AppError> {
    Ok(Json(state.lists.get_list(&principal, &list_id).await?))
}

async fn users(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<String>,
) -> Result<Json<TodoList>, AppError> {
    Ok(Json(
        state.lists.get_users_from_list(&principal, &list_id).await?,
    ))
}

async fn user(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path((list_id, username)): Path<(String, String)>,
) -> Result<Json<ListMember>, AppError> {
    Ok(Json(
        state
            .lists
            .get_user_from_list(&principal, &list_id, &username)
            .await?,
    ))
}

async fn todos(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<String>,
    Query(query): Query<ConnectionQuery>,
) -> Result<Json<TodoConnection>, AppError> {
    let conn = state
        .todos
        .get_todos(&principal, &list_id, query.first, query.after.as_deref())
        .await?;
    Ok(Json(conn))
}

async fn todo(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path((list_id, todo_id)): Path<(String, String)>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(
        state.todos.get_todo(&principal, &list_id, &todo_id).await?,
    ))
}

// ── Mutation handlers ─────────────────────────────────────────

async fn create_list(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<ListInput>,
) -> Result<Json<ListOutput>, AppError> {
    Ok(Json(
        state.lists.create_list(&principal, &input.name).await?,
    ))
}

async fn update_list_name(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<String>,
    Json(input): Json<ListInput>,
) -> Result<Json<ListOutput>, AppError> {
    Ok(Json(
        state
            .lists
            .update_list_name(&principal, &list_id, &input.name)
            .await?,
    ))
}

async fn delete_list(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<String>,
) -> Result<Json<TodoList>, AppError> {
    Ok(Json(state.lists.delete_list(&principal, &list_id).await?))
}

async fn add_user(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<String>,
    Json(input): Json<UserInput>,
) -> Result<Json<Value>, AppError> {
    let message = state
        .lists
        .add_user(&principal, &list_id, &input.username)
        .await?;
    Ok(Json(json!({ "message": message })))
}

async fn remove_user(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path((list_id, username)): Path<(String, String)>,
) -> Result<Json<ListMember>, AppError> {
    Ok(Json(
        state
            .lists
            .remove_user(&principal, &list_id, &username)
            .await?,
    ))
}

async fn create_todo(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(list_id): Path<String>,
    Json(input): Json<TodoMutationInput>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(
        state.todos.create_todo(&principal, &list_id, &input).await?,
    ))
}

async fn update_todo(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path((list_id, todo_id)): Path<(String, String)>,
    Json(input): Json<TodoMutationInput>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(
        state
            .todos
            .update_todo(&principal, &list_id, &todo_id, &input)
            .await?,
    ))
}

async fn delete_todo(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path((list_id, todo_id)): Path<(String, String)>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(
        state
            .todos
            .delete_todo(&principal, &list_id, &todo_id)
            .await?,
    ))
}

async fn assign_user(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path((list_id, todo_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let message = state
        .todos
        .assign_user(&principal, &list_id, &todo_id)
        .await?;
    Ok(Json(json!({ "message": message })))
}

async fn change_status(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path((list_id, todo_id)): Path<(String, String)>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(
        state
            .todos
            .change_status(&principal, &list_id, &todo_id)
            .await?,
    ))
}
