//! HTTP-level integration tests for the permission gate and the REST
//! pagination contract.
//!
//! The router is built over in-memory stores, so the suite runs without a
//! database; the gate middleware, status mapping, and handler plumbing are
//! exactly the production code paths.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use chrono::Utc;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use taskhub_core::error::{Result, TaskhubError};
use taskhub_core::models::{ListMember, Todo, TodoList, TodoPriority, TodoStatus, TodoUpdate};
use taskhub_core::ports::{ListStore, StoreScopeResolver, TodoStore};
use taskhub_core::RoleDirectory;
use taskhub_server::router::build_router;
use taskhub_server::state::AppState;

// ── In-memory stores ──────────────────────────────────────────

#[derive(Default)]
struct MemStore {
    lists: Mutex<Vec<TodoList>>,
    todos: Mutex<Vec<Todo>>,
}

impl MemStore {
    fn seed_list(&self, id: Uuid, name: &str, owner: &str, members: &[&str]) {
        let mut all = vec![owner.to_string()];
        all.extend(members.iter().map(|m| m.to_string()));
        self.lists.lock().unwrap().push(TodoList {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
            owner: owner.to_string(),
            members: all,
        });
    }

    fn seed_todo(&self, id: Uuid, list_id: Uuid, name: &str) {
        self.todos.lock().unwrap().push(Todo {
            id,
            list_id,
            name: name.to_string(),
            description: String::new(),
            deadline: None,
            created_at: Utc::now(),
            assignee: None,
            status: TodoStatus::NotAssigned,
            priority: TodoPriority::Medium,
        });
    }
}

#[async_trait]
impl ListStore for MemStore {
    async fn get_list(&self, list_id: Uuid) -> Result<TodoList> {
        self.lists
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == list_id)
            .cloned()
            .ok_or_else(|| TaskhubError::NotFound(format!("list {list_id}")))
    }

    async fn all_lists(&self) -> Result<Vec<TodoList>> {
        let mut lists = self.lists.lock().unwrap().clone();
        lists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lists)
    }

    async fn create_list(&self, list_id: Uuid, name: &str, owner: &str) -> Result<()> {
        let mut lists = self.lists.lock().unwrap();
        if lists.iter().any(|l| l.name == name) {
            return Err(TaskhubError::Conflict(format!(
                "list with name {name} already exists"
            )));
        }
        lists.push(TodoList {
            id: list_id,
            name: name.to_string(),
            created_at: Utc::now(),
            owner: owner.to_string(),
            members: vec![owner.to_string()],
        });
        Ok(())
    }

    async fn update_list(&self, list_id: Uuid, name: &str) -> Result<TodoList> {
        let mut lists = self.lists.lock().unwrap();
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("list {list_id}")))?;
        list.name = name.to_string();
        Ok(list.clone())
    }

    async fn delete_list(&self, list_id: Uuid) -> Result<TodoList> {
        let mut lists = self.lists.lock().unwrap();
        let pos = lists
            .iter()
            .position(|l| l.id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("list {list_id}")))?;
        self.todos.lock().unwrap().retain(|t| t.list_id != list_id);
        Ok(lists.remove(pos))
    }

    async fn add_member(&self, list_id: Uuid, username: &str) -> Result<()> {
        let mut lists = self.lists.lock().unwrap();
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("list {list_id}")))?;
        if list.members.iter().any(|m| m == username) {
            return Err(TaskhubError::Conflict(format!(
                "{username} is already a member of list {list_id}"
            )));
        }
        list.members.push(username.to_string());
        Ok(())
    }

    async fn remove_member(&self, list_id: Uuid, username: &str) -> Result<ListMember> {
        let member = self.get_member(list_id, username).await?;
        if member.is_owner {
            self.delete_list(list_id).await?;
            return Ok(member);
        }
        let mut lists = self.lists.lock().unwrap();
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("list {list_id}")))?;
        list.members.retain(|m| m != username);
        Ok(member)
    }

    async fn get_member(&self, list_id: Uuid, username: &str) -> Result<ListMember> {
        let lists = self.lists.lock().unwrap();
        let list = lists
            .iter()
            .find(|l| l.id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("list {list_id}")))?;
        if !list.members.iter().any(|m| m == username) {
            return Err(TaskhubError::NotFound(format!(
                "user {username} in list {list_id}"
            )));
        }
        Ok(ListMember {
            list_id,
            list_name: list.name.clone(),
            username: username.to_string(),
            is_owner: list.owner == username,
        })
    }

    async fn is_member(&self, list_id: Uuid, username: &str) -> Result<bool> {
        let lists = self.lists.lock().unwrap();
        Ok(lists
            .iter()
            .find(|l| l.id == list_id)
            .map(|l| l.members.iter().any(|m| m == username))
            .unwrap_or(false))
    }

    async fn is_owner(&self, list_id: Uuid, username: &str) -> Result<bool> {
        let lists = self.lists.lock().unwrap();
        Ok(lists
            .iter()
            .find(|l| l.id == list_id)
            .map(|l| l.owner == username)
            .unwrap_or(false))
    }
}

#[async_trait]
impl TodoStore for MemStore {
    async fn get_todo(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo> {
        self.todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == todo_id && t.list_id == list_id)
            .cloned()
            .ok_or_else(|| TaskhubError::NotFound(format!("todo {todo_id} in list {list_id}")))
    }

    async fn todos_for_list(&self, list_id: Uuid) -> Result<Vec<Todo>> {
        let mut todos: Vec<Todo> = self
            .todos
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.list_id == list_id)
            .cloned()
            .collect();
        todos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(todos)
    }

    async fn create_todo(&self, todo: &Todo) -> Result<()> {
        let mut todos = self.todos.lock().unwrap();
        if todos
            .iter()
            .any(|t| t.list_id == todo.list_id && t.name == todo.name)
        {
            return Err(TaskhubError::Conflict(format!(
                "todo with name {} already exists in list {}",
                todo.name, todo.list_id
            )));
        }
        todos.push(todo.clone());
        Ok(())
    }

    async fn update_todo(
        &self,
        list_id: Uuid,
        todo_id: Uuid,
        update: &TodoUpdate,
    ) -> Result<Todo> {
        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == todo_id && t.list_id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("todo {todo_id} in list {list_id}")))?;
        if let Some(name) = &update.name {
            todo.name = name.clone();
        }
        if let Some(description) = &update.description {
            todo.description = description.clone();
        }
        if update.deadline.is_some() {
            todo.deadline = update.deadline;
        }
        if let Some(priority) = update.priority {
            todo.priority = priority;
        }
        Ok(todo.clone())
    }

    async fn delete_todo(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo> {
        let mut todos = self.todos.lock().unwrap();
        let pos = todos
            .iter()
            .position(|t| t.id == todo_id && t.list_id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("todo {todo_id} in list {list_id}")))?;
        Ok(todos.remove(pos))
    }

    async fn assign_todo(&self, list_id: Uuid, todo_id: Uuid, username: &str) -> Result<()> {
        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == todo_id && t.list_id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("todo {todo_id} in list {list_id}")))?;
        if let Some(assignee) = &todo.assignee {
            return Err(TaskhubError::Conflict(format!(
                "cannot assign {username}: {assignee} is already assigned"
            )));
        }
        todo.assignee = Some(username.to_string());
        todo.status = TodoStatus::Assigned;
        Ok(())
    }

    async fn advance_status(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo> {
        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == todo_id && t.list_id == list_id)
            .ok_or_else(|| TaskhubError::NotFound(format!("todo {todo_id} in list {list_id}")))?;
        todo.status = todo.status.next();
        Ok(todo.clone())
    }
}

// ── Test app builder ──────────────────────────────────────────

struct Fixture {
    app: axum::Router,
    list_id: Uuid,
    todo_ids: Vec<Uuid>,
}

/// A list owned by Ivan (writer) with Miro (reader) as a member, holding
/// three todos named a/b/c so name ordering matches insertion order.
fn fixture() -> Fixture {
    let store = Arc::new(MemStore::default());

    let list_id = Uuid::new_v4();
    store.seed_list(list_id, "chores", "Ivan", &["Miro"]);

    let todo_ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    store.seed_todo(todo_ids[0], list_id, "a-sweep");
    store.seed_todo(todo_ids[1], list_id, "b-dust");
    store.seed_todo(todo_ids[2], list_id, "c-mop");

    let lists: Arc<dyn ListStore> = store.clone();
    let todos: Arc<dyn TodoStore> = store;
    let scope = Arc::new(StoreScopeResolver::new(Arc::clone(&lists)));

    let state = AppState::new(lists, todos, scope, RoleDirectory::with_defaults());
    Fixture {
        app: build_router(state),
        list_id,
        todo_ids,
    }
}

fn get(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("userId", user)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, user: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("userId", user)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ── Gate: existence stage ─────────────────────────────────────

#[tokio::test]
async fn unknown_principal_is_401_on_any_gated_route() {
    let fx = fixture();
    for uri in [
        "/todo/api/list".to_string(),
        format!("/todo/api/list/{}", fx.list_id),
        format!("/todo/api/list/{}/todos", fx.list_id),
    ] {
        let resp = fx.app.clone().oneshot(get(&uri, "Ghost")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn missing_user_header_is_401() {
    let fx = fixture();
    let req = Request::builder()
        .method("GET")
        .uri("/todo/api/list")
        .body(Body::empty())
        .unwrap();
    let resp = fx.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Gate: static role stage ───────────────────────────────────

#[tokio::test]
async fn reader_is_403_on_writer_route() {
    let fx = fixture();
    let req = send_json(
        "POST",
        "/todo/api/list",
        "Miro",
        serde_json::json!({ "name": "new-list" }),
    );
    let resp = fx.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_is_403_on_admin_route() {
    let fx = fixture();
    let resp = fx.app.oneshot(get("/todo/api/list", "Ivan")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_passes_admin_route() {
    let fx = fixture();
    let resp = fx.app.oneshot(get("/todo/api/list", "Niki")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn role_stage_runs_before_scope_stage() {
    let fx = fixture();
    // Miro is a member of the list but only a reader: the rank stage must
    // reject todo creation before any membership lookup happens.
    let uri = format!("/todo/api/list/{}/todo", fx.list_id);
    let req = send_json("POST", &uri, "Miro", serde_json::json!({ "name": "x" }));
    let resp = fx.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ── Gate: identity validation precedes scope ──────────────────

#[tokio::test]
async fn malformed_list_id_is_400_even_for_non_member() {
    let fx = fixture();
    let resp = fx
        .app
        .oneshot(get("/todo/api/list/not-a-uuid", "Yosif"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_todo_id_is_400() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}/todo/banana", fx.list_id);
    let resp = fx.app.oneshot(get(&uri, "Ivan")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Gate: resource scope stage ────────────────────────────────

#[tokio::test]
async fn member_reads_list() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}", fx.list_id);
    let resp = fx.app.oneshot(get(&uri, "Miro")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "chores");
    assert_eq!(body["owner"], "Ivan");
}

#[tokio::test]
async fn non_member_writer_is_403_on_member_route() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}", fx.list_id);
    let resp = fx.app.oneshot(get(&uri, "Yosif")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn member_non_owner_is_403_on_owner_route() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}", fx.list_id);
    let req = send_json("PUT", &uri, "Miro", serde_json::json!({ "name": "renamed" }));
    let resp = fx.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_bypasses_scope_on_owner_route() {
    let fx = fixture();
    // Niki belongs to no list at all; admin rank overrides scope.
    let uri = format!("/todo/api/list/{}", fx.list_id);
    let req = send_json("PUT", &uri, "Niki", serde_json::json!({ "name": "renamed" }));
    let resp = fx.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "renamed");
}

#[tokio::test]
async fn admin_bypasses_scope_on_member_route() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}/todos", fx.list_id);
    let resp = fx.app.oneshot(get(&uri, "Niki")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn owner_manages_membership() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}/users", fx.list_id);
    let req = send_json("POST", &uri, "Ivan", serde_json::json!({ "username": "Yosif" }));
    let resp = fx.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Duplicate membership is a conflict.
    let req = send_json("POST", &uri, "Ivan", serde_json::json!({ "username": "Yosif" }));
    let resp = fx.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ── CRUD status mapping ───────────────────────────────────────

#[tokio::test]
async fn create_list_returns_201_then_409_on_duplicate() {
    let fx = fixture();
    let req = send_json(
        "POST",
        "/todo/api/list",
        "Ivan",
        serde_json::json!({ "name": "errands" }),
    );
    let resp = fx.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["owner"], "Ivan");

    let req = send_json(
        "POST",
        "/todo/api/list",
        "Ivan",
        serde_json::json!({ "name": "errands" }),
    );
    let resp = fx.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_todo_is_404() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}/todo/{}", fx.list_id, Uuid::new_v4());
    let resp = fx.app.oneshot(get(&uri, "Ivan")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assign_then_advance_status() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}/todo/{}", fx.list_id, fx.todo_ids[0]);
    let req = send_json("PATCH", &uri, "Ivan", serde_json::json!({ "username": "Miro" }));
    let resp = fx.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let status_uri = format!("{uri}/status");
    let req = Request::builder()
        .method("PATCH")
        .uri(&status_uri)
        .header("userId", "Ivan")
        .body(Body::empty())
        .unwrap();
    let resp = fx.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "In Progress");
}

// ── Pagination over REST ──────────────────────────────────────

#[tokio::test]
async fn todos_first_two_then_rest_via_end_cursor() {
    let fx = fixture();
    let uri = format!("/todo/api/list/{}/todos?first=2", fx.list_id);
    let resp = fx.app.clone().oneshot(get(&uri, "Ivan")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    assert_eq!(body["total_count"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["page_info"]["has_next_page"], true);
    let end_cursor = body["page_info"]["end_cursor"].as_str().unwrap().to_string();
    assert_eq!(end_cursor, fx.todo_ids[1].to_string());

    let uri = format!(
        "/todo/api/list/{}/todos?first=2&after={}",
        fx.list_id, end_cursor
    );
    let resp = fx.app.oneshot(get(&uri, "Ivan")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["page_info"]["has_next_page"], false);
}

#[tokio::test]
async fn unknown_cursor_is_404() {
    let fx = fixture();
    let uri = format!(
        "/todo/api/list/{}/todos?first=1&after={}",
        fx.list_id,
        Uuid::new_v4()
    );
    let resp = fx.app.oneshot(get(&uri, "Ivan")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cursor_at_last_todo_is_416() {
    let fx = fixture();
    let uri = format!(
        "/todo/api/list/{}/todos?first=1&after={}",
        fx.list_id, fx.todo_ids[2]
    );
    let resp = fx.app.oneshot(get(&uri, "Ivan")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
}

// ── Internal errors never leak ────────────────────────────────

#[tokio::test]
async fn error_bodies_are_structured_json() {
    let fx = fixture();
    let resp = fx.app.oneshot(get("/todo/api/list", "Ivan")).await.unwrap();
    let body = body_json(resp).await;
    assert!(body["error"].is_string());
}
