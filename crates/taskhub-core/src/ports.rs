//! Storage port traits. Implemented by taskhub-postgres — the server and
//! its middleware depend only on these traits, so tests can run against
//! in-memory implementations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ListMember, Todo, TodoList, TodoUpdate};

/// List and membership storage.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Load a list with its owner and members.
    async fn get_list(&self, list_id: Uuid) -> Result<TodoList>;

    /// All lists, sorted by name.
    async fn all_lists(&self) -> Result<Vec<TodoList>>;

    /// Create a list owned by `owner`; the owner becomes its first member.
    async fn create_list(&self, list_id: Uuid, name: &str, owner: &str) -> Result<()>;

    /// Rename a list.
    async fn update_list(&self, list_id: Uuid, name: &str) -> Result<TodoList>;

    /// Delete a list; memberships and todos go with it.
    async fn delete_list(&self, list_id: Uuid) -> Result<TodoList>;

    async fn add_member(&self, list_id: Uuid, username: &str) -> Result<()>;

    /// Remove a member. Removing the owner deletes the entire list.
    async fn remove_member(&self, list_id: Uuid, username: &str) -> Result<ListMember>;

    async fn get_member(&self, list_id: Uuid, username: &str) -> Result<ListMember>;

    async fn is_member(&self, list_id: Uuid, username: &str) -> Result<bool>;

    async fn is_owner(&self, list_id: Uuid, username: &str) -> Result<bool>;
}

/// Todo storage, always scoped to a list.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn get_todo(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo>;

    /// All todos of a list, sorted by name.
    async fn todos_for_list(&self, list_id: Uuid) -> Result<Vec<Todo>>;

    async fn create_todo(&self, todo: &Todo) -> Result<()>;

    async fn update_todo(&self, list_id: Uuid, todo_id: Uuid, update: &TodoUpdate)
        -> Result<Todo>;

    async fn delete_todo(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo>;

    /// Assign a user; fails with `Conflict` when an assignee already exists.
    /// Moves the status to `Assigned`.
    async fn assign_todo(&self, list_id: Uuid, todo_id: Uuid, username: &str) -> Result<()>;

    /// Advance the status one step along the progression.
    async fn advance_status(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo>;
}

/// Resource-scope questions the permission gate asks.
///
/// Implementations must resolve failures to `false` after logging them;
/// a store error must never read as membership.
#[async_trait]
pub trait ScopeResolver: Send + Sync {
    async fn is_member(&self, list_id: Uuid, username: &str) -> bool;

    async fn is_owner(&self, list_id: Uuid, username: &str) -> bool;
}

/// Adapter making any `ListStore` answer scope questions, with the
/// fail-closed logging contract applied in one place.
pub struct StoreScopeResolver<S> {
    store: S,
}

impl<S> StoreScopeResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> ScopeResolver for StoreScopeResolver<S>
where
    S: AsRef<dyn ListStore> + Send + Sync,
{
    async fn is_member(&self, list_id: Uuid, username: &str) -> bool {
        match self.store.as_ref().is_member(list_id, username).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!(%list_id, username, %err, "membership lookup failed");
                false
            }
        }
    }

    async fn is_owner(&self, list_id: Uuid, username: &str) -> bool {
        match self.store.as_ref().is_owner(list_id, username).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!(%list_id, username, %err, "ownership lookup failed");
                false
            }
        }
    }
}
