//! List and todo store adapters.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskhub_core::error::{Result, TaskhubError};
use taskhub_core::models::{ListMember, Todo, TodoList, TodoPriority, TodoStatus, TodoUpdate};
use taskhub_core::ports::{ListStore, TodoStore};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Translate a sqlx error into the typed taxonomy. Constraint violations
/// become `Conflict`/`NotFound`; everything else is `Internal` and will be
/// logged at the boundary, never shown to callers.
fn translate(err: sqlx::Error, conflict: &str, missing: &str) -> TaskhubError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return TaskhubError::Conflict(conflict.to_string()),
            Some(FOREIGN_KEY_VIOLATION) => return TaskhubError::NotFound(missing.to_string()),
            _ => {}
        }
    }
    TaskhubError::Internal(anyhow!(err))
}

// ============================================================================
// Private FromRow types — converted to core models via From
// ============================================================================

#[derive(sqlx::FromRow)]
struct ListRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    list_id: Uuid,
    username: String,
    is_owner: bool,
}

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    list_id: Uuid,
    name: String,
    description: String,
    deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    assignee: Option<String>,
    status: String,
    priority: String,
}

impl From<TodoRow> for Todo {
    fn from(r: TodoRow) -> Self {
        Self {
            id: r.id,
            list_id: r.list_id,
            name: r.name,
            description: r.description,
            deadline: r.deadline,
            created_at: r.created_at,
            assignee: r.assignee.filter(|a| !a.is_empty()),
            status: TodoStatus::parse(&r.status),
            priority: TodoPriority::parse(&r.priority),
        }
    }
}

// ── PgListStore ───────────────────────────────────────────────

/// Postgres-backed list and membership store.
pub struct PgListStore {
    pool: PgPool,
}

impl PgListStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn memberships(&self, list_id: Uuid) -> Result<Vec<MembershipRow>> {
        sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT list_id, username, is_owner
            FROM users_lists
            WHERE list_id = $1
            ORDER BY username
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskhubError::Internal(anyhow!(e)))
    }
}

#[async_trait]
impl ListStore for PgListStore {
    async fn get_list(&self, list_id: Uuid) -> Result<TodoList> {
        let row = sqlx::query_as::<_, ListRow>(
            r#"SELECT id, name, created_at FROM list WHERE id = $1"#,
        )
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskhubError::Internal(anyhow!(e)))?
        .ok_or_else(|| TaskhubError::NotFound(format!("list {list_id}")))?;

        let memberships = self.memberships(list_id).await?;
        let owner = memberships
            .iter()
            .find(|m| m.is_owner)
            .map(|m| m.username.clone())
            .ok_or_else(|| TaskhubError::Internal(anyhow!("list {list_id} has no owner")))?;

        Ok(TodoList {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            owner,
            members: memberships.into_iter().map(|m| m.username).collect(),
        })
    }

    async fn all_lists(&self) -> Result<Vec<TodoList>> {
        let ids = sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM list ORDER BY name"#)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))?;

        let mut lists = Vec::with_capacity(ids.len());
        for id in ids {
            lists.push(self.get_list(id).await?);
        }
        Ok(lists)
    }

    async fn create_list(&self, list_id: Uuid, name: &str, owner: &str) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))?;

        sqlx::query(r#"INSERT INTO list (id, name) VALUES ($1, $2)"#)
            .bind(list_id)
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                translate(
                    e,
                    &format!("list with name {name} already exists"),
                    &format!("list {list_id}"),
                )
            })?;

        sqlx::query(
            r#"INSERT INTO users_lists (list_id, username, is_owner) VALUES ($1, $2, TRUE)"#,
        )
        .bind(list_id)
        .bind(owner)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            translate(
                e,
                &format!("{owner} is already a member of list {list_id}"),
                &format!("list {list_id}"),
            )
        })?;

        tx.commit()
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))
    }

    async fn update_list(&self, list_id: Uuid, name: &str) -> Result<TodoList> {
        if name.is_empty() {
            return Err(TaskhubError::Validation("list name is required".into()));
        }

        let result = sqlx::query(r#"UPDATE list SET name = $1 WHERE id = $2"#)
            .bind(name)
            .bind(list_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                translate(
                    e,
                    &format!("list with name {name} already exists"),
                    &format!("list {list_id}"),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(TaskhubError::NotFound(format!("list {list_id}")));
        }

        self.get_list(list_id).await
    }

    async fn delete_list(&self, list_id: Uuid) -> Result<TodoList> {
        let deleted = self.get_list(list_id).await?;

        let result = sqlx::query(r#"DELETE FROM list WHERE id = $1"#)
            .bind(list_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))?;

        if result.rows_affected() == 0 {
            return Err(TaskhubError::NotFound(format!("list {list_id}")));
        }

        Ok(deleted)
    }

    async fn add_member(&self, list_id: Uuid, username: &str) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO users_lists (list_id, username, is_owner) VALUES ($1, $2, FALSE)"#,
        )
        .bind(list_id)
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            translate(
                e,
                &format!("{username} is already a member of list {list_id}"),
                &format!("list {list_id}"),
            )
        })?;

        Ok(())
    }

    async fn remove_member(&self, list_id: Uuid, username: &str) -> Result<ListMember> {
        let member = self.get_member(list_id, username).await?;

        // Removing the owner removes the whole list.
        if member.is_owner {
            self.delete_list(list_id).await?;
            return Ok(member);
        }

        let result =
            sqlx::query(r#"DELETE FROM users_lists WHERE list_id = $1 AND username = $2"#)
                .bind(list_id)
                .bind(username)
                .execute(&self.pool)
                .await
                .map_err(|e| TaskhubError::Internal(anyhow!(e)))?;

        if result.rows_affected() == 0 {
            return Err(TaskhubError::NotFound(format!(
                "user {username} in list {list_id}"
            )));
        }

        Ok(member)
    }

    async fn get_member(&self, list_id: Uuid, username: &str) -> Result<ListMember> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT list_id, username, is_owner
            FROM users_lists
            WHERE list_id = $1 AND username = $2
            "#,
        )
        .bind(list_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskhubError::Internal(anyhow!(e)))?
        .ok_or_else(|| TaskhubError::NotFound(format!("user {username} in list {list_id}")))?;

        let list_name = sqlx::query_scalar::<_, String>(r#"SELECT name FROM list WHERE id = $1"#)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))?
            .ok_or_else(|| TaskhubError::NotFound(format!("list {list_id}")))?;

        Ok(ListMember {
            list_id: row.list_id,
            list_name,
            username: row.username,
            is_owner: row.is_owner,
        })
    }

    async fn is_member(&self, list_id: Uuid, username: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users_lists WHERE list_id = $1 AND username = $2)"#,
        )
        .bind(list_id)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskhubError::Internal(anyhow!(e)))
    }

    async fn is_owner(&self, list_id: Uuid, username: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users_lists
                WHERE list_id = $1 AND username = $2 AND is_owner = TRUE
            )
            "#,
        )
        .bind(list_id)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskhubError::Internal(anyhow!(e)))
    }
}

// ── PgTodoStore ───────────────────────────────────────────────

/// Postgres-backed todo store.
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TODO_COLUMNS: &str =
    "id, list_id, name, description, deadline, created_at, assignee, status, priority";

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn get_todo(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo> {
        let query =
            format!(r#"SELECT {TODO_COLUMNS} FROM todo WHERE id = $1 AND list_id = $2"#);
        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(todo_id)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))?
            .ok_or_else(|| {
                TaskhubError::NotFound(format!("todo {todo_id} in list {list_id}"))
            })?;

        Ok(row.into())
    }

    async fn todos_for_list(&self, list_id: Uuid) -> Result<Vec<Todo>> {
        let query =
            format!(r#"SELECT {TODO_COLUMNS} FROM todo WHERE list_id = $1 ORDER BY name"#);
        let rows = sqlx::query_as::<_, TodoRow>(&query)
            .bind(list_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_todo(&self, todo: &Todo) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO todo (id, list_id, name, description, deadline, status, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(todo.id)
        .bind(todo.list_id)
        .bind(&todo.name)
        .bind(&todo.description)
        .bind(todo.deadline)
        .bind(todo.status.as_str())
        .bind(todo.priority.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            translate(
                e,
                &format!(
                    "todo with name {} already exists in list {}",
                    todo.name, todo.list_id
                ),
                &format!("list {}", todo.list_id),
            )
        })?;

        Ok(())
    }

    async fn update_todo(
        &self,
        list_id: Uuid,
        todo_id: Uuid,
        update: &TodoUpdate,
    ) -> Result<Todo> {
        let current = self.get_todo(list_id, todo_id).await?;

        // Partial update: absent fields keep their stored values.
        let name = update.name.as_deref().unwrap_or(&current.name);
        let description = update
            .description
            .as_deref()
            .unwrap_or(&current.description);
        let deadline = update.deadline.or(current.deadline);
        let priority = update.priority.unwrap_or(current.priority);

        let result = sqlx::query(
            r#"
            UPDATE todo
            SET name = $1, description = $2, deadline = $3, priority = $4
            WHERE id = $5 AND list_id = $6
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(deadline)
        .bind(priority.as_str())
        .bind(todo_id)
        .bind(list_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            translate(
                e,
                &format!("todo with name {name} already exists in list {list_id}"),
                &format!("todo {todo_id} in list {list_id}"),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(TaskhubError::NotFound(format!(
                "todo {todo_id} in list {list_id}"
            )));
        }

        self.get_todo(list_id, todo_id).await
    }

    async fn delete_todo(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo> {
        let deleted = self.get_todo(list_id, todo_id).await?;

        let result = sqlx::query(r#"DELETE FROM todo WHERE id = $1 AND list_id = $2"#)
            .bind(todo_id)
            .bind(list_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))?;

        if result.rows_affected() == 0 {
            return Err(TaskhubError::NotFound(format!(
                "todo {todo_id} in list {list_id}"
            )));
        }

        Ok(deleted)
    }

    async fn assign_todo(&self, list_id: Uuid, todo_id: Uuid, username: &str) -> Result<()> {
        if username.is_empty() {
            return Err(TaskhubError::Validation("username is required".into()));
        }

        let current = self.get_todo(list_id, todo_id).await?;
        if let Some(assignee) = current.assignee {
            return Err(TaskhubError::Conflict(format!(
                "cannot assign {username}: {assignee} is already assigned to todo {todo_id}"
            )));
        }

        let result = sqlx::query(
            r#"UPDATE todo SET assignee = $1, status = $2 WHERE id = $3 AND list_id = $4"#,
        )
        .bind(username)
        .bind(TodoStatus::Assigned.as_str())
        .bind(todo_id)
        .bind(list_id)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskhubError::Internal(anyhow!(e)))?;

        if result.rows_affected() == 0 {
            return Err(TaskhubError::NotFound(format!(
                "todo {todo_id} in list {list_id}"
            )));
        }

        Ok(())
    }

    async fn advance_status(&self, list_id: Uuid, todo_id: Uuid) -> Result<Todo> {
        let current = self.get_todo(list_id, todo_id).await?;
        let next = current.status.next();

        let result = sqlx::query(r#"UPDATE todo SET status = $1 WHERE id = $2 AND list_id = $3"#)
            .bind(next.as_str())
            .bind(todo_id)
            .bind(list_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskhubError::Internal(anyhow!(e)))?;

        if result.rows_affected() == 0 {
            return Err(TaskhubError::NotFound(format!(
                "todo {todo_id} in list {list_id}"
            )));
        }

        self.get_todo(list_id, todo_id).await
    }
}
