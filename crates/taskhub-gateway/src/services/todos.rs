//! Todo resolver service.

use std::sync::Arc;

use serde_json::json;

use taskhub_core::error::Result;
use taskhub_core::models::Todo;
use taskhub_core::{paginate, Page, Principal, Role};

use crate::model::{TodoConnection, TodoMutationInput};
use crate::permission::require_permission;
use crate::transport::RestTransport;

use super::parse;

pub struct TodoService {
    transport: Arc<dyn RestTransport>,
}

impl TodoService {
    pub fn new(transport: Arc<dyn RestTransport>) -> Self {
        Self { transport }
    }

    pub async fn create_todo(
        &self,
        principal: &Principal,
        list_id: &str,
        input: &TodoMutationInput,
    ) -> Result<Todo> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "POST",
                &format!("/todo/api/list/{list_id}/todo"),
                Some(json!({
                    "name": input.name,
                    "description": input.description,
                    "deadline": input.deadline,
                    "priority": input.priority,
                })),
                &principal.username,
                201,
            )
            .await?;
        parse(&body)
    }

    pub async fn update_todo(
        &self,
        principal: &Principal,
        list_id: &str,
        todo_id: &str,
        input: &TodoMutationInput,
    ) -> Result<Todo> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "PUT",
                &format!("/todo/api/list/{list_id}/todo/{todo_id}"),
                Some(json!({
                    "name": input.name,
                    "description": input.description,
                    "deadline": input.deadline,
                    "priority": input.priority,
                })),
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }

    pub async fn delete_todo(
        &self,
        principal: &Principal,
        list_id: &str,
        todo_id: &str,
    ) -> Result<Todo> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "DELETE",
                &format!("/todo/api/list/{list_id}/todo/{todo_id}"),
                None,
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }

    /// Assign the request creator to the todo.
    pub async fn assign_user(
        &self,
        principal: &Principal,
        list_id: &str,
        todo_id: &str,
    ) -> Result<String> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "PATCH",
                &format!("/todo/api/list/{list_id}/todo/{todo_id}"),
                Some(json!({ "username": principal.username })),
                &principal.username,
                200,
            )
            .await?;
        let message: serde_json::Value = parse(&body)?;
        Ok(message["message"].as_str().unwrap_or_default().to_string())
    }

    pub async fn change_status(
        &self,
        principal: &Principal,
        list_id: &str,
        todo_id: &str,
    ) -> Result<Todo> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "PATCH",
                &format!("/todo/api/list/{list_id}/todo/{todo_id}/status"),
                None,
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }

    pub async fn get_todo(
        &self,
        principal: &Principal,
        list_id: &str,
        todo_id: &str,
    ) -> Result<Todo> {
        require_permission(principal, Role::Reader)?;
        let body = self
            .transport
            .send(
                "GET",
                &format!("/todo/api/list/{list_id}/todo/{todo_id}"),
                None,
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }

    /// A list's todos as a connection, sliced locally from the full sorted
    /// set the REST backend returns.
    pub async fn get_todos(
        &self,
        principal: &Principal,
        list_id: &str,
        first: Option<usize>,
        after: Option<&str>,
    ) -> Result<TodoConnection> {
        require_permission(principal, Role::Reader)?;

        let body = self
            .transport
            .send(
                "GET",
                &format!("/todo/api/list/{list_id}/todos"),
                None,
                &principal.username,
                200,
            )
            .await?;
        let full: Page<Todo> = parse(&body)?;

        let page = paginate(&full.items, |t| t.id.to_string(), after, first)?;
        Ok(TodoConnection {
            total_count: page.total_count,
            todos: page.items,
            page_info: page.page_info,
        })
    }
}
