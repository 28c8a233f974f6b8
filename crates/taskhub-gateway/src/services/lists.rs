//! List resolver service.

use std::sync::Arc;

use serde_json::json;

use taskhub_core::error::Result;
use taskhub_core::models::{ListMember, ListOutput, Todo, TodoList};
use taskhub_core::{paginate, Page, Principal, Role};

use crate::model::{ListConnection, ListView};
use crate::permission::require_permission;
use crate::transport::RestTransport;

use super::parse;

pub struct ListService {
    transport: Arc<dyn RestTransport>,
}

impl ListService {
    pub fn new(transport: Arc<dyn RestTransport>) -> Self {
        Self { transport }
    }

    pub async fn create_list(&self, principal: &Principal, name: &str) -> Result<ListOutput> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "POST",
                "/todo/api/list",
                Some(json!({ "name": name })),
                &principal.username,
                201,
            )
            .await?;
        parse(&body)
    }

    pub async fn update_list_name(
        &self,
        principal: &Principal,
        list_id: &str,
        name: &str,
    ) -> Result<ListOutput> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "PUT",
                &format!("/todo/api/list/{list_id}"),
                Some(json!({ "name": name })),
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }

    pub async fn delete_list(&self, principal: &Principal, list_id: &str) -> Result<TodoList> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "DELETE",
                &format!("/todo/api/list/{list_id}"),
                None,
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }

    pub async fn add_user(
        &self,
        principal: &Principal,
        list_id: &str,
        username: &str,
    ) -> Result<String> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "POST",
                &format!("/todo/api/list/{list_id}/users"),
                Some(json!({ "username": username })),
                &principal.username,
                200,
            )
            .await?;
        let message: serde_json::Value = parse(&body)?;
        Ok(message["message"].as_str().unwrap_or_default().to_string())
    }

    pub async fn remove_user(
        &self,
        principal: &Principal,
        list_id: &str,
        username: &str,
    ) -> Result<ListMember> {
        require_permission(principal, Role::Writer)?;
        let body = self
            .transport
            .send(
                "DELETE",
                &format!("/todo/api/list/{list_id}/users/{username}"),
                None,
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }

    /// A list together with its todos.
    pub async fn get_list(&self, principal: &Principal, list_id: &str) -> Result<ListView> {
        require_permission(principal, Role::Reader)?;

        let body = self
            .transport
            .send(
                "GET",
                &format!("/todo/api/list/{list_id}"),
                None,
                &principal.username,
                200,
            )
            .await?;
        let list: TodoList = parse(&body)?;

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
        let todos: Page<Todo> = parse(&body)?;

        Ok(ListView {
            list,
            todos: todos.items,
        })
    }

    /// All lists as a connection; the full sorted set comes from the REST
    /// backend and is sliced here with the pure paginator.
    pub async fn get_lists(
        &self,
        principal: &Principal,
        first: Option<usize>,
        after: Option<&str>,
    ) -> Result<ListConnection> {
        require_permission(principal, Role::Admin)?;

        let body = self
            .transport
            .send("GET", "/todo/api/list", None, &principal.username, 200)
            .await?;
        let full: Page<ListOutput> = parse(&body)?;

        let page = paginate(&full.items, |l| l.id.to_string(), after, first)?;
        Ok(ListConnection {
            total_count: page.total_count,
            lists: page.items,
            page_info: page.page_info,
        })
    }

    pub async fn get_user_from_list(
        &self,
        principal: &Principal,
        list_id: &str,
        username: &str,
    ) -> Result<ListMember> {
        require_permission(principal, Role::Reader)?;
        let body = self
            .transport
            .send(
                "GET",
                &format!("/todo/api/list/{list_id}/users/{username}"),
                None,
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }

    pub async fn get_users_from_list(
        &self,
        principal: &Principal,
        list_id: &str,
    ) -> Result<TodoList> {
        require_permission(principal, Role::Reader)?;
        let body = self
            .transport
            .send(
                "GET",
                &format!("/todo/api/list/{list_id}/users"),
                None,
                &principal.username,
                200,
            )
            .await?;
        parse(&body)
    }
}
