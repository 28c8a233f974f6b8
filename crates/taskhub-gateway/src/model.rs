//! Gateway-side view types: the connection shapes the schema exposes and
//! the composed list view with its todos inlined.

use serde::{Deserialize, Serialize};

use taskhub_core::models::{ListOutput, Todo, TodoList};
use taskhub_core::PageInfo;

#[derive(Debug, Serialize)]
pub struct ListConnection {
    pub total_count: usize,
    pub lists: Vec<ListOutput>,
    pub page_info: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct TodoConnection {
    pub total_count: usize,
    pub todos: Vec<Todo>,
    pub page_info: PageInfo,
}

/// A list resolved together with its todos.
#[derive(Debug, Serialize)]
pub struct ListView {
    #[serde(flatten)]
    pub list: TodoList,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
pub struct ListInput {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserInput {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoMutationInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub priority: Option<taskhub_core::models::TodoPriority>,
}
