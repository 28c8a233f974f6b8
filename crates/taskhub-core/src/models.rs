//! Domain models for lists, memberships, and todos, plus the input/output
//! DTO shapes the HTTP boundary works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Lists ─────────────────────────────────────────────────────

/// A list with its resolved owner and membership.
/// Invariant: `owner` is always present in `members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoList {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub owner: String,
    pub members: Vec<String>,
}

/// One username's membership in one list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMember {
    pub list_id: Uuid,
    pub list_name: String,
    pub username: String,
    pub is_owner: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListInput {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MemberInput {
    pub username: String,
}

/// Compact list representation for collection responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOutput {
    pub id: Uuid,
    pub name: String,
    pub owner: String,
}

impl From<&TodoList> for ListOutput {
    fn from(list: &TodoList) -> Self {
        Self {
            id: list.id,
            name: list.name.clone(),
            owner: list.owner.clone(),
        }
    }
}

// ── Todos ─────────────────────────────────────────────────────

/// Workflow state of a todo.
///
/// `Completed` is terminal and `NotAssigned` only moves forward through
/// `Assigned`; there is no shortcut into `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoStatus {
    Undefined,
    #[serde(rename = "Not Assigned")]
    NotAssigned,
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In Review")]
    InReview,
    Completed,
}

impl TodoStatus {
    pub fn next(self) -> TodoStatus {
        match self {
            TodoStatus::NotAssigned => TodoStatus::Assigned,
            TodoStatus::Assigned => TodoStatus::InProgress,
            TodoStatus::InProgress => TodoStatus::InReview,
            TodoStatus::InReview => TodoStatus::Completed,
            TodoStatus::Completed => TodoStatus::Completed,
            TodoStatus::Undefined => TodoStatus::Undefined,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Undefined => "Undefined",
            TodoStatus::NotAssigned => "Not Assigned",
            TodoStatus::Assigned => "Assigned",
            TodoStatus::InProgress => "In Progress",
            TodoStatus::InReview => "In Review",
            TodoStatus::Completed => "Completed",
        }
    }

    /// Parse the stored text form; anything unrecognized is `Undefined`.
    pub fn parse(s: &str) -> TodoStatus {
        match s {
            "Not Assigned" => TodoStatus::NotAssigned,
            "Assigned" => TodoStatus::Assigned,
            "In Progress" => TodoStatus::InProgress,
            "In Review" => TodoStatus::InReview,
            "Completed" => TodoStatus::Completed,
            _ => TodoStatus::Undefined,
        }
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoPriority {
    Undefined,
    Low,
    Medium,
    High,
}

impl TodoPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TodoPriority::Undefined => "Undefined",
            TodoPriority::Low => "Low",
            TodoPriority::Medium => "Medium",
            TodoPriority::High => "High",
        }
    }

    pub fn parse(s: &str) -> TodoPriority {
        match s {
            "Low" => TodoPriority::Low,
            "Medium" => TodoPriority::Medium,
            "High" => TodoPriority::High,
            _ => TodoPriority::Undefined,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub assignee: Option<String>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
}

#[derive(Debug, Deserialize)]
pub struct TodoInput {
    pub name: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Option<TodoPriority>,
}

/// Partial update: absent fields keep their current values.
#[derive(Debug, Default, Deserialize)]
pub struct TodoUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Option<TodoPriority>,
}
