//! Shared router state.

use std::sync::Arc;

use taskhub_core::ports::{ListStore, ScopeResolver, TodoStore};
use taskhub_core::RoleDirectory;

/// Everything the handlers and the permission gate need, injected at
/// construction. The role directory lives here rather than in a global so
/// differently-configured routers can coexist (and so tests can supply
/// their own directory).
#[derive(Clone)]
pub struct AppState {
    pub lists: Arc<dyn ListStore>,
    pub todos: Arc<dyn TodoStore>,
    pub scope: Arc<dyn ScopeResolver>,
    pub directory: Arc<RoleDirectory>,
}

impl AppState {
    pub fn new(
        lists: Arc<dyn ListStore>,
        todos: Arc<dyn TodoStore>,
        scope: Arc<dyn ScopeResolver>,
        directory: RoleDirectory,
    ) -> Self {
        Self {
            lists,
            todos,
            scope,
            directory: Arc::new(directory),
        }
    }
}
