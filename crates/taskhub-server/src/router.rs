//! Router construction: the route → requirement table, expressed as gated
//! subrouters merged under `/todo/api`.

use axum::middleware as axum_mw;
use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, lists, todos};
use crate::middleware as mw;
use crate::state::AppState;

/// Build the full axum router with all routes and the gate middleware.
///
/// Layer ordering inside each subrouter follows the gate's stage order:
/// the rank stage wraps the scope stage, and the context + existence
/// stages wrap the whole API.
pub fn build_router(state: AppState) -> Router {
    // Admin-gated: every list across all users.
    let admin_routes = Router::new()
        .route("/list", get(lists::all_lists))
        .route_layer(axum_mw::from_fn(mw::require_admin));

    // Writer-gated, no resource scope: creating a list needs no membership.
    let writer_routes = Router::new()
        .route("/list", post(lists::create_list))
        .route_layer(axum_mw::from_fn(mw::require_writer));

    // Member-gated reads.
    let member_reads = Router::new()
        .route("/list/:list_id", get(lists::get_list))
        .route("/list/:list_id/todos", get(todos::todos_for_list))
        .route("/list/:list_id/todo/:todo_id", get(todos::get_todo))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            mw::require_member,
        ));

    // Writer-gated todo modifications, scoped to list membership.
    // require_writer is added last so the rank stage runs before the scope
    // stage.
    let member_writes = Router::new()
        .route("/list/:list_id/todo", post(todos::create_todo))
        .route(
            "/list/:list_id/todo/:todo_id",
            put(todos::update_todo)
                .delete(todos::delete_todo)
                .patch(todos::assign_todo),
        )
        .route(
            "/list/:list_id/todo/:todo_id/status",
            patch(todos::advance_status),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            mw::require_member,
        ))
        .route_layer(axum_mw::from_fn(mw::require_writer));

    // Owner-gated list management and membership administration.
    let owner_routes = Router::new()
        .route(
            "/list/:list_id",
            put(lists::update_list).delete(lists::delete_list),
        )
        .route(
            "/list/:list_id/users",
            get(lists::get_members).post(lists::add_member),
        )
        .route(
            "/list/:list_id/users/:username",
            get(lists::get_member).delete(lists::remove_member),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            mw::require_owner,
        ));

    let api = Router::new()
        .merge(admin_routes)
        .merge(writer_routes)
        .merge(member_reads)
        .merge(member_writes)
        .merge(owner_routes)
        .layer(axum_mw::from_fn(mw::require_user))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            mw::request_context,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/todo/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
