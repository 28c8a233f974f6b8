//! The permission gate: an ordered chain of request-scoped checks.
//!
//! Stage order is fixed and every stage is a hard gate:
//!
//! 1. context — resolve the `userId` header to a [`Principal`] and attach
//!    it to the request; log the incoming request with a request id;
//! 2. existence — the principal must rank at least `Reader`, else 401;
//! 3. static role — writer/admin routes require that rank, else 403;
//! 4. resource scope — list-bound routes require membership (reader/writer
//!    routes) or ownership (owner routes) of the list, with `Admin`
//!    bypassing scope only; path IDs are validated before any scope query
//!    runs, so a malformed ID is a 400 regardless of who asks.
//!
//! No stage is skipped because a later stage would also reject; callers
//! and tests get an unambiguous cause. Each failure emits an audit log
//! entry (principal, route, failure kind) before the terminal response.

use std::collections::HashMap;

use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use taskhub_core::{Principal, Role, TaskhubError};

use crate::error::AppError;
use crate::state::AppState;

/// Header conveying the caller's username.
pub const USER_HEADER: &str = "userId";

/// Path IDs parsed by the scope stage, carried for the handlers so nothing
/// downstream re-parses raw path segments.
#[derive(Debug, Clone, Copy)]
pub struct ScopedIds {
    pub list_id: Uuid,
    pub todo_id: Option<Uuid>,
}

fn audit(principal: &Principal, path: &str, err: &TaskhubError) {
    tracing::warn!(
        user = %principal.username,
        role = %principal.role,
        route = path,
        kind = err.kind(),
        "permission gate rejected request"
    );
}

/// Parse a path-supplied resource identifier.
pub fn parse_id(raw: &str) -> Result<Uuid, TaskhubError> {
    if raw.is_empty() {
        return Err(TaskhubError::Validation("ID cannot be empty".into()));
    }
    Uuid::parse_str(raw)
        .map_err(|_| TaskhubError::Validation("invalid ID format, must be UUID".into()))
}

/// Context stage: resolve the principal once and log the request.
pub async fn request_context(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let username = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let principal = Principal::resolve(username, &state.directory);

    tracing::info!(
        method = %req.method(),
        path = %req.uri().path(),
        user = %principal.username,
        request_id = %Uuid::new_v4(),
        "incoming request"
    );

    req.extensions_mut().insert(principal);
    next.run(req).await
}

fn principal_of(req: &Request) -> Principal {
    req.extensions()
        .get::<Principal>()
        .cloned()
        .expect("request_context middleware must run before the gate stages")
}

/// Existence stage: unknown principals never reach a handler.
pub async fn require_user(req: Request, next: Next) -> Result<Response, AppError> {
    let principal = principal_of(&req);
    if !principal.role.satisfies(Role::Reader) {
        let err = TaskhubError::Authentication(format!(
            "user {} does not exist",
            principal.username
        ));
        audit(&principal, req.uri().path(), &err);
        return Err(err.into());
    }
    Ok(next.run(req).await)
}

fn check_rank(req: &Request, required: Role) -> Result<(), AppError> {
    let principal = principal_of(req);
    principal.require(required).map_err(|err| {
        audit(&principal, req.uri().path(), &err);
        AppError(err)
    })
}

/// Static role stage for writer-gated routes.
pub async fn require_writer(req: Request, next: Next) -> Result<Response, AppError> {
    check_rank(&req, Role::Writer)?;
    Ok(next.run(req).await)
}

/// Static role stage for admin-gated routes. Admin bypass never applies
/// here: the rank itself is the requirement.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    check_rank(&req, Role::Admin)?;
    Ok(next.run(req).await)
}

/// Validate every path ID, then attach them for the handlers.
/// Identity validation precedes scope checks because a scope query needs a
/// valid ID to run at all.
fn validate_ids(
    params: &HashMap<String, String>,
    principal: &Principal,
    path: &str,
) -> Result<ScopedIds, AppError> {
    let list_id = parse_id(params.get("list_id").map(String::as_str).unwrap_or(""))
        .map_err(|err| {
            audit(principal, path, &err);
            AppError(err)
        })?;

    let todo_id = match params.get("todo_id") {
        Some(raw) => Some(parse_id(raw).map_err(|err| {
            audit(principal, path, &err);
            AppError(err)
        })?),
        None => None,
    };

    Ok(ScopedIds { list_id, todo_id })
}

/// Scope stage for member-gated routes: the principal must belong to the
/// list, unless they are `Admin`.
pub async fn require_member(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = principal_of(&req);
    let path = req.uri().path().to_string();
    let ids = validate_ids(&params, &principal, &path)?;

    if !principal.is_admin() && !state.scope.is_member(ids.list_id, &principal.username).await {
        let err = TaskhubError::Authorization(format!(
            "{} is not a member of list {}",
            principal.username, ids.list_id
        ));
        audit(&principal, &path, &err);
        return Err(err.into());
    }

    req.extensions_mut().insert(ids);
    Ok(next.run(req).await)
}

/// Scope stage for owner-gated routes: the principal must own the list,
/// unless they are `Admin`.
pub async fn require_owner(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = principal_of(&req);
    let path = req.uri().path().to_string();
    let ids = validate_ids(&params, &principal, &path)?;

    if !principal.is_admin() && !state.scope.is_owner(ids.list_id, &principal.username).await {
        let err = TaskhubError::Authorization(format!(
            "{} is neither owner nor admin of list {}",
            principal.username, ids.list_id
        ));
        audit(&principal, &path, &err);
        return Err(err.into());
    }

    req.extensions_mut().insert(ids);
    Ok(next.run(req).await)
}
