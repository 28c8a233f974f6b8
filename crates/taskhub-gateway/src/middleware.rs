//! Gateway request context.
//!
//! Every resolver operation needs a caller identity: the `userId` header
//! must be present and resolve to a known role before anything runs.
//! Missing or unknown identity is a 400 here — the 401/403 contract
//! belongs to the REST backend this gateway proxies.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use taskhub_core::{Principal, Role, TaskhubError};

use crate::error::AppError;
use crate::routes::GatewayState;
use crate::transport::USER_HEADER;

pub async fn user_context(
    State(state): State<GatewayState>,
    mut req: Request,
    next: Next,
) -> Response {
    let username = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let principal = Principal::resolve(username, &state.directory);

    if principal.username.is_empty() || principal.role == Role::Unknown {
        tracing::warn!(user = username, "missing valuable information about the user");
        return AppError(TaskhubError::Validation(
            "missing valuable information about the user".into(),
        ))
        .into_response();
    }

    tracing::info!(
        method = %req.method(),
        path = %req.uri().path(),
        user = %principal.username,
        request_id = %Uuid::new_v4(),
        "incoming GraphQL request"
    );

    req.extensions_mut().insert(principal);
    next.run(req).await
}
