//! taskhub-gateway — GraphQL gateway in front of the REST backend.
//!
//! Reads config from env vars:
//!   TASKHUB_REST_URL           — REST backend base URL (default: http://localhost:8080)
//!   TASKHUB_GATEWAY_BIND_ADDR  — listen address (default: 0.0.0.0:8081)

use std::sync::Arc;

use tokio::net::TcpListener;

use taskhub_core::RoleDirectory;
use taskhub_gateway::routes::{build_router, GatewayState};
use taskhub_gateway::services::{ListService, TodoService};
use taskhub_gateway::transport::{HttpTransport, RestTransport};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taskhub_gateway=debug".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let rest_url =
        std::env::var("TASKHUB_REST_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let bind_addr =
        std::env::var("TASKHUB_GATEWAY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".into());

    let transport: Arc<dyn RestTransport> = Arc::new(HttpTransport::new(rest_url.clone()));

    let state = GatewayState {
        lists: Arc::new(ListService::new(Arc::clone(&transport))),
        todos: Arc::new(TodoService::new(transport)),
        directory: Arc::new(RoleDirectory::with_defaults()),
    };
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {bind_addr}: {e}"));
    tracing::info!("taskhub-gateway listening on {bind_addr}, proxying {rest_url}");

    axum::serve(listener, app).await.expect("server error");
}
