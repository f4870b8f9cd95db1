//! HTTP surface.
//!
//! - `GET /`, `/tasks`, `/schedule`, `/settings`, `/onboarding`: view models as JSON
//! - `POST /api/tasks`, `PUT|DELETE /api/tasks/{id}`, `POST /api/settings`: writes,
//!   acknowledged with `{"success": true}`

use crate::config::ServerConfig;
use crate::db::Store;
use crate::handlers;
use axum::Router;
use axum::routing::{get, post, put};
use tokio::net::TcpListener;
use tracing::info;

/// Shared by every request. Holds no connection, only where to open one.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

pub fn router(store: Store) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/tasks", get(handlers::tasks))
        .route("/schedule", get(handlers::schedule))
        .route("/settings", get(handlers::settings))
        .route("/onboarding", get(handlers::onboarding))
        .route("/api/tasks", post(handlers::create_task))
        .route(
            "/api/tasks/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .route("/api/settings", post(handlers::update_settings))
        .with_state(AppState { store })
}

/// Initialise the store, bind, and serve until ctrl-c.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = config.store();
    store.init_async().await?;
    info!(path = %store.path().display(), "store ready");

    let listener = TcpListener::bind(config.addr).await?;
    let local_addr = listener.local_addr()?;
    info!("stride listening on http://{local_addr}");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("stride stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
