//! HTTP surface for the task scheduler.
//!
//! # Responsibility
//! - Route the JSON/text API onto `scheduler_core` use-cases.
//! - Serve the static web client for every other path.
//!
//! # See also
//! - `api` for per-endpoint wire contracts.

pub mod api;
pub mod error;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

/// Builds the application router.
pub fn router(state: AppState, web_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/nextdate", get(api::next_date))
        .route("/api/tasks", get(api::list_tasks))
        .route(
            "/api/task",
            post(api::create_task)
                .get(api::get_task)
                .put(api::update_task)
                .delete(api::delete_task),
        )
        .route("/api/task/done", post(api::mark_done))
        .fallback_service(ServeDir::new(web_dir.as_ref()))
        .with_state(state)
}

/// Binds `addr` and serves `app` until the process is stopped.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        "event=http_listen module=http status=ok addr={}",
        listener.local_addr()?
    );
    axum::serve(listener, app).await
}
