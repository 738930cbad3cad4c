//! HTTP shell: the chat page, a JSON equivalent, and a health probe.

mod errors;
mod handlers;
mod page;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

use crate::connector::api::Container;

pub use page::PageRenderer;

#[derive(Clone)]
pub struct AppState {
    pub container: Arc<Container>,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(container: Arc<Container>) -> Result<Self> {
        Ok(Self {
            container,
            pages: Arc::new(PageRenderer::new()?),
        })
    }
}

pub fn build_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/", get(handlers::show_page).post(handlers::submit_form))
        .route("/api/chat", post(handlers::chat_json))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(container: Arc<Container>, addr: SocketAddr) -> Result<()> {
    let router = build_router(AppState::new(container)?);
    let listener = TcpListener::bind(addr).await?;
    info!("Chat UI listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
