//! # HTTP Server
//!
//! Combines the resource routers into one Axum application over an
//! injected document store.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::contact_routes::{contact_routes, ContactState};
use super::user_routes::{user_routes, UserState};
use crate::store::DocumentStore;

/// HTTP server for the contacts and users API
pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
}

impl HttpServer {
    /// Create a server bound to `addr` over `store`
    pub fn new(addr: SocketAddr, store: Arc<dyn DocumentStore>) -> Self {
        let router = Self::build_router(store);
        Self { addr, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(store: Arc<dyn DocumentStore>) -> Router {
        let contact_state = Arc::new(ContactState::new(Arc::clone(&store)));
        let user_state = Arc::new(UserState::new(store));

        Router::new()
            .merge(contact_routes(contact_state))
            .merge(user_routes(user_state))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C or SIGTERM, then drain in-flight requests
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local = listener.local_addr()?;

        info!(addr = %local, "listening");
        info!("Servidor rodando em http://localhost:{}", local.port());

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
