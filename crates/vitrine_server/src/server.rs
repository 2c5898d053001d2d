//! Source query server.
//!
//! An axum [`Router`] answers `GET <route>?id=<identifier>` from a
//! [`SourceProvider`]. Connections are accepted on our own loop so each one
//! gets a request timeout and the listener can be stopped through a
//! [`ServerHandle`]. Every failure inside the route is turned into a JSON
//! error response.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use serde::{Deserialize, Serialize};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use vitrine_core::{ErrorKind, SourceError, SourceId, SourceProvider};

use crate::error::{Result, ServerError};
use crate::http::{SourceQuery, SourceResponse};

/// Time a client gets to start and finish sending its request head
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the source server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Port to bind. `0` picks a free port.
    pub port: u16,
    /// Path the source query is served on.
    pub route: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            route: "/api/source".to_string(),
        }
    }
}

impl ServerConfig {
    /// Config bound to an ephemeral localhost port
    pub fn ephemeral() -> Self {
        Self {
            port: 0,
            ..Default::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Handle to a running source server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    route: String,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

/// Source server bound to a provider.
pub struct SourceServer<P> {
    config: ServerConfig,
    provider: Arc<P>,
}

impl<P: SourceProvider + 'static> SourceServer<P> {
    pub fn new(config: ServerConfig, provider: Arc<P>) -> Self {
        Self { config, provider }
    }

    /// Bind and start serving in a background task.
    pub async fn start(self) -> io::Result<ServerHandle> {
        if !self.config.route.starts_with('/') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("route must start with '/': {:?}", self.config.route),
            ));
        }

        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown, shutdown_rx) = watch::channel(false);
        let route = self.config.route;

        tracing::info!("Source server listening on http://{}{}", local_addr, route);

        let app = router(self.provider, &route);
        let task = tokio::spawn(accept_loop(listener, app, shutdown_rx));
        Ok(ServerHandle {
            local_addr,
            route,
            shutdown,
            task: Some(task),
        })
    }
}

/// Routes of the source query.
///
/// Unknown paths get 404 and other methods on the route get 405, both with a
/// JSON error body.
pub fn router<P: SourceProvider + 'static>(provider: Arc<P>, route: &str) -> Router {
    Router::new()
        .route(route, get(query_source::<P>).fallback(method_not_allowed))
        .fallback(route_not_found)
        .with_state(provider)
}

async fn accept_loop(listener: TcpListener, app: Router, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let app = app.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, app).await {
                            tracing::debug!("Connection from {} ended: {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                }
            },
        }
    }
    tracing::info!("Source server stopped");
}

/// Serve one request. A client that sends nothing within
/// [`REQUEST_TIMEOUT`] is disconnected.
async fn serve_connection(stream: TcpStream, app: Router) -> Result<()> {
    match tokio::time::timeout(REQUEST_TIMEOUT, stream.readable()).await {
        Ok(ready) => ready?,
        Err(_) => return Err(ServerError::Timeout),
    }

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(REQUEST_TIMEOUT)
        .keep_alive(false);
    builder
        .serve_connection(TokioIo::new(stream), TowerToHyperService::new(app))
        .await?;
    Ok(())
}

async fn query_source<P: SourceProvider + 'static>(
    State(provider): State<Arc<P>>,
    query: std::result::Result<Query<SourceQuery>, QueryRejection>,
) -> SourceResponse {
    match query {
        Ok(Query(query)) => answer(provider, query.identifier()).await,
        Err(rejection) => {
            tracing::debug!("Rejected query string: {}", rejection);
            SourceResponse::error(400, "Malformed request")
        }
    }
}

async fn method_not_allowed() -> SourceResponse {
    SourceResponse::error(405, "Method not allowed")
}

async fn route_not_found() -> SourceResponse {
    SourceResponse::error(404, "Route not found")
}

/// Resolve one raw identifier into a response.
pub async fn answer<P: SourceProvider + 'static>(provider: Arc<P>, raw_id: String) -> SourceResponse {
    let id = match SourceId::new(raw_id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    let result = if provider.is_resident(&id) {
        provider.resolve(&id)
    } else {
        let lookup = id.clone();
        match tokio::task::spawn_blocking(move || provider.resolve(&lookup)).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Source lookup task for {} failed: {}", id, e);
                return SourceResponse::error(500, "Failed to read source");
            }
        }
    };

    match result {
        Ok(text) => {
            tracing::debug!("Served {} ({} bytes)", id, text.len());
            SourceResponse::content(&text)
        }
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &SourceError) -> SourceResponse {
    let kind = err.kind();
    let message = match kind {
        ErrorKind::MissingParameter => "Source identifier is required",
        ErrorKind::AccessDenied => "Access denied",
        ErrorKind::NotFound => "Source not found",
        ErrorKind::Internal => {
            tracing::error!("Error reading source: {}", err);
            "Failed to read source"
        }
    };
    SourceResponse::error(kind.status_code(), message)
}
