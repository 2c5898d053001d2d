//! vitrine_server - HTTP query boundary for the code panel.
//!
//! This crate provides:
//! - An axum router answering `GET /api/source?id=<identifier>`
//! - JSON payloads `{"content": ...}` or `{"error": ...}` with 400/403/404/500 statuses
//! - A `reqwest` client implementing the panel's fetch boundary
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use vitrine_server::{ServerConfig, SourceServer};
//!
//! let handle = SourceServer::new(ServerConfig::default(), Arc::new(resolver))
//!     .start()
//!     .await?;
//! println!("listening on {}", handle.local_addr());
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod server;

pub use client::HttpSourceClient;
pub use error::{Result, ServerError};
pub use http::{QueryBody, SourceQuery, SourceResponse};
pub use server::{answer, router, ServerConfig, ServerHandle, SourceServer, REQUEST_TIMEOUT};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vitrine_core::{ErrorKind, RuntimeMode, SourceId, SourceResolver, SourceSnapshot};
    use vitrine_panel::{FetchError, MemoryClipboard, PanelDriver, PanelPhase, SourceFetch};

    async fn start_scenario_server() -> ServerHandle {
        let snapshot = SourceSnapshot::from_entries([(
            SourceId::new("a.ts").unwrap(),
            "console.log(1)",
        )]);
        let resolver = SourceResolver::new(Arc::new(snapshot), RuntimeMode::Production, ".");
        SourceServer::new(ServerConfig::ephemeral(), Arc::new(resolver))
            .start()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_over_tcp() {
        let handle = start_scenario_server().await;
        let client = HttpSourceClient::new(handle.local_addr(), handle.route()).unwrap();

        let ok = client.query("a.ts").await.unwrap();
        assert_eq!(ok, SourceResponse::content("console.log(1)"));

        let missing = client.fetch(SourceId::new("b.ts").unwrap()).await.unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let denied = client
            .fetch(SourceId::new("../secret").unwrap())
            .await
            .unwrap_err();
        assert_eq!(
            denied,
            FetchError::Source {
                kind: ErrorKind::AccessDenied,
                detail: "Access denied".to_string()
            }
        );

        let empty = client.query("").await.unwrap();
        assert_eq!(empty.status, 400);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_panel_driven_through_server() {
        let handle = start_scenario_server().await;
        let client = HttpSourceClient::new(handle.local_addr(), handle.route()).unwrap();
        let mut driver =
            PanelDriver::new(SourceId::new("a.ts").unwrap(), client, MemoryClipboard::new());

        driver.toggle();
        driver.settle().await;
        assert_eq!(driver.panel().phase(), PanelPhase::Ready);
        assert_eq!(driver.panel().content().display_text(), "console.log(1)");

        driver.set_source(SourceId::new("b.ts").unwrap());
        driver.settle().await;
        assert_eq!(driver.panel().phase(), PanelPhase::Failed);
        assert_eq!(
            driver.panel().content().display_text(),
            "Error loading source: not found: Source not found"
        );

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_stopped_server_is_a_transport_failure() {
        let handle = start_scenario_server().await;
        let client = HttpSourceClient::new(handle.local_addr(), handle.route()).unwrap();
        handle.shutdown().await;

        let err = client.fetch(SourceId::new("a.ts").unwrap()).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
