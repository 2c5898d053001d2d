//! Fetch boundary between a panel and a source provider

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use vitrine_core::{ErrorKind, SourceError, SourceId, SourceProvider};

/// Why a fetch produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The provider answered with a structured failure
    #[error("{kind}: {detail}")]
    Source { kind: ErrorKind, detail: String },

    /// The request never got a structured answer
    #[error("transport failure: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Source { kind, .. } => *kind,
            FetchError::Transport(_) => ErrorKind::Internal,
        }
    }
}

impl From<SourceError> for FetchError {
    fn from(err: SourceError) -> Self {
        FetchError::Source {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

pub type FetchResult = Result<Arc<str>, FetchError>;

/// Asynchronous source lookup used by [`crate::PanelDriver`]
pub trait SourceFetch: Send + Sync + 'static {
    fn fetch(&self, id: SourceId) -> impl Future<Output = FetchResult> + Send + 'static;
}

/// In-process fetch straight from a provider.
///
/// Lookups the provider can answer from memory complete without leaving the
/// task; anything that may touch the disk runs on tokio's blocking pool.
pub struct ProviderFetch<P> {
    provider: Arc<P>,
}

impl<P: SourceProvider + 'static> ProviderFetch<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

impl<P: SourceProvider + 'static> SourceFetch for ProviderFetch<P> {
    fn fetch(&self, id: SourceId) -> impl Future<Output = FetchResult> + Send + 'static {
        let provider = self.provider.clone();
        async move {
            if provider.is_resident(&id) {
                return provider.resolve(&id).map_err(FetchError::from);
            }
            tokio::task::spawn_blocking(move || provider.resolve(&id))
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?
                .map_err(FetchError::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{RuntimeMode, SourceResolver, SourceSnapshot};

    fn id(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_provider_fetch_maps_errors() {
        let snapshot = Arc::new(SourceSnapshot::from_entries([(id("a.ts"), "console.log(1)")]));
        let resolver = SourceResolver::new(snapshot, RuntimeMode::Production, ".");
        let fetch = ProviderFetch::new(Arc::new(resolver));

        assert_eq!(&*fetch.fetch(id("a.ts")).await.unwrap(), "console.log(1)");

        let err = fetch.fetch(id("b.ts")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().starts_with("not found: "));
    }

    #[tokio::test]
    async fn test_provider_fetch_reads_disk_off_task() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("live.ts"), "live").unwrap();
        let resolver = SourceResolver::new(
            Arc::new(SourceSnapshot::empty()),
            RuntimeMode::Development,
            dir.path(),
        );
        let fetch = ProviderFetch::new(Arc::new(resolver));

        assert_eq!(&*fetch.fetch(id("live.ts")).await.unwrap(), "live");
    }
}
