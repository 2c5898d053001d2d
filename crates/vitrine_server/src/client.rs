//! Remote fetch over the source query.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use vitrine_core::{ErrorKind, SourceId};
use vitrine_panel::{FetchError, FetchResult, SourceFetch};

use crate::error::Result;
use crate::http::{QueryBody, SourceResponse};

/// [`SourceFetch`] that asks a running [`crate::SourceServer`]
#[derive(Clone, Debug)]
pub struct HttpSourceClient {
    client: reqwest::Client,
    url: Arc<str>,
}

impl HttpSourceClient {
    pub fn new(addr: SocketAddr, route: impl AsRef<str>) -> Result<Self> {
        // The server is addressed directly; environment proxies do not apply.
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            client,
            url: Arc::from(format!("http://{}{}", addr, route.as_ref())),
        })
    }

    /// Issue one query and return the decoded response
    pub async fn query(&self, id: &str) -> Result<SourceResponse> {
        let response = self
            .client
            .get(&*self.url)
            .query(&[("id", id)])
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.json::<QueryBody>().await?;
        Ok(SourceResponse { status, body })
    }
}

impl SourceFetch for HttpSourceClient {
    fn fetch(&self, id: SourceId) -> impl Future<Output = FetchResult> + Send + 'static {
        let client = self.clone();
        async move {
            let response = client
                .query(id.as_str())
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            match (response.status, response.body) {
                (200, QueryBody::Content { content }) => Ok(Arc::from(content)),
                (status, QueryBody::Error { error }) => Err(FetchError::Source {
                    kind: ErrorKind::from_status_code(status),
                    detail: error,
                }),
                (status, QueryBody::Content { .. }) => Err(FetchError::Transport(format!(
                    "unexpected content with status {status}"
                ))),
            }
        }
    }
}
