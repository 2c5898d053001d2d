//! Source resolution
//!
//! [`SourceResolver`] answers from the snapshot first. Identifiers absent from
//! the snapshot are checked against the permitted root in every mode, so a
//! traversal attempt is `AccessDenied` even when nothing would be read. When the
//! runtime mode allows it, the remaining identifiers fall through to a
//! [`LiveSource`] read; otherwise they are `NotFound` without touching disk.

use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, SourceError};
use crate::identifier::SourceId;
use crate::live::LiveSource;
use crate::mode::RuntimeMode;
use crate::snapshot::SourceSnapshot;

/// Anything that can turn an identifier into source text
pub trait SourceProvider: Send + Sync {
    fn resolve(&self, id: &SourceId) -> Result<Arc<str>>;

    /// Whether `resolve` answers from memory for this identifier. Callers on an
    /// async runtime use this to decide whether the call needs a blocking thread.
    fn is_resident(&self, _id: &SourceId) -> bool {
        false
    }
}

impl<P: SourceProvider + ?Sized> SourceProvider for Arc<P> {
    fn resolve(&self, id: &SourceId) -> Result<Arc<str>> {
        (**self).resolve(id)
    }

    fn is_resident(&self, id: &SourceId) -> bool {
        (**self).is_resident(id)
    }
}

impl SourceProvider for SourceSnapshot {
    fn resolve(&self, id: &SourceId) -> Result<Arc<str>> {
        self.get(id).cloned().ok_or_else(|| SourceError::NotFound {
            id: id.to_string(),
        })
    }

    fn is_resident(&self, _id: &SourceId) -> bool {
        true
    }
}

/// Snapshot lookup with an optional live fallback
#[derive(Clone, Debug)]
pub struct SourceResolver {
    snapshot: Arc<SourceSnapshot>,
    live: LiveSource,
    live_enabled: bool,
}

impl SourceResolver {
    pub fn new(snapshot: Arc<SourceSnapshot>, mode: RuntimeMode, root: impl AsRef<Path>) -> Self {
        let live = LiveSource::new(root);
        let live_enabled = mode.allows_live_lookup();
        if live_enabled {
            tracing::info!(
                "Live source lookup enabled under {}",
                live.root().display()
            );
        } else {
            tracing::debug!("Live source lookup disabled ({} mode)", mode);
        }
        Self {
            snapshot,
            live,
            live_enabled,
        }
    }

    pub fn snapshot(&self) -> &Arc<SourceSnapshot> {
        &self.snapshot
    }

    pub fn live_enabled(&self) -> bool {
        self.live_enabled
    }
}

impl SourceProvider for SourceResolver {
    fn resolve(&self, id: &SourceId) -> Result<Arc<str>> {
        if let Some(text) = self.snapshot.get(id) {
            tracing::trace!("Resolved {} from snapshot", id);
            return Ok(text.clone());
        }

        self.live.locate(id)?;
        if !self.live_enabled {
            return Err(SourceError::NotFound {
                id: id.to_string(),
            });
        }
        self.live.read(id).map(Arc::from)
    }

    fn is_resident(&self, id: &SourceId) -> bool {
        !self.live_enabled || self.snapshot.contains(id)
    }
}
