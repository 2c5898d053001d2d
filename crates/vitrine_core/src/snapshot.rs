//! Source snapshots
//!
//! A snapshot is the immutable identifier-to-text map the resolver consults
//! first. It is produced by [`SnapshotBuilder`] before the server starts,
//! written to disk as a flat JSON object, and loaded once at startup.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{Result, SourceError};
use crate::identifier::SourceId;
use crate::live::LiveSource;

/// Immutable map from identifier to source text
#[derive(Clone, Debug, Default)]
pub struct SourceSnapshot {
    entries: FxHashMap<SourceId, Arc<str>>,
}

impl SourceSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SourceId, T)>,
        T: Into<Arc<str>>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, text)| (id, text.into()))
                .collect(),
        }
    }

    pub fn get(&self, id: &SourceId) -> Option<&Arc<str>> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &SourceId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in sorted order
    pub fn ids(&self) -> Vec<SourceId> {
        let mut ids: Vec<_> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Decode a snapshot from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<SourceId, String> = serde_json::from_str(json)?;
        Ok(Self::from_entries(raw))
    }

    /// Encode as pretty JSON with sorted keys
    pub fn to_json(&self) -> Result<String> {
        let sorted: BTreeMap<&str, &str> = self
            .entries
            .iter()
            .map(|(id, text)| (id.as_str(), text.as_ref()))
            .collect();
        Ok(serde_json::to_string_pretty(&sorted)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| SourceError::Internal {
            id: path.display().to_string(),
            source: e,
        })?;
        let snapshot = Self::from_json(&json)?;
        tracing::info!(
            "Loaded snapshot with {} sources from {}",
            snapshot.len(),
            path.display()
        );
        Ok(snapshot)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |e| SourceError::Internal {
            id: path.display().to_string(),
            source: e,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json()?).map_err(io_err)?;
        Ok(())
    }
}

/// Outcome of a bundle run
#[derive(Debug)]
pub struct BundleReport {
    pub snapshot: SourceSnapshot,
    /// Identifiers that could not be captured, with the reason
    pub skipped: Vec<(SourceId, SourceError)>,
}

impl BundleReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Build-time collector that reads a fixed list of identifiers into a snapshot.
///
/// Reads go through [`LiveSource`], so the same containment rules apply at
/// build time as at runtime. A missing file is reported and skipped rather
/// than failing the whole bundle.
pub struct SnapshotBuilder {
    live: LiveSource,
    ids: Vec<SourceId>,
}

impl SnapshotBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            live: LiveSource::new(root),
            ids: Vec::new(),
        }
    }

    pub fn with_sources(mut self, ids: impl IntoIterator<Item = SourceId>) -> Self {
        self.ids.extend(ids);
        self
    }

    pub fn build(self) -> BundleReport {
        let mut entries = Vec::with_capacity(self.ids.len());
        let mut skipped = Vec::new();

        for id in self.ids {
            match self.live.read(&id) {
                Ok(text) => {
                    tracing::info!("Added {} to snapshot", id);
                    entries.push((id, text));
                }
                Err(err) => {
                    tracing::error!("Skipped {}: {}", id, err);
                    skipped.push((id, err));
                }
            }
        }

        BundleReport {
            snapshot: SourceSnapshot::from_entries(entries),
            skipped,
        }
    }
}
