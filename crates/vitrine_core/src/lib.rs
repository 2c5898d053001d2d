//! Vitrine Core
//!
//! Source resolution for the gallery's code panel.
//!
//! # Features
//!
//! - **Source identifiers**: Opaque keys naming a unit of source text
//! - **Snapshots**: Immutable identifier-to-text maps built before startup
//! - **Live lookup**: Filesystem reads confined to a permitted root
//! - **Runtime mode**: A single switch gating the live fallback
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vitrine_core::{RuntimeMode, SourceId, SourceProvider, SourceResolver, SourceSnapshot};
//!
//! let snapshot = Arc::new(SourceSnapshot::load("snapshot.json")?);
//! let resolver = SourceResolver::new(snapshot, RuntimeMode::Production, ".");
//!
//! let text = resolver.resolve(&SourceId::new("src/components/dropdown.tsx")?)?;
//! ```

pub mod error;
pub mod identifier;
pub mod live;
pub mod mode;
pub mod provider;
pub mod snapshot;

pub use error::{ErrorKind, Result, SourceError};
pub use identifier::SourceId;
pub use live::LiveSource;
pub use mode::RuntimeMode;
pub use provider::{SourceProvider, SourceResolver};
pub use snapshot::{BundleReport, SnapshotBuilder, SourceSnapshot};
