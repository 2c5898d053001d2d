//! Live filesystem lookup
//!
//! Reads source files directly from disk, confined to a permitted root. Two
//! containment checks run before any read:
//!
//! 1. The lexically normalised `root/id` must stay under the root. This rejects
//!    `..` traversal and absolute identifiers without touching the filesystem.
//! 2. The canonical path must stay under the canonical root, which rejects
//!    symlinks pointing elsewhere.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SourceError};
use crate::identifier::SourceId;

/// Filesystem-backed source lookup rooted at a fixed directory
#[derive(Clone, Debug)]
pub struct LiveSource {
    root: PathBuf,
    canonical_root: PathBuf,
}

impl LiveSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = absolutize(root.as_ref());
        let canonical_root = fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        Self {
            root,
            canonical_root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an identifier to a path under the root without touching the disk.
    pub fn locate(&self, id: &SourceId) -> Result<PathBuf> {
        let candidate = normalize(&self.root.join(id.as_str()));
        if candidate.starts_with(&self.root) {
            Ok(candidate)
        } else {
            tracing::warn!("Rejected source identifier outside root: {}", id);
            Err(SourceError::AccessDenied {
                id: id.to_string(),
            })
        }
    }

    /// Read the text behind an identifier.
    pub fn read(&self, id: &SourceId) -> Result<String> {
        let path = self.locate(id)?;

        let canonical = fs::canonicalize(&path).map_err(|e| io_error(id, e))?;
        if !canonical.starts_with(&self.canonical_root) {
            tracing::warn!(
                "Rejected source {} resolving outside root via link: {}",
                id,
                canonical.display()
            );
            return Err(SourceError::AccessDenied {
                id: id.to_string(),
            });
        }

        let metadata = fs::metadata(&canonical).map_err(|e| io_error(id, e))?;
        if !metadata.is_file() {
            return Err(SourceError::NotFound {
                id: id.to_string(),
            });
        }

        let text = fs::read_to_string(&canonical).map_err(|e| io_error(id, e))?;
        tracing::debug!("Read {} bytes for {} from disk", text.len(), id);
        Ok(text)
    }
}

fn io_error(id: &SourceId, err: io::Error) -> SourceError {
    match err.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound {
            id: id.to_string(),
        },
        _ => SourceError::Internal {
            id: id.to_string(),
            source: err,
        },
    }
}

fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    normalize(&joined)
}

/// Lexical normalisation: drops `.` and folds `..` into the preceding segment.
/// A `..` at the filesystem root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    #[test]
    fn test_normalize_folds_parent_segments() {
        assert_eq!(
            normalize(Path::new("/srv/app/./src/../lib/x.rs")),
            PathBuf::from("/srv/app/lib/x.rs")
        );
    }

    #[test]
    fn test_traversal_is_denied() {
        let live = LiveSource::new("/srv/app");
        assert!(matches!(
            live.locate(&id("../../etc/passwd")),
            Err(SourceError::AccessDenied { .. })
        ));
        assert!(matches!(
            live.locate(&id("../secret")),
            Err(SourceError::AccessDenied { .. })
        ));
    }

    #[test]
    fn test_absolute_identifier_is_denied() {
        let live = LiveSource::new("/srv/app");
        assert!(matches!(
            live.locate(&id("/etc/passwd")),
            Err(SourceError::AccessDenied { .. })
        ));
    }

    #[test]
    fn test_sibling_directory_with_shared_prefix_is_denied() {
        let live = LiveSource::new("/srv/app");
        assert!(matches!(
            live.locate(&id("../app2/x.rs")),
            Err(SourceError::AccessDenied { .. })
        ));
    }

    #[test]
    fn test_inner_parent_segments_are_allowed() {
        let live = LiveSource::new("/srv/app");
        assert_eq!(
            live.locate(&id("src/../lib/x.rs")).unwrap(),
            PathBuf::from("/srv/app/lib/x.rs")
        );
    }

    #[test]
    fn test_read_existing_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "console.log(1)").unwrap();

        let live = LiveSource::new(dir.path());
        assert_eq!(live.read(&id("src/a.ts")).unwrap(), "console.log(1)");
        assert!(matches!(
            live.read(&id("src/b.ts")),
            Err(SourceError::NotFound { .. })
        ));
        assert!(matches!(
            live.read(&id("src")),
            Err(SourceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_internal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let live = LiveSource::new(dir.path());
        assert!(matches!(
            live.read(&id("blob.bin")),
            Err(SourceError::Internal { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escaping_root_is_denied() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "hunter2").unwrap();

        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            root.path().join("link.txt"),
        )
        .unwrap();

        let live = LiveSource::new(root.path());
        assert!(matches!(
            live.read(&id("link.txt")),
            Err(SourceError::AccessDenied { .. })
        ));
    }

    fn segment() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just(".."), Just("."), Just("src"), Just("lib"), Just("a.ts")]
    }

    proptest! {
        #[test]
        fn test_located_paths_never_leave_root(
            segments in proptest::collection::vec(segment(), 1..8)
        ) {
            let live = LiveSource::new("/srv/app");
            let raw = segments.join("/");
            match live.locate(&id(&raw)) {
                Ok(path) => prop_assert!(path.starts_with("/srv/app")),
                Err(err) => {
                    let denied = matches!(err, SourceError::AccessDenied { .. });
                    prop_assert!(denied);
                }
            }
        }
    }
}
