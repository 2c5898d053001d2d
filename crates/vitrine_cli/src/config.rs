//! Vitrine configuration file handling
//!
//! `vitrine.toml` sits at the project root and is optional; every field has a
//! default. Relative paths are resolved against the directory the file was
//! loaded from.
//!
//! ```toml
//! [source]
//! root = "."
//! snapshot = "target/vitrine/snapshot.json"
//! mode = "development"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! route = "/api/source"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vitrine_core::RuntimeMode;
use vitrine_server::ServerConfig;

/// Environment variable that overrides `source.mode`
pub const MODE_ENV: &str = "VITRINE_MODE";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VitrineConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Directory identifiers are resolved against
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Snapshot written by `vitrine bundle` and loaded by `serve`/`show`
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
    #[serde(default)]
    pub mode: RuntimeMode,
    /// Identifiers bundled in addition to the demo catalog
    #[serde(default)]
    pub extra: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("target/vitrine/snapshot.json")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            snapshot: default_snapshot(),
            mode: RuntimeMode::default(),
            extra: Vec::new(),
        }
    }
}

impl VitrineConfig {
    pub const FILE_NAME: &'static str = "vitrine.toml";

    /// Load `vitrine.toml` from `dir`, or defaults if there is none
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str::<VitrineConfig>(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            tracing::debug!("No {} in {}, using defaults", Self::FILE_NAME, dir.display());
            VitrineConfig::default()
        };

        config.source.root = resolve(dir, &config.source.root);
        config.source.snapshot = resolve(dir, &config.source.snapshot);
        Ok(config)
    }

    /// Apply `VITRINE_MODE` if it is set
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var(MODE_ENV) {
            self.apply_mode_override(&value)?;
        }
        Ok(())
    }

    pub fn apply_mode_override(&mut self, value: &str) -> Result<()> {
        self.source.mode = value
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("Invalid runtime mode override '{}'", value))?;
        Ok(())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
