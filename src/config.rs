use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Top-level server configuration.
///
/// Every field has a default, so an empty YAML document (or no file at all)
/// yields a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the acceptor binds to
    pub listen_addr: String,
    /// Keep-alive idle deadline in milliseconds
    pub idle_timeout_ms: u64,
    /// Largest header block accepted before the terminator is seen
    pub max_header_bytes: usize,
    /// Largest declared Content-Length accepted
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory backing the content store
    pub root: PathBuf,
    /// Names that DELETE refuses to touch
    pub protected: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            idle_timeout_ms: 3000,
            max_header_bytes: 8 * 1024,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("resources"),
            protected: vec!["index.html".to_string(), "script.js".to_string()],
        }
    }
}

impl ServerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// `CONFIG` names a YAML file (default `config.yaml`, skipped when absent);
    /// `LISTEN`, `IDLE_TIMEOUT_MS` and `RESOURCES_DIR` override the file.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] but with an injectable variable lookup.
    pub fn load_from<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup("CONFIG").unwrap_or_else(|| "config.yaml".to_string());
        let path = Path::new(&path);

        let mut cfg = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        if let Some(listen_addr) = lookup("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }
        if let Some(ms) = lookup("IDLE_TIMEOUT_MS") {
            cfg.server.idle_timeout_ms = ms
                .parse()
                .with_context(|| format!("IDLE_TIMEOUT_MS is not a number: {ms}"))?;
        }
        if let Some(root) = lookup("RESOURCES_DIR") {
            cfg.store.root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}
