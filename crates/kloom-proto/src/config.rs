use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Visitor-facing terminal listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_bind")]
    pub bind_address: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the `shows.json` catalog.
    #[serde(default = "platform::default_catalog_path")]
    pub path: PathBuf,
    /// Public root of the archive website; local-audio shows link below it.
    #[serde(default = "default_site_url")]
    pub site_url: String,
}

/// Per-connection timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Redraw interval on animated pages (intro, splash, detail).
    #[serde(default = "default_fast_redraw_ms")]
    pub fast_redraw_ms: u64,
    /// Redraw interval on static pages (archive, about, help).
    #[serde(default = "default_slow_redraw_ms")]
    pub slow_redraw_ms: u64,
    /// How long to wait for the rest of a cursor sequence after a bare ESC.
    #[serde(default = "default_escape_timeout_ms")]
    pub escape_timeout_ms: u64,
}

/// Read-only JSON status endpoint. Off unless the config turns it on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_http_bind")]
    pub bind_address: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_server_bind(),
            port: default_server_port(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: platform::default_catalog_path(),
            site_url: default_site_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fast_redraw_ms: default_fast_redraw_ms(),
            slow_redraw_ms: default_slow_redraw_ms(),
            escape_timeout_ms: default_escape_timeout_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_http_bind(),
            port: default_http_port(),
        }
    }
}

impl SessionConfig {
    pub fn fast_redraw(&self) -> Duration {
        Duration::from_millis(self.fast_redraw_ms)
    }

    pub fn slow_redraw(&self) -> Duration {
        Duration::from_millis(self.slow_redraw_ms)
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }
}

fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    platform::DEFAULT_PORT
}

fn default_site_url() -> String {
    "https://willbearfruits.github.io/kloom-radio".to_string()
}

fn default_fast_redraw_ms() -> u64 {
    500
}

fn default_slow_redraw_ms() -> u64 {
    5000
}

fn default_escape_timeout_ms() -> u64 {
    100
}

fn default_http_enabled() -> bool {
    false
}

fn default_http_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8989
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
