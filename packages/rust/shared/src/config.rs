//! Application configuration for the SimpleNS onboarding service.
//!
//! Config lives in `simplens.toml` in the working directory (or wherever
//! `--config` points). CLI flags override config file values, which override
//! defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SimplensError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "simplens.toml";

// ---------------------------------------------------------------------------
// Config structs (matching simplens.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener and response settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Script asset store.
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Content documents (changelog).
    #[serde(default)]
    pub content: ContentConfig,

    /// Install recommendation widget.
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Public origin used when rendering install commands.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `max-age` for the shared-cache directive on script responses.
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            base_url: default_base_url(),
            cache_max_age_secs: default_cache_max_age(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}
fn default_base_url() -> String {
    "https://simplens.in".into()
}
fn default_cache_max_age() -> u64 {
    3600
}

impl ServerConfig {
    /// Parse the bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e| {
            SimplensError::config(format!("invalid bind address '{}': {e}", self.bind))
        })
    }

    /// Parse the public base URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| {
            SimplensError::config(format!("invalid base_url '{}': {e}", self.base_url))
        })
    }
}

/// `[assets]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory holding `onboard.sh` and `onboard.ps1`.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
        }
    }
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("public").join("scripts")
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Front-matter annotated changelog document.
    #[serde(default = "default_changelog_path")]
    pub changelog_path: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            changelog_path: default_changelog_path(),
        }
    }
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("content").join("changelog.mdx")
}

/// `[widget]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// How long the "copied" feedback stays visible, in milliseconds.
    #[serde(default = "default_copy_feedback_ms")]
    pub copy_feedback_ms: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            copy_feedback_ms: default_copy_feedback_ms(),
        }
    }
}

fn default_copy_feedback_ms() -> u64 {
    2000
}

impl WidgetConfig {
    pub fn copy_feedback_delay(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

impl AppConfig {
    /// Check the fields that cannot be validated by deserialization alone.
    pub fn validate(&self) -> Result<()> {
        self.server.bind_addr()?;
        self.server.base_url()?;
        if self.widget.copy_feedback_ms == 0 {
            return Err(SimplensError::config(
                "widget.copy_feedback_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `simplens.toml` from the working directory. Returns defaults if the
/// file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SimplensError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        SimplensError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Write a default config file into `dir`. Refuses to overwrite an existing one.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(SimplensError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| SimplensError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SimplensError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
