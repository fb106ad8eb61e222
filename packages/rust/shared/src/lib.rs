//! Shared types, error model, and configuration for the SimpleNS onboarding service.
//!
//! This crate is the foundation depended on by all other SimpleNS crates.
//! It provides:
//! - [`SimplensError`]: the unified error type
//! - The closed [`Platform`] enumeration used by detection, commands, and routing
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, AssetsConfig, CONFIG_FILE_NAME, ContentConfig, ServerConfig, WidgetConfig,
    init_config, load_config, load_config_from,
};
pub use error::{Result, SimplensError};
pub use types::{Platform, ScriptKind};
