//! Installer script delivery: the read-only asset store and the
//! per-platform transformation pipeline.
//!
//! This crate provides:
//! - [`AssetStore`]: resolves and reads `onboard.sh` / `onboard.ps1`
//! - [`transform`]: makes a raw script safe to run via `curl | bash` / `irm | iex`
//! - [`TransformedScript`]: the per-request output, with its response metadata

pub mod store;
pub mod transform;

pub use store::AssetStore;
pub use transform::{POSIX_PREAMBLE, TransformedScript, normalize_line_endings, transform};
