//! Install recommendation widget logic.
//!
//! This crate provides:
//! - [`detector`]: pure, total user-agent → [`Platform`] mapping
//! - [`CommandRegistry`]: the fixed table of install commands
//! - [`PlatformSelection`] and [`CopyFeedback`]: the widget's two state machines
//! - [`InstallWidget`]: ties them together behind a [`ClipboardWriter`] seam

pub mod clipboard;
pub mod detector;
pub mod feedback;
pub mod registry;
pub mod selection;
mod widget;

pub use clipboard::ClipboardWriter;
pub use detector::{detect, detect_host, detect_user_agent, host_signal};
pub use feedback::{CopyFeedback, FeedbackState};
pub use registry::{CommandRegistry, CommandTemplate};
pub use selection::PlatformSelection;
pub use simplens_shared::Platform;
pub use widget::InstallWidget;
