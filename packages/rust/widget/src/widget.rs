//! The install recommendation widget: selection + copy feedback over a
//! shared command registry.

use std::sync::Arc;
use std::time::Duration;

use simplens_shared::Platform;
use tracing::debug;

use crate::clipboard::ClipboardWriter;
use crate::feedback::{CopyFeedback, FeedbackState};
use crate::registry::{CommandRegistry, CommandTemplate};
use crate::selection::PlatformSelection;

/// One mounted widget instance. Dropping it is the unmount: any pending
/// feedback timer is cancelled.
#[derive(Debug)]
pub struct InstallWidget {
    registry: Arc<CommandRegistry>,
    selection: PlatformSelection,
    feedback: CopyFeedback,
}

impl InstallWidget {
    /// Mount the widget, detecting the initial platform from `signal`.
    pub fn mount(registry: Arc<CommandRegistry>, signal: Option<&str>, delay: Duration) -> Self {
        Self {
            registry,
            selection: PlatformSelection::detect(signal),
            feedback: CopyFeedback::new(delay),
        }
    }

    pub fn selected(&self) -> Platform {
        self.selection.current()
    }

    /// Explicit user choice from the platform dropdown.
    pub fn select(&mut self, platform: Platform) {
        self.selection.select(platform);
    }

    /// Template for the selected platform.
    pub fn template(&self) -> &CommandTemplate {
        self.registry.get(self.selection.current())
    }

    pub fn feedback(&self) -> FeedbackState {
        self.feedback.state()
    }

    /// Copy the selected command. Clipboard failures are swallowed: the
    /// feedback simply stays where it was.
    pub fn copy(&mut self, clipboard: &mut impl ClipboardWriter) -> FeedbackState {
        let command = &self.registry.get(self.selection.current()).command;
        match clipboard.write_text(command) {
            Ok(()) => self.feedback.mark_copied(),
            Err(e) => debug!(error = %e, "clipboard write failed"),
        }
        self.feedback.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplens_shared::{Result, SimplensError};
    use url::Url;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
    }

    impl ClipboardWriter for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    struct DeniedClipboard;

    impl ClipboardWriter for DeniedClipboard {
        fn write_text(&mut self, _text: &str) -> Result<()> {
            Err(SimplensError::Clipboard("permission denied".into()))
        }
    }

    fn registry() -> Arc<CommandRegistry> {
        Arc::new(CommandRegistry::new(
            &Url::parse("https://simplens.in").unwrap(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn copies_detected_command() {
        let registry = registry();
        let mut widget = InstallWidget::mount(
            Arc::clone(&registry),
            Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
            Duration::from_secs(2),
        );
        assert_eq!(widget.selected(), Platform::Windows);

        let mut clipboard = MemoryClipboard::default();
        assert_eq!(widget.copy(&mut clipboard), FeedbackState::Copied);
        assert_eq!(
            clipboard.contents.as_deref(),
            Some(registry.get(Platform::Windows).command.as_str())
        );

        tokio::time::sleep(Duration::from_millis(2_001)).await;
        tokio::task::yield_now().await;
        assert_eq!(widget.feedback(), FeedbackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn copies_user_selected_command() {
        let mut widget = InstallWidget::mount(registry(), None, Duration::from_secs(2));
        assert_eq!(widget.selected(), Platform::Linux);

        widget.select(Platform::PackageManager);
        assert_eq!(widget.template().command, "npx @simplens/onboard");

        let mut clipboard = MemoryClipboard::default();
        widget.copy(&mut clipboard);
        assert_eq!(clipboard.contents.as_deref(), Some("npx @simplens/onboard"));
    }

    #[tokio::test(start_paused = true)]
    async fn clipboard_failure_stays_idle() {
        let mut widget = InstallWidget::mount(registry(), None, Duration::from_secs(2));
        assert_eq!(widget.copy(&mut DeniedClipboard), FeedbackState::Idle);
        assert_eq!(widget.feedback(), FeedbackState::Idle);
    }
}
