use arboard::Clipboard;
use simplens_shared::{Result, SimplensError};
use simplens_widget::ClipboardWriter;

/// Arboard-based system clipboard.
pub(crate) struct ArboardClipboard {
    clipboard: Clipboard,
}

impl ArboardClipboard {
    pub(crate) fn new() -> Result<Self> {
        let clipboard = Clipboard::new().map_err(clipboard_error)?;
        Ok(Self { clipboard })
    }
}

fn clipboard_error(e: arboard::Error) -> SimplensError {
    SimplensError::Clipboard(e.to_string())
}

impl ClipboardWriter for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).map_err(clipboard_error)
    }

    /// On Linux the selection dies with this process; serve it until a
    /// clipboard manager or another application replaces it.
    #[cfg(target_os = "linux")]
    fn hold(&mut self, text: &str) -> Result<()> {
        use arboard::SetExtLinux;

        tracing::info!("keeping clipboard contents until replaced (Ctrl-C to stop)");
        self.clipboard
            .set()
            .wait()
            .text(text.to_owned())
            .map_err(clipboard_error)
    }
}
