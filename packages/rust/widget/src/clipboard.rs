//! Clipboard seam for the copy action.

use simplens_shared::Result;

/// Port for writing text to the system clipboard.
pub trait ClipboardWriter {
    /// Write text to the clipboard.
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// Keep `text` pasteable after the writer is dropped. Clipboards owned by
    /// the writing process (X11, Wayland) lose their contents on exit, so an
    /// implementation may block here until another owner takes over.
    fn hold(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}
