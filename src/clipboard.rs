//! System clipboard access

use async_trait::async_trait;
use thiserror::Error;

/// Clipboard write failures
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display)
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard refused the text
    #[error("Clipboard error: {0}")]
    WriteFailed(String),
}

/// Asynchronous text clipboard
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    /// Replace the clipboard contents with `text`
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError` if the clipboard cannot be opened or written.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard of the desktop session, via `arboard`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}
