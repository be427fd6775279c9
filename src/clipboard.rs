//! Clipboard sink for copying generated passwords

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Anything that can receive copied text
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard, opened on first use.
///
/// The handle is kept for the life of the app: on X11 the copied text is
/// only served while its owner is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    hold_until_replaced: bool,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// For one-shot processes that exit right after copying: on Linux each
    /// write blocks until another program takes the clipboard over.
    pub fn until_replaced() -> Self {
        Self {
            inner: None,
            hold_until_replaced: true,
        }
    }

    fn write(clipboard: &mut arboard::Clipboard, text: &str, hold: bool) -> Result<(), arboard::Error> {
        #[cfg(target_os = "linux")]
        if hold {
            use arboard::SetExtLinux;
            return clipboard.set().wait().text(text.to_owned());
        }

        #[cfg(not(target_os = "linux"))]
        let _ = hold;

        clipboard.set_text(text.to_owned())
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }

        let hold = self.hold_until_replaced;
        match self.inner.as_mut() {
            Some(clipboard) => Self::write(clipboard, text, hold)
                .map_err(|e| ClipboardError::Write(e.to_string())),
            None => Err(ClipboardError::Unavailable("not initialised".to_string())),
        }
    }
}
