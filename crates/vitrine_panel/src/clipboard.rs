//! Clipboard capability
//!
//! The panel never touches a system clipboard on its own; callers pass in an
//! implementation of [`Clipboard`]. Terminals get [`Osc52Clipboard`], tests and
//! headless runs get [`MemoryClipboard`].

use std::io::{self, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Errors that can occur while writing to a clipboard
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Encoded payload exceeds what the backend accepts
    #[error("clipboard payload too large: {len} bytes (max {max})")]
    TooLarge { len: usize, max: usize },

    /// Backend refused the write
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Io(#[from] io::Error),
}

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl<C: Clipboard + ?Sized> Clipboard for &mut C {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).set_text(text)
    }
}

/// In-process clipboard
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    refuse: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes always fail
    pub fn refusing() -> Self {
        Self {
            contents: None,
            refuse: true,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.refuse {
            return Err(ClipboardError::Unavailable("write refused".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard that emits an OSC 52 escape sequence to a terminal
pub struct Osc52Clipboard<W: Write> {
    writer: W,
    max_payload: usize,
}

impl<W: Write> Osc52Clipboard<W> {
    /// Common terminal limit on the base64 payload
    pub const DEFAULT_MAX_PAYLOAD: usize = 100_000;

    pub fn new(writer: W) -> Self {
        Self {
            writer,
            max_payload: Self::DEFAULT_MAX_PAYLOAD,
        }
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let encoded = STANDARD.encode(text.as_bytes());
        if encoded.len() > self.max_payload {
            return Err(ClipboardError::TooLarge {
                len: encoded.len(),
                max: self.max_payload,
            });
        }

        write!(self.writer, "\x1b]52;c;{encoded}\x07")?;
        self.writer.flush()?;
        tracing::debug!("Wrote {} bytes to clipboard via OSC 52", text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.set_text("hi").unwrap();
        assert_eq!(clipboard.into_inner(), b"\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_osc52_rejects_oversized_payload() {
        let mut clipboard = Osc52Clipboard::new(Vec::new()).with_max_payload(4);
        let err = clipboard.set_text("hello").unwrap_err();
        assert!(matches!(err, ClipboardError::TooLarge { len: 8, max: 4 }));
        assert!(clipboard.into_inner().is_empty());
    }

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.set_text("abc").unwrap();
        assert_eq!(clipboard.contents(), Some("abc"));

        assert!(MemoryClipboard::refusing().set_text("abc").is_err());
    }
}
