#![warn(missing_docs)]
//! # wavhide-clipboard
//!
//! ## Purpose
//! Copies short strings (the key id of a hide operation) to the user's
//! clipboard.
//!
//! ## Responsibilities
//! - Define one [`Clipboard`] capability with interchangeable backends.
//! - Provide the system backend ([`SystemClipboard`], via `arboard`).
//! - Provide a terminal fallback ([`TerminalClipboard`]) that emits an OSC 52
//!   set-selection sequence and prints the text for manual selection.
//!
//! ## Data flow
//! Startup calls [`select_clipboard`] once; the chosen backend is then used for
//! every copy without re-detecting capabilities.
//!
//! ## Error model
//! Opening the system clipboard fails with [`ClipboardError`]; copy failures
//! are reported as `false` and callers show a manual-copy hint.

use std::io::Write;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Clipboard backend failure.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No system clipboard is reachable (for example a headless session).
    #[error("system clipboard unavailable: {0}")]
    Unavailable(#[from] arboard::Error),
}

/// Which backend a [`Clipboard`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardKind {
    /// Native system clipboard.
    System,
    /// Terminal escape sequence plus manual selection.
    Terminal,
}

/// Copy-to-clipboard capability.
pub trait Clipboard {
    /// Copies `text`. Returns `true` when the backend accepted it.
    ///
    /// Empty text is never copied.
    fn copy(&mut self, text: &str) -> bool;

    /// Returns the backend kind.
    fn kind(&self) -> ClipboardKind;
}

/// Native clipboard backend.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Opens the system clipboard.
    ///
    /// # Errors
    /// Returns [`ClipboardError::Unavailable`] when no clipboard is reachable.
    pub fn open() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new()?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.inner.set_text(text.to_string()).is_ok()
    }

    fn kind(&self) -> ClipboardKind {
        ClipboardKind::System
    }
}

/// Manual-selection fallback writing to a terminal stream.
#[derive(Debug)]
pub struct TerminalClipboard<W: Write> {
    out: W,
}

impl<W: Write> TerminalClipboard<W> {
    /// Creates a fallback backend writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the backend and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for TerminalClipboard<W> {
    fn copy(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        let written = self
            .out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| {
                writeln!(
                    self.out,
                    "Si no se copió automáticamente, seleccione el texto manualmente: {text}"
                )
            })
            .and_then(|_| self.out.flush());
        written.is_ok()
    }

    fn kind(&self) -> ClipboardKind {
        ClipboardKind::Terminal
    }
}

/// Builds the OSC 52 "set clipboard selection" escape sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Picks the clipboard backend once: system when reachable, otherwise the
/// terminal fallback on stderr.
pub fn select_clipboard() -> Box<dyn Clipboard> {
    match SystemClipboard::open() {
        Ok(system) => Box::new(system),
        Err(_) => Box::new(TerminalClipboard::new(std::io::stderr())),
    }
}
