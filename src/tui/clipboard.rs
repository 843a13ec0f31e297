//! Clipboard access for the session view.
//!
//! Two transports, tried in order:
//! 1. OSC 52 - terminal clipboard escape sequence (works over SSH)
//! 2. System clipboard via the `arboard` crate

use std::fmt;
use std::io::Write;

use tracing::debug;

/// Clipboard interface with transport fallback.
pub struct Clipboard;

impl Clipboard {
    /// Copies text to the clipboard.
    ///
    /// Returns `Ok(())` if any transport succeeded.
    pub fn copy(text: &str) -> Result<(), ClipboardError> {
        match Self::copy_osc52(text) {
            Ok(()) => {
                debug!("clipboard write via OSC 52");
                Ok(())
            }
            Err(osc_err) => {
                debug!(%osc_err, "OSC 52 failed, falling back to system clipboard");
                Self::copy_system(text)
            }
        }
    }

    /// Copies text using the OSC 52 escape sequence.
    ///
    /// Written directly to stdout; the terminal intercepts the sequence and
    /// forwards the payload to the system clipboard.
    fn copy_osc52(text: &str) -> Result<(), ClipboardError> {
        use base64::Engine;

        let encoded = base64::engine::general_purpose::STANDARD.encode(text);

        // OSC 52 format: ESC ] 52 ; c ; <base64-data> ESC \
        // 'c' selects the system clipboard.
        let mut stdout = std::io::stdout();
        write!(stdout, "\x1b]52;c;{}\x1b\\", encoded)
            .map_err(|e| ClipboardError::Osc52(e.to_string()))?;
        stdout
            .flush()
            .map_err(|e| ClipboardError::Osc52(e.to_string()))?;

        Ok(())
    }

    /// Copies text using the system clipboard.
    fn copy_system(text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::System(e.to_string()))?;

        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::System(e.to_string()))?;

        Ok(())
    }
}

/// Clipboard operation errors.
#[derive(Debug)]
pub enum ClipboardError {
    /// OSC 52 write failed.
    Osc52(String),
    /// System clipboard operation failed.
    System(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Osc52(msg) => write!(f, "OSC 52 clipboard failed: {}", msg),
            ClipboardError::System(msg) => write!(f, "System clipboard failed: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}
