//! Clipboard backends for environments without a system clipboard.

use std::fs;
use std::path::PathBuf;

use certify_core::{Clipboard, ClipboardError};

/// Writes copied text to a file, replacing its contents.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    /// Creates a clipboard backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Clipboard for FileClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        fs::write(&self.path, text)
            .map_err(|e| ClipboardError::new(format!("{}: {e}", self.path.display())))
    }
}

/// A clipboard that refuses every copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn copy(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::new("no clipboard is available"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_clipboard_writes_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.txt");
        FileClipboard::new(&path).copy("https://x.test/?id=A").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "https://x.test/?id=A");
    }

    #[test]
    fn file_clipboard_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileClipboard::new(dir.path().join("missing").join("clip.txt"))
            .copy("x")
            .unwrap_err();
        assert!(err.reason.contains("clip.txt"));
    }

    #[test]
    fn no_clipboard_always_fails() {
        assert!(NoClipboard.copy("x").is_err());
    }
}
