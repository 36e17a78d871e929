use arboard::Clipboard;

use crate::errors::{Result, SnipitError};

pub fn write_text_to_clipboard(text: &str) -> Result<()> {
    let mut cb = Clipboard::new().map_err(|e| SnipitError::Clipboard(e.to_string()))?;
    cb.set_text(text).map_err(|e| SnipitError::Clipboard(e.to_string()))
}
