use std::fs;
use std::io::Write;
use std::process::Command;

use log::debug;
use tempfile::Builder;

use crate::errors::{Result, SnipitError};

const FALLBACK_EDITOR: &str = "vi";

pub fn default_editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Opens `editor` on a scratch file seeded with `initial` and returns what
/// the user saved. `editor` may carry arguments, e.g. `code --wait`.
pub fn capture(editor: &str, initial: &str) -> Result<String> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| SnipitError::Editor("no editor configured".to_string()))?;

    let mut scratch = Builder::new()
        .prefix("snipit-")
        .suffix(".txt")
        .tempfile()
        .map_err(|e| SnipitError::Editor(e.to_string()))?;
    scratch
        .write_all(initial.as_bytes())
        .and_then(|_| scratch.flush())
        .map_err(|e| SnipitError::io(scratch.path(), e))?;

    debug!("launching {} on {}", editor, scratch.path().display());
    let status = Command::new(program)
        .args(parts)
        .arg(scratch.path())
        .status()
        .map_err(|e| SnipitError::Editor(format!("failed to launch {}: {}", program, e)))?;
    if !status.success() {
        return Err(SnipitError::Editor(format!("{} exited with {}", program, status)));
    }

    fs::read_to_string(scratch.path()).map_err(|e| SnipitError::io(scratch.path(), e))
}
