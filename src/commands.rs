use std::fs;
use std::path::PathBuf;

use crate::errors::{Result, SnipitError};
use crate::storage::SnippetStorage;

/// Process exit status for a finished command: 0 on success (soft
/// warnings included), 1 on any error.
pub fn exit_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

pub fn parse_id(raw: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| {
        SnipitError::InvalidInput("ID must be a number. Run `snipit list` to find IDs.".to_string())
    })
}

/// Deletes by a user-typed id. A missing id is an error here, unlike
/// `SnippetStorage::delete_by_id`, since the user asked for that entry.
pub fn delete_snippet<S: SnippetStorage>(storage: &S, raw_id: &str) -> Result<i64> {
    let id = parse_id(raw_id)?;
    if !storage.delete_by_id(id)? {
        return Err(SnipitError::NotFound(format!("No snippet found with ID #{}", id)));
    }
    Ok(id)
}

/// Picks the code for `save`: `--file`, then `--code`, then the editor
/// when running interactively. File and inline code are trimmed; editor
/// input must not be blank.
pub fn read_code<F>(code: Option<String>, file: Option<PathBuf>, interactive: bool, capture: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    if let Some(path) = file {
        if !path.exists() {
            return Err(SnipitError::NotFound(format!("File not found: {}", path.display())));
        }
        let raw = fs::read_to_string(&path).map_err(|e| SnipitError::io(&path, e))?;
        return Ok(raw.trim().to_string());
    }
    if let Some(code) = code {
        return Ok(code.trim().to_string());
    }
    if !interactive {
        return Err(SnipitError::InvalidInput("Provide either --code or --file".to_string()));
    }

    let captured = capture()?;
    let captured = captured.trim();
    if captured.is_empty() {
        return Err(SnipitError::InvalidInput("Snippet code cannot be empty".to_string()));
    }
    Ok(captured.to_string())
}
