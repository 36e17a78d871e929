use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::errors::{Result, SnipitError};
use crate::storage::SnippetStorage;

#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The store holds no snippets; nothing was written.
    Empty,
    Written { path: PathBuf, count: usize },
}

/// Makes `output` absolute against `cwd`, collapses `.` and `..`, and
/// appends `.json` if missing.
pub fn resolve_destination(output: &Path, cwd: &Path) -> PathBuf {
    let joined = if output.is_absolute() {
        output.to_path_buf()
    } else {
        cwd.join(output)
    };
    let absolute = normalize(&joined);
    if absolute.to_string_lossy().ends_with(".json") {
        absolute
    } else {
        let mut raw = absolute.into_os_string();
        raw.push(".json");
        PathBuf::from(raw)
    }
}

/// Lexical normalization; `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Writes the snippet list (without `lastId`) as pretty JSON. Refuses to
/// replace anything already present at the destination.
pub fn export_to<S: SnippetStorage>(storage: &S, output: &Path, cwd: &Path) -> Result<ExportOutcome> {
    let snippets = storage.get_all()?;
    if snippets.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    let path = resolve_destination(output, cwd);
    if path.exists() {
        return Err(SnipitError::AlreadyExists(path));
    }

    let body = serde_json::to_string_pretty(&snippets)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => SnipitError::AlreadyExists(path.clone()),
            _ => SnipitError::io(&path, e),
        })?;
    file.write_all(body.as_bytes()).map_err(|e| SnipitError::io(&path, e))?;
    debug!("exported {} snippet(s) to {}", snippets.len(), path.display());

    Ok(ExportOutcome::Written {
        path,
        count: snippets.len(),
    })
}
