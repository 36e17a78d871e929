use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{Result, SnipitError};
use crate::storage::json::JsonStorage;
use crate::storage::models::{NewSnippet, Store, normalize_tags, today};

/// A snippet record read from an import file. Only `title` is required,
/// and it must not be blank.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCandidate {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(deserialize_with = "non_blank")]
    pub title: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
    /// Subset of `added` that went in under a new title.
    pub renamed: usize,
}

fn non_blank<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let title = String::deserialize(deserializer)?;
    if title.trim().is_empty() {
        return Err(serde::de::Error::custom("snippet title cannot be empty"));
    }
    Ok(title)
}

/// Normalizes the two accepted payload shapes into one candidate list:
/// a bare array, or an object holding the array under `snippets`.
/// Any other shape yields no candidates.
pub fn parse_candidates(raw: &str) -> std::result::Result<Vec<ImportCandidate>, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("snippets") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };
    serde_json::from_value(Value::Array(records))
}

pub struct Reconciler {
    counter: u32,
    created_at: String,
}

impl Reconciler {
    pub fn new(created_at: String) -> Self {
        Self {
            counter: 0,
            created_at,
        }
    }

    /// Merges candidates into `store` in input order. Each added candidate
    /// is visible to the duplicate and conflict checks of later ones.
    pub fn reconcile(&mut self, store: &mut Store, candidates: Vec<ImportCandidate>) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        for candidate in candidates {
            let exact_duplicate = candidate
                .id
                .is_some_and(|id| store.snippets.iter().any(|s| s.id == id && s.title == candidate.title));
            if exact_duplicate {
                debug!("skipping duplicate {:?}", candidate.title);
                report.skipped += 1;
                continue;
            }

            let title = if store.has_title(&candidate.title) {
                let renamed = self.rename(store, &candidate.title);
                debug!("title conflict: {:?} imported as {:?}", candidate.title, renamed);
                report.renamed += 1;
                renamed
            } else {
                candidate.title
            };

            let created_at = candidate.created_at.unwrap_or_else(|| self.created_at.clone());
            store.push(
                NewSnippet {
                    title,
                    code: candidate.code,
                    tags: normalize_tags(candidate.tags),
                },
                created_at,
            )?;
            report.added += 1;
        }

        Ok(report)
    }

    fn rename(&mut self, store: &Store, title: &str) -> String {
        loop {
            self.counter += 1;
            let candidate = format!("{} (imported_{:04})", title, self.counter);
            if !store.has_title(&candidate) {
                return candidate;
            }
        }
    }
}

/// Reads `path` and merges its snippets into the store under one lock.
/// The store is written once, and only when something was added.
pub fn import_file(storage: &JsonStorage, path: &Path) -> Result<ImportReport> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SnipitError::NotFound(format!("File not found: {}", path.display())));
        }
        Err(e) => return Err(SnipitError::io(path, e)),
    };
    let candidates = parse_candidates(&raw).map_err(|source| SnipitError::InvalidImport {
        path: path.to_path_buf(),
        source,
    })?;
    if candidates.is_empty() {
        info!("no snippets found in {}", path.display());
        return Ok(ImportReport::default());
    }

    let total = candidates.len();
    let report = storage.modify(|store| {
        let report = Reconciler::new(today()).reconcile(store, candidates)?;
        Ok((report, report.added > 0))
    })?;
    info!(
        "imported {} of {} snippet(s) from {} ({} skipped, {} renamed)",
        report.added,
        total,
        path.display(),
        report.skipped,
        report.renamed
    );
    Ok(report)
}
