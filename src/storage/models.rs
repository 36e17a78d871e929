use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SnipitError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub snippets: Vec<Snippet>,
    pub last_id: i64,
}

impl Store {
    /// Next free id. Equal to `last_id + 1` unless the file was edited by
    /// hand and holds ids above the high-water mark.
    pub fn next_id(&self) -> Result<i64> {
        let max_id = self.snippets.iter().map(|s| s.id).max().unwrap_or(0);
        let high = self.last_id.max(max_id);
        high.checked_add(1).ok_or(SnipitError::IdOverflow(high))
    }

    /// Appends a snippet under a freshly assigned id and bumps `last_id`.
    pub fn push(&mut self, new: NewSnippet, created_at: String) -> Result<Snippet> {
        let snippet = Snippet {
            id: self.next_id()?,
            title: new.title,
            code: new.code,
            tags: new.tags,
            created_at,
        };
        self.last_id = snippet.id;
        self.snippets.push(snippet.clone());
        Ok(snippet)
    }

    pub fn has_title(&self, title: &str) -> bool {
        self.snippets.iter().any(|s| s.title == title)
    }
}

#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub title: String,
    pub code: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SnippetFilter {
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl SnippetFilter {
    pub fn matches(&self, snippet: &Snippet) -> bool {
        if let Some(ref tag) = self.tag {
            let tag = tag.to_lowercase();
            if !snippet.tags.iter().any(|t| *t == tag) {
                return false;
            }
        }
        if let Some(ref query) = self.search {
            let query = query.to_lowercase();
            if !snippet.title.to_lowercase().contains(&query) {
                return false;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.search.is_none()
    }
}

/// Splits a comma list into lowercase tags, dropping empty pieces.
pub fn parse_tags(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(','))
}

/// Trims and lowercases each tag, dropping empty ones. Duplicates stay.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
