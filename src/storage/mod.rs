pub mod json;
pub mod lock;
pub mod models;

use crate::errors::Result;
use models::{NewSnippet, Snippet, SnippetFilter, Store};

pub trait SnippetStorage {
    fn load(&self) -> Result<Store>;
    fn save(&self, store: &Store) -> Result<()>;
    fn add(&self, snippet: NewSnippet) -> Result<Snippet>;
    fn delete_by_id(&self, id: i64) -> Result<bool>;

    fn get_all(&self) -> Result<Vec<Snippet>> {
        Ok(self.load()?.snippets)
    }

    /// Case-insensitive exact title match; first hit wins.
    fn get_by_title(&self, title: &str) -> Result<Option<Snippet>> {
        let wanted = title.to_lowercase();
        Ok(self
            .load()?
            .snippets
            .into_iter()
            .find(|s| s.title.to_lowercase() == wanted))
    }

    fn list(&self, filter: &SnippetFilter) -> Result<Vec<Snippet>> {
        let mut snippets = self.get_all()?;
        snippets.retain(|s| filter.matches(s));
        Ok(snippets)
    }
}
