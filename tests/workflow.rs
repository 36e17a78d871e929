use std::fs;
use std::path::Path;

use snipit::config::AppPaths;
use snipit::errors::SnipitError;
use snipit::export::{ExportOutcome, export_to};
use snipit::import::{ImportReport, import_file};
use snipit::storage::SnippetStorage;
use snipit::storage::json::JsonStorage;
use snipit::storage::models::{NewSnippet, today};
use tempfile::TempDir;

fn storage_in(dir: &Path, name: &str) -> JsonStorage {
    JsonStorage::new(AppPaths::from_base(dir.join(name)))
}

fn new_snippet(title: &str, code: &str, tags: &[&str]) -> NewSnippet {
    NewSnippet {
        title: title.to_string(),
        code: code.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn export_file(storage: &JsonStorage, dir: &Path, name: &str) -> std::path::PathBuf {
    match export_to(storage, Path::new(name), dir).unwrap() {
        ExportOutcome::Written { path, .. } => path,
        ExportOutcome::Empty => panic!("expected snippets to export"),
    }
}

#[test]
fn test_add_then_delete_scenario() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");

    let a = storage.add(new_snippet("A", "x", &["go"])).unwrap();
    assert_eq!(a.id, 1);
    assert_eq!(a.title, "A");
    assert_eq!(a.code, "x");
    assert_eq!(a.tags, vec!["go"]);
    assert_eq!(a.created_at, today());

    let b = storage.add(new_snippet("B", "y", &[])).unwrap();
    assert_eq!(b.id, 2);

    assert!(storage.delete_by_id(1).unwrap());
    let remaining = storage.get_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "B");

    assert!(!storage.delete_by_id(1).unwrap());
}

#[test]
fn test_export_import_roundtrip_into_empty_store() {
    let dir = TempDir::new().unwrap();
    let source = storage_in(dir.path(), "source");
    source.add(new_snippet("http get", "curl $URL", &["sh", "net"])).unwrap();
    source.add(new_snippet("hello", "fn main() {}", &["rust"])).unwrap();
    source.add(new_snippet("empty tags", "x = 1", &[])).unwrap();

    let exported = export_file(&source, dir.path(), "dump");
    let target = storage_in(dir.path(), "target");
    let report = import_file(&target, &exported).unwrap();
    assert_eq!(report, ImportReport { added: 3, skipped: 0, renamed: 0 });

    let strip = |s: snipit::storage::models::Snippet| (s.title, s.code, s.tags);
    let before: Vec<_> = source.get_all().unwrap().into_iter().map(strip).collect();
    let after: Vec<_> = target.get_all().unwrap().into_iter().map(strip).collect();
    assert_eq!(before, after);
}

#[test]
fn test_reimport_same_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let source = storage_in(dir.path(), "source");
    for title in ["one", "two", "three"] {
        source.add(new_snippet(title, "code", &[])).unwrap();
    }
    let exported = export_file(&source, dir.path(), "dump.json");

    let target = storage_in(dir.path(), "target");
    let first = import_file(&target, &exported).unwrap();
    assert_eq!(first.added, 3);

    let store_path = target.paths().store_path.clone();
    let on_disk = fs::read_to_string(&store_path).unwrap();

    let second = import_file(&target, &exported).unwrap();
    assert_eq!(second, ImportReport { added: 0, skipped: 3, renamed: 0 });
    assert_eq!(fs::read_to_string(&store_path).unwrap(), on_disk);
}

#[test]
fn test_import_conflict_keeps_original() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    storage.add(new_snippet("Test Snippet", "old code", &[])).unwrap();

    let file = dir.path().join("incoming.json");
    fs::write(
        &file,
        r#"{"snippets": [{"id": 2, "title": "Test Snippet", "code": "new code", "tags": [], "createdAt": "2024-01-02"}]}"#,
    )
    .unwrap();

    let report = import_file(&storage, &file).unwrap();
    assert_eq!(report, ImportReport { added: 1, skipped: 0, renamed: 1 });

    let all = storage.get_all().unwrap();
    assert_eq!(all[0].title, "Test Snippet");
    assert_eq!(all[0].code, "old code");
    assert!(all[1].title.starts_with("Test Snippet"));
    assert_ne!(all[1].title, "Test Snippet");
    assert_eq!(all[1].code, "new code");
    assert_eq!(all[1].created_at, "2024-01-02");
    assert_eq!(storage.load().unwrap().last_id, 2);
}

#[test]
fn test_import_missing_file() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    let result = import_file(&storage, &dir.path().join("nope.json"));
    assert!(matches!(result, Err(SnipitError::NotFound(_))));
}

#[test]
fn test_import_invalid_json() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    let file = dir.path().join("bad.json");
    fs::write(&file, "invalid json").unwrap();
    let result = import_file(&storage, &file);
    assert!(matches!(result, Err(SnipitError::InvalidImport { .. })));
    assert!(!storage.paths().store_path.exists());
}

#[test]
fn test_import_unknown_shape_is_empty() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    let file = dir.path().join("other.json");
    fs::write(&file, r#"{"notes": [1, 2, 3]}"#).unwrap();
    let report = import_file(&storage, &file).unwrap();
    assert_eq!(report, ImportReport::default());
    assert!(!storage.paths().store_path.exists());
}

#[test]
fn test_corrupt_store_surfaces_typed_error() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    fs::create_dir_all(&storage.paths().base_dir).unwrap();
    fs::write(&storage.paths().store_path, "not json at all").unwrap();

    assert!(matches!(storage.get_all(), Err(SnipitError::CorruptStore { .. })));
    assert!(matches!(
        storage.add(new_snippet("A", "x", &[])),
        Err(SnipitError::CorruptStore { .. })
    ));
    assert_eq!(
        fs::read_to_string(&storage.paths().store_path).unwrap(),
        "not json at all"
    );
}

#[test]
fn test_export_collision_is_hard_stop() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    storage.add(new_snippet("A", "x", &[])).unwrap();
    export_file(&storage, dir.path(), "backup");

    storage.add(new_snippet("B", "y", &[])).unwrap();
    let result = export_to(&storage, Path::new("backup"), dir.path());
    assert!(matches!(result, Err(SnipitError::AlreadyExists(_))));

    let raw = fs::read_to_string(dir.path().join("backup.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
}

#[test]
fn test_imported_mixed_case_tags_are_listable() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    let file = dir.path().join("tags.json");
    fs::write(&file, r#"[{"title": "T", "code": "c", "tags": ["Rust", " CLI "]}]"#).unwrap();

    import_file(&storage, &file).unwrap();
    assert_eq!(storage.get_all().unwrap()[0].tags, vec!["rust", "cli"]);

    let filter = snipit::storage::models::SnippetFilter {
        tag: Some("Rust".to_string()),
        ..Default::default()
    };
    assert_eq!(storage.list(&filter).unwrap().len(), 1);
}

#[test]
fn test_import_blank_title_rejected() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    let file = dir.path().join("blank.json");
    fs::write(&file, r#"[{"title": ""}]"#).unwrap();

    let result = import_file(&storage, &file);
    assert!(matches!(result, Err(SnipitError::InvalidImport { .. })));
    assert!(!storage.paths().store_path.exists());
}

#[test]
fn test_import_into_exhausted_store_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(dir.path(), "store");
    fs::create_dir_all(&storage.paths().base_dir).unwrap();
    let original = format!(r#"{{"snippets":[],"lastId":{}}}"#, i64::MAX);
    fs::write(&storage.paths().store_path, &original).unwrap();
    let file = dir.path().join("one.json");
    fs::write(&file, r#"[{"title": "A"}]"#).unwrap();

    let result = import_file(&storage, &file);
    assert!(matches!(result, Err(SnipitError::IdOverflow(_))));
    assert_eq!(fs::read_to_string(&storage.paths().store_path).unwrap(), original);
}
