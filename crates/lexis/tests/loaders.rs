//! Integration tests for loaders and the JSON source.

use std::fs;
use std::io::Write;
use std::sync::Arc;

use lexis::loader::{self, JsonLoader, Loader, MapLoader};
use lexis::{
    Entry, EntryOptions, KeyKind, LanguageManager, LoadError, LoaderError, RawValue, Resolver,
    Shape, TranslateError,
};
use tempfile::NamedTempFile;

fn manager_with_paths(paths: &[&str]) -> (Arc<LanguageManager>, Vec<Entry>) {
    let manager = LanguageManager::new("en");
    let entries = paths
        .iter()
        .map(|path| Entry::new(&manager, *path).unwrap())
        .collect();
    (manager, entries)
}

fn text(entry: &Entry) -> String {
    entry.text(None, &Resolver::empty()).unwrap()
}

// =========================================================================
// Loader Chains
// =========================================================================

#[test]
fn test_loader_sees_registered_paths() {
    let (manager, _entries) = manager_with_paths(&["b", "a"]);
    let seen = loader::from_fn(|values| {
        let paths: Vec<&str> = values.paths().iter().map(String::as_str).collect();
        assert_eq!(paths, vec!["a", "b"]);
        Ok(())
    });
    manager.load("en", [seen.into_shared()]).unwrap();
}

#[test]
fn test_later_loader_overrides_earlier() {
    let (manager, entries) = manager_with_paths(&["a", "b"]);
    manager
        .load(
            "en",
            [
                MapLoader::new([("a", "first a"), ("b", "first b")]).into_shared(),
                MapLoader::new([("b", "second b")]).into_shared(),
            ],
        )
        .unwrap();
    assert_eq!(text(&entries[0]), "first a");
    assert_eq!(text(&entries[1]), "second b");
}

#[test]
fn test_put_if_absent_and_put_if_present() {
    let (manager, entries) = manager_with_paths(&["a", "b"]);
    let base = MapLoader::new([("a", "base")]);
    let defaults = loader::from_fn(|values| {
        assert!(!values.put_if_absent("a", "default")?);
        assert!(values.put_if_absent("b", "default")?);
        Ok(())
    });
    let overrides = loader::from_fn(|values| {
        assert!(values.put_if_present("a", "override")?);
        assert_eq!(values.get("a").and_then(RawValue::as_str), Some("override"));
        assert_eq!(values.len(), 2);
        Ok(())
    });
    manager
        .load(
            "en",
            [base.into_shared(), defaults.into_shared(), overrides.into_shared()],
        )
        .unwrap();
    assert_eq!(text(&entries[0]), "override");
    assert_eq!(text(&entries[1]), "default");
}

#[test]
fn test_put_unknown_path_fails_load() {
    let (manager, _entries) = manager_with_paths(&["a"]);
    let stray = loader::from_fn(|values| {
        values.put("nope", "x")?;
        Ok(())
    });
    let error = manager.load("en", [stray.into_shared()]).unwrap_err();
    assert!(matches!(
        error,
        LoadError::Loader {
            source: LoaderError::UnknownPath { ref path },
            ..
        } if path == "nope"
    ));
}

#[test]
fn test_map_loader_ignores_unregistered_paths() {
    let (manager, entries) = manager_with_paths(&["a"]);
    manager
        .load("en", [MapLoader::new([("a", "x"), ("zzz", "y")]).into_shared()])
        .unwrap();
    assert_eq!(text(&entries[0]), "x");
}

// =========================================================================
// JSON Loader
// =========================================================================

#[test]
fn test_json_text_nested_and_flat_paths() {
    let (manager, entries) = manager_with_paths(&["menu.title", "menu.quit", "plain"]);
    let json = r#"{
        "menu": { "title": "Main <v>" },
        "menu.quit": "Quit",
        "plain": "Plain"
    }"#;
    manager
        .load("en", [JsonLoader::from_text(json).into_shared()])
        .unwrap();
    let resolver = Resolver::constant("v", "1.0");
    assert_eq!(entries[0].text(None, &resolver).unwrap(), "Main 1.0");
    assert_eq!(text(&entries[1]), "Quit");
    assert_eq!(text(&entries[2]), "Plain");
}

#[test]
fn test_json_collections() {
    let manager = LanguageManager::new("en");
    let days = Entry::register(
        &manager,
        "days",
        EntryOptions::builder().shape(Shape::array()).build(),
    )
    .unwrap();
    let counts = Entry::register(
        &manager,
        "counts",
        EntryOptions::builder()
            .shape(Shape::map(KeyKind::Long))
            .build(),
    )
    .unwrap();
    let json = r#"{ "days": ["Mon", "Tue"], "counts": { "1": "one", "2": "two" } }"#;
    manager
        .load("en", [JsonLoader::from_text(json).into_shared()])
        .unwrap();

    assert_eq!(text(&days), "[Mon, Tue]");
    assert_eq!(text(&counts), "{1: one, 2: two}");
}

#[test]
fn test_json_null_is_missing() {
    let (manager, entries) = manager_with_paths(&["a"]);
    manager
        .load("en", [JsonLoader::from_text(r#"{ "a": null }"#).into_shared()])
        .unwrap();
    assert!(entries[0].get(None).is_err());
}

#[test]
fn test_json_null_element_is_invalid_type() {
    let manager = LanguageManager::new("en");
    let list = Entry::register(
        &manager,
        "a",
        EntryOptions::builder().shape(Shape::array()).build(),
    )
    .unwrap();
    let labels = Entry::register(
        &manager,
        "b",
        EntryOptions::builder()
            .shape(Shape::map(KeyKind::String))
            .build(),
    )
    .unwrap();
    let json = r#"{ "a": ["x", null, "y"], "b": { "k": null } }"#;
    manager
        .load("en", [JsonLoader::from_text(json).into_shared()])
        .unwrap();

    assert_eq!(
        list.get(None).unwrap_err(),
        TranslateError::InvalidType {
            language: "en".into(),
            path: "a".into(),
            expected: "string".into(),
            found: "null".into(),
        }
    );
    assert!(matches!(
        labels.get(None),
        Err(TranslateError::InvalidType { found, .. }) if found == "null"
    ));
}

#[test]
fn test_malformed_json() {
    let (manager, _entries) = manager_with_paths(&["a"]);
    let error = manager
        .load("en", [JsonLoader::from_text("{ not json").into_shared()])
        .unwrap_err();
    assert!(matches!(
        error,
        LoadError::Loader {
            source: LoaderError::Json(_),
            ..
        }
    ));
}

#[test]
fn test_json_file_is_reread_on_reload() {
    let (manager, entries) = manager_with_paths(&["greeting"]);
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "greeting": "Hello" }}"#).unwrap();
    file.flush().unwrap();

    manager
        .load("en", [JsonLoader::from_file(file.path()).into_shared()])
        .unwrap();
    assert_eq!(text(&entries[0]), "Hello");

    fs::write(file.path(), r#"{ "greeting": "Hi" }"#).unwrap();
    manager.reload().unwrap();
    assert_eq!(text(&entries[0]), "Hi");
}

#[test]
fn test_missing_json_file() {
    let (manager, _entries) = manager_with_paths(&["a"]);
    let dir = tempfile::tempdir().unwrap();
    let error = manager
        .load(
            "en",
            [JsonLoader::from_file(dir.path().join("absent.json")).into_shared()],
        )
        .unwrap_err();
    assert!(matches!(
        error,
        LoadError::Loader {
            source: LoaderError::Io { .. },
            ..
        }
    ));
}

#[test]
fn test_failed_json_reload_keeps_old_values() {
    let (manager, entries) = manager_with_paths(&["greeting"]);
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), r#"{ "greeting": "Hello" }"#).unwrap();
    manager
        .load("en", [JsonLoader::from_file(file.path()).into_shared()])
        .unwrap();
    assert_eq!(text(&entries[0]), "Hello");

    fs::write(file.path(), "{ broken").unwrap();
    assert!(manager.reload().is_err());
    assert_eq!(text(&entries[0]), "Hello");
}
