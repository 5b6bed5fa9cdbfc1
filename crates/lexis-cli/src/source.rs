//! Reading JSON language files and turning them into a language manager.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexis::{Entry, EntryOptions, JsonLoader, LanguageManager, Loader, Shape};
use miette::{IntoDiagnostic, Result, miette};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::output::JsonDiagnostic;

/// A parsed JSON language file. The language identifier is the file stem.
pub struct LanguageFile {
    pub language: String,
    pub path: PathBuf,
    pub content: String,
    pub document: JsonValue,
}

/// Read and parse a language file, reporting syntax errors with source context.
pub fn read_language_file(path: &Path) -> Result<LanguageFile> {
    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Failed to read language file {}: {}", path.display(), e))?;

    let document = serde_json::from_str(&content)
        .map_err(|e| JsonDiagnostic::from_json_error(path, &content, &e))?;

    let language = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| miette!("Cannot derive a language name from {}", path.display()))?;

    Ok(LanguageFile {
        language,
        path: path.to_path_buf(),
        content,
        document,
    })
}

/// Every message path declared by a source document, with the shape its
/// value has there.
///
/// Nested objects group paths (`{"menu": {"title": ..}}` declares
/// `menu.title`). Arrays of arrays are two-dimensional arrays, other arrays
/// are arrays of text, and every other value is text.
pub fn declared_entries(document: &JsonValue) -> Vec<(String, Shape)> {
    let mut entries = Vec::new();
    if let JsonValue::Object(fields) = document {
        for (key, value) in fields {
            collect(key.clone(), value, &mut entries);
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

fn collect(path: String, value: &JsonValue, entries: &mut Vec<(String, Shape)>) {
    match value {
        JsonValue::Object(fields) => {
            for (key, nested) in fields {
                collect(format!("{path}.{key}"), nested, entries);
            }
        }
        JsonValue::Array(items) if !items.is_empty() && items.iter().all(JsonValue::is_array) => {
            entries.push((path, Shape::array_2d()));
        }
        JsonValue::Array(_) => entries.push((path, Shape::array())),
        JsonValue::Null
        | JsonValue::Bool(_)
        | JsonValue::Number(_)
        | JsonValue::String(_) => entries.push((path, Shape::Text)),
    }
}

/// Register `entries` and load every file as a language.
///
/// The first file's language is the default. Paths the library rejects are
/// skipped with a warning.
pub fn build_manager(
    files: &[LanguageFile],
    entries: &[(String, Shape)],
) -> Result<Arc<LanguageManager>> {
    let default_language = files
        .first()
        .map(|file| file.language.clone())
        .ok_or_else(|| miette!("No language files given"))?;
    let manager = LanguageManager::new(default_language);

    for (path, shape) in entries {
        let options = EntryOptions::builder().shape(shape.clone()).build();
        if let Err(error) = Entry::register(&manager, path.as_str(), options) {
            warn!(%path, %error, "skipping path");
        }
    }

    for file in files {
        manager
            .load(
                file.language.as_str(),
                [JsonLoader::from_text(file.content.as_str()).into_shared()],
            )
            .map_err(|e| miette!("Failed to load {}: {}", file.path.display(), e))?;
    }

    Ok(manager)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_declared_entries_walk_objects() {
        let document = json!({
            "menu": { "title": "Main", "items": ["a", "b"] },
            "grid": [["a"], ["b"]],
            "count": 3
        });
        assert_eq!(
            declared_entries(&document),
            vec![
                ("count".to_string(), Shape::Text),
                ("grid".to_string(), Shape::array_2d()),
                ("menu.items".to_string(), Shape::array()),
                ("menu.title".to_string(), Shape::Text),
            ]
        );
    }

    #[test]
    fn test_non_object_document_declares_nothing() {
        assert!(declared_entries(&json!(["a"])).is_empty());
    }
}
