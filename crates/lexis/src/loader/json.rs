use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use crate::interpreter::LoaderError;
use crate::loader::{Loader, Values};
use crate::types::RawValue;

/// Reads values from a JSON document.
///
/// Each registered path is looked up by walking its dot-separated segments
/// through nested objects, so `menu.title` finds `{"menu": {"title": ..}}`.
/// A top-level key spelled with dots is used when the walk finds nothing.
/// A `null` at the path counts as no value. A `null` inside an array or
/// object is kept and fails the entry's shape check.
#[derive(Debug, Clone)]
pub struct JsonLoader {
    source: JsonSource,
}

#[derive(Debug, Clone)]
enum JsonSource {
    File(PathBuf),
    Text(String),
}

impl JsonLoader {
    /// Reads `path` again on every load.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: JsonSource::File(path.into()),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: JsonSource::Text(text.into()),
        }
    }

    fn document(&self) -> Result<JsonValue, LoaderError> {
        match &self.source {
            JsonSource::File(path) => {
                let text = read(path)?;
                Ok(serde_json::from_str(&text)?)
            }
            JsonSource::Text(text) => Ok(serde_json::from_str(text)?),
        }
    }
}

fn read(path: &Path) -> Result<String, LoaderError> {
    fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Finds the node for a dotted path.
pub(crate) fn lookup<'a>(document: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.')
        .try_fold(document, |node, segment| node.get(segment))
        .or_else(|| document.get(path))
}

impl Loader for JsonLoader {
    fn load(&self, values: &mut Values<'_>) -> Result<(), LoaderError> {
        let document = self.document()?;
        for path in values.paths() {
            if let Some(value) = lookup(&document, path).and_then(RawValue::from_json) {
                values.put(path, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_walks_nested_objects() {
        let document = json!({ "menu": { "title": "Main", "items": ["a", "b"] } });
        assert_eq!(lookup(&document, "menu.title"), Some(&json!("Main")));
        assert_eq!(lookup(&document, "menu.items"), Some(&json!(["a", "b"])));
        assert_eq!(lookup(&document, "menu.missing"), None);
    }

    #[test]
    fn test_falls_back_to_dotted_top_level_key() {
        let document = json!({ "menu.title": "Flat" });
        assert_eq!(lookup(&document, "menu.title"), Some(&json!("Flat")));
    }
}
