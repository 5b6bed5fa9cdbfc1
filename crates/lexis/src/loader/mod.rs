//! Loaders supply raw values for registered paths.
//!
//! A language runs its loaders in order against one [`Values`] table. Each
//! loader may answer any subset of the registered paths; a later answer
//! replaces an earlier one, and a path a loader leaves alone keeps whatever
//! earlier loaders put there.

mod json;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

pub use json::JsonLoader;

use crate::interpreter::LoaderError;
use crate::types::RawValue;

/// A source of raw values.
///
/// Loaders run on every load and reload, and must not depend on state kept
/// between runs. Closures taking `&mut Values` are loaders; see [`from_fn`].
pub trait Loader: Send + Sync {
    fn load(&self, values: &mut Values<'_>) -> Result<(), LoaderError>;

    /// Wraps this loader for [`LanguageManager::load`](crate::LanguageManager::load).
    fn into_shared(self) -> Arc<dyn Loader>
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

impl<F> Loader for F
where
    F: Fn(&mut Values<'_>) -> Result<(), LoaderError> + Send + Sync,
{
    fn load(&self, values: &mut Values<'_>) -> Result<(), LoaderError> {
        self(values)
    }
}

/// Pins a closure's argument types so it can be used as a [`Loader`].
///
/// ```
/// use lexis::loader::{self, Loader};
///
/// let english = loader::from_fn(|values| {
///     values.put("greeting", "Hello")?;
///     Ok(())
/// });
/// # let _ = english.into_shared();
/// ```
pub fn from_fn<F>(load: F) -> F
where
    F: Fn(&mut Values<'_>) -> Result<(), LoaderError> + Send + Sync,
{
    load
}

/// The raw value table being built for one language.
#[derive(Debug)]
pub struct Values<'a> {
    paths: &'a BTreeSet<String>,
    entries: HashMap<String, RawValue>,
}

impl<'a> Values<'a> {
    pub(crate) fn new(paths: &'a BTreeSet<String>) -> Self {
        Self {
            paths,
            entries: HashMap::new(),
        }
    }

    /// Every registered path, sorted.
    pub fn paths(&self) -> &'a BTreeSet<String> {
        self.paths
    }

    /// The value supplied so far for `path`.
    pub fn get(&self, path: &str) -> Option<&RawValue> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Supplies a value, returning the one it replaces.
    ///
    /// Fails with [`LoaderError::UnknownPath`] if `path` is not registered.
    pub fn put(
        &mut self,
        path: &str,
        value: impl Into<RawValue>,
    ) -> Result<Option<RawValue>, LoaderError> {
        if !self.paths.contains(path) {
            return Err(LoaderError::UnknownPath {
                path: path.to_string(),
            });
        }
        Ok(self.entries.insert(path.to_string(), value.into()))
    }

    /// Supplies a value only if no earlier loader did. Returns true if the
    /// value was stored.
    pub fn put_if_absent(
        &mut self,
        path: &str,
        value: impl Into<RawValue>,
    ) -> Result<bool, LoaderError> {
        if self.contains(path) {
            return Ok(false);
        }
        self.put(path, value).map(|_| true)
    }

    /// Replaces a value only if an earlier loader supplied one. Returns true
    /// if the value was stored.
    pub fn put_if_present(
        &mut self,
        path: &str,
        value: impl Into<RawValue>,
    ) -> Result<bool, LoaderError> {
        if !self.contains(path) {
            return Ok(false);
        }
        self.put(path, value).map(|_| true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> HashMap<String, RawValue> {
        self.entries
    }
}

/// A loader backed by an in-memory table.
///
/// Values for paths that are not registered are ignored.
///
/// ```
/// use lexis::loader::MapLoader;
///
/// let german = MapLoader::new([("greeting", "Hallo"), ("farewell", "Tschüss")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapLoader {
    values: BTreeMap<String, RawValue>,
}

impl MapLoader {
    pub fn new<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<RawValue>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(path, value)| (path.into(), value.into()))
                .collect(),
        }
    }

    pub fn insert(mut self, path: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.values.insert(path.into(), value.into());
        self
    }
}

impl Loader for MapLoader {
    fn load(&self, values: &mut Values<'_>) -> Result<(), LoaderError> {
        for path in values.paths() {
            if let Some(value) = self.values.get(path) {
                values.put(path, value.clone())?;
            }
        }
        Ok(())
    }
}
