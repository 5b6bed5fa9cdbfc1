//! Per-language raw value tables.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::interpreter::error::LoadError;
use crate::loader::{Loader, Values};
use crate::types::RawValue;

/// A language's raw values, produced by running its loaders over every
/// registered path.
///
/// A `Language` is never modified after it is built. Reloading builds a new
/// one from the same loaders, with a new generation number.
pub(crate) struct Language {
    identifier: String,
    generation: u64,
    loaders: Arc<[Arc<dyn Loader>]>,
    values: HashMap<String, RawValue>,
}

impl Language {
    pub(crate) fn load(
        identifier: String,
        generation: u64,
        loaders: Arc<[Arc<dyn Loader>]>,
        paths: &BTreeSet<String>,
    ) -> Result<Self, LoadError> {
        let mut values = Values::new(paths);
        for loader in loaders.iter() {
            loader
                .load(&mut values)
                .map_err(|source| LoadError::Loader {
                    language: identifier.clone(),
                    source,
                })?;
        }
        Ok(Self {
            identifier,
            generation,
            loaders,
            values: values.into_entries(),
        })
    }

    /// Builds a fresh copy of this language from the same loaders.
    pub(crate) fn reload(
        &self,
        generation: u64,
        paths: &BTreeSet<String>,
    ) -> Result<Self, LoadError> {
        Self::load(
            self.identifier.clone(),
            generation,
            Arc::clone(&self.loaders),
            paths,
        )
    }

    pub(crate) fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn value(&self, path: &str) -> Option<&RawValue> {
        self.values.get(path)
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}
