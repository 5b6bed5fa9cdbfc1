//! The language manager: loaded languages, registered entries and reloads.

use std::collections::btree_map::Entry as BTreeEntry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bon::Builder;
use tracing::{debug, warn};

use crate::interpreter::coercion::check_shape;
use crate::interpreter::entry::EntrySlot;
use crate::interpreter::error::{
    LoadError, RegisterError, TranslateError, ValidationIssue, compute_suggestions,
};
use crate::interpreter::language::Language;
use crate::loader::Loader;
use crate::parser::PlaceholderStyle;
use crate::types::Context;

/// Owns every loaded language and every registered entry.
///
/// Languages are selected per call: a context that names a language wins,
/// otherwise the default language is used. The default language only has to
/// exist by the time something is looked up in it.
///
/// `load` and `reload` are serialized with each other. Lookups may run at
/// any time and always see either the state before a reload or the state
/// after it, never a mix.
///
/// # Example
///
/// ```
/// use lexis::loader::{Loader, MapLoader};
/// use lexis::{Entry, LanguageContext, LanguageManager, Resolver};
///
/// let manager = LanguageManager::new("en");
/// let greeting = Entry::new(&manager, "greeting").unwrap();
///
/// manager.load("en", [MapLoader::new([("greeting", "Hello <name>")]).into_shared()]).unwrap();
/// manager.load("de", [MapLoader::new([("greeting", "Hallo <name>")]).into_shared()]).unwrap();
///
/// let name = Resolver::constant("name", "Alex");
/// assert_eq!(greeting.text(None, &name).unwrap(), "Hello Alex");
///
/// let german = LanguageContext::new("de");
/// assert_eq!(greeting.text(Some(&german), &name).unwrap(), "Hallo Alex");
/// ```
#[derive(Builder)]
#[builder(on(String, into))]
pub struct LanguageManager {
    /// Identifier of the language used when the context names none.
    default_language: String,

    /// Template syntax for entries that do not choose their own.
    #[builder(default)]
    style: PlaceholderStyle,

    #[builder(skip)]
    languages: RwLock<HashMap<String, Arc<Language>>>,

    #[builder(skip)]
    entries: RwLock<BTreeMap<String, Arc<EntrySlot>>>,

    /// Source of language generation numbers. Every built language gets a
    /// fresh one, so cached translations can tell which build they belong to.
    #[builder(skip)]
    generation: AtomicU64,

    /// Held for the whole of `load`, `reload` and entry registration.
    #[builder(skip)]
    writer: Mutex<()>,
}

impl LanguageManager {
    /// A shared manager with the given default language and the angle
    /// bracket style.
    pub fn new(default_language: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::builder().default_language(default_language).build())
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Registers a language by running `loaders` in order over every
    /// registered path.
    ///
    /// Entries registered later have no value in this language until the
    /// next [`reload`](Self::reload).
    pub fn load(
        &self,
        identifier: impl Into<String>,
        loaders: impl IntoIterator<Item = Arc<dyn Loader>>,
    ) -> Result<(), LoadError> {
        let identifier = identifier.into();
        let _writer = self.lock_writer();

        if identifier.is_empty() {
            return Err(RegisterError::EmptyIdentifier.into());
        }
        if self.read_languages().contains_key(&identifier) {
            return Err(RegisterError::DuplicateLanguage {
                language: identifier,
            }
            .into());
        }

        let paths = self.path_set();
        let language = Language::load(
            identifier.clone(),
            self.next_generation(),
            loaders.into_iter().collect(),
            &paths,
        )?;
        debug!(
            language = %identifier,
            values = language.len(),
            paths = paths.len(),
            "loaded language"
        );
        self.write_languages().insert(identifier, Arc::new(language));
        Ok(())
    }

    /// Runs every language's loaders again.
    ///
    /// Languages are rebuilt in identifier order, all of them before any is
    /// replaced. If one fails, the error is returned and every language and
    /// cached translation stays as it was. On success all entry caches are
    /// cleared.
    pub fn reload(&self) -> Result<(), LoadError> {
        let _writer = self.lock_writer();

        let mut current: Vec<Arc<Language>> = self.read_languages().values().cloned().collect();
        current.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        let paths = self.path_set();
        let mut rebuilt = HashMap::with_capacity(current.len());
        for language in &current {
            let fresh = language
                .reload(self.next_generation(), &paths)
                .inspect_err(|error| {
                    warn!(
                        language = %language.identifier(),
                        %error,
                        "reload failed, keeping previous languages"
                    );
                })?;
            debug!(
                language = %fresh.identifier(),
                values = fresh.len(),
                "reloaded language"
            );
            rebuilt.insert(fresh.identifier().to_string(), Arc::new(fresh));
        }

        *self.write_languages() = rebuilt;

        let entries = self.read_entries();
        for slot in entries.values() {
            slot.clear();
        }
        debug!(entries = entries.len(), "cleared translation caches");
        Ok(())
    }

    // =========================================================================
    // Language Selection
    // =========================================================================

    /// Returns the identifier of the language a lookup with `context` uses.
    pub fn resolve_language(
        &self,
        context: Option<&dyn Context>,
    ) -> Result<String, TranslateError> {
        self.language(context).map(|language| language.identifier().to_string())
    }

    pub(crate) fn language(
        &self,
        context: Option<&dyn Context>,
    ) -> Result<Arc<Language>, TranslateError> {
        let identifier = context
            .and_then(|context| context.language())
            .unwrap_or(self.default_language.as_str());
        let languages = self.read_languages();
        match languages.get(identifier) {
            Some(language) => Ok(Arc::clone(language)),
            None => {
                let mut available: Vec<String> = languages.keys().cloned().collect();
                available.sort();
                Err(TranslateError::UnknownLanguage {
                    language: identifier.to_string(),
                    suggestions: compute_suggestions(identifier, &available),
                })
            }
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    /// Identifiers of every loaded language, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.read_languages().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    /// Every registered path, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.read_entries().keys().cloned().collect()
    }

    /// Checks every registered entry against every loaded language.
    ///
    /// Reports missing values and values of the wrong shape, ordered by
    /// language and then by path. Caches are not touched.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut languages: Vec<Arc<Language>> = self.read_languages().values().cloned().collect();
        languages.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        let entries = self.read_entries();

        let mut issues = Vec::new();
        for language in &languages {
            for slot in entries.values() {
                let Some(raw) = language.value(slot.path()) else {
                    issues.push(ValidationIssue::Missing {
                        language: language.identifier().to_string(),
                        path: slot.path().to_string(),
                    });
                    continue;
                };
                if let Err(error) = check_shape(raw, slot.shape()) {
                    issues.push(ValidationIssue::InvalidType {
                        language: language.identifier().to_string(),
                        path: slot.path().to_string(),
                        expected: error.expected,
                        found: error.found,
                    });
                }
            }
        }
        issues
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn register(&self, slot: Arc<EntrySlot>) -> Result<(), RegisterError> {
        let _writer = self.lock_writer();
        match self.write_entries().entry(slot.path().to_string()) {
            BTreeEntry::Occupied(occupied) => Err(RegisterError::DuplicatePath {
                path: occupied.key().clone(),
            }),
            BTreeEntry::Vacant(vacant) => {
                vacant.insert(slot);
                Ok(())
            }
        }
    }

    fn path_set(&self) -> BTreeSet<String> {
        self.read_entries().keys().cloned().collect()
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_languages(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Language>>> {
        self.languages.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_languages(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Language>>> {
        self.languages.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<EntrySlot>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<EntrySlot>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
