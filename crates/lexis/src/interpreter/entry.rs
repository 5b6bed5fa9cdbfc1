//! Registered messages and their per-language translation caches.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, PoisonError, RwLock};

use bon::Builder;
use tracing::trace;

use crate::interpreter::error::{RegisterError, TranslateError};
use crate::interpreter::language::Language;
use crate::interpreter::manager::LanguageManager;
use crate::interpreter::resolver::Resolver;
use crate::interpreter::translation::{Rendered, Translation};
use crate::parser::PlaceholderStyle;
use crate::types::{Context, Shape};

/// How an entry is declared.
///
/// ```
/// use lexis::{EntryOptions, KeyKind, Resolver, Shape};
///
/// let options = EntryOptions::builder()
///     .shape(Shape::map(KeyKind::Integer))
///     .resolver(Resolver::constant("unit", "items"))
///     .build();
/// assert_eq!(options.shape(), &Shape::map(KeyKind::Integer));
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct EntryOptions {
    /// Shape the raw value must have. Defaults to a single text.
    #[builder(default)]
    shape: Shape,

    /// Placeholders owned by the entry. They take precedence over the
    /// caller's resolver.
    #[builder(default)]
    resolver: Resolver,

    /// Template syntax. Defaults to the manager's style.
    style: Option<PlaceholderStyle>,
}

impl EntryOptions {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

struct CachedTranslation {
    generation: u64,
    translation: Arc<Translation>,
}

/// The manager's record of an entry, including its cache.
pub(crate) struct EntrySlot {
    path: String,
    shape: Shape,
    style: PlaceholderStyle,
    resolver: Resolver,
    /// Language identifier to the translation built from that language.
    cache: RwLock<HashMap<String, CachedTranslation>>,
}

impl EntrySlot {
    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the cached translation for `language`, building it on a miss.
    ///
    /// A cached translation built from another generation of the language is
    /// a miss. Failures are not cached.
    fn translation(&self, language: &Language) -> Result<Arc<Translation>, TranslateError> {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(language.identifier())
            .filter(|cached| cached.generation == language.generation())
        {
            return Ok(Arc::clone(&cached.translation));
        }

        trace!(path = %self.path, language = %language.identifier(), "translation cache miss");
        let raw = language
            .value(&self.path)
            .ok_or_else(|| TranslateError::MissingTranslation {
                language: language.identifier().to_string(),
                path: self.path.clone(),
            })?;
        let translation = Translation::build(raw, &self.shape, &self.style, &self.resolver)
            .map_err(|error| TranslateError::InvalidType {
                language: language.identifier().to_string(),
                path: self.path.clone(),
                expected: error.expected,
                found: error.found,
            })?;

        let generation = language.generation();
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        match cache.get(language.identifier()) {
            Some(cached) if cached.generation == generation => {
                return Ok(Arc::clone(&cached.translation));
            }
            // Built from an older language snapshot than the cached one.
            Some(cached) if cached.generation > generation => return Ok(Arc::new(translation)),
            Some(_) | None => {}
        }
        let translation = Arc::new(translation);
        cache.insert(
            language.identifier().to_string(),
            CachedTranslation {
                generation,
                translation: Arc::clone(&translation),
            },
        );
        Ok(translation)
    }

    pub(crate) fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn cache_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A message registered with a [`LanguageManager`].
///
/// Looking an entry up resolves the language, then returns the translation
/// cached for that language, building it from the language's raw value the
/// first time. Caches are cleared when the manager reloads.
///
/// # Example
///
/// ```
/// use lexis::loader::{Loader, MapLoader};
/// use lexis::{Entry, EntryOptions, LanguageManager, Resolver, Shape};
///
/// let manager = LanguageManager::new("en");
/// let days = Entry::register(
///     &manager,
///     "calendar.days",
///     EntryOptions::builder().shape(Shape::array()).build(),
/// )
/// .unwrap();
///
/// manager
///     .load("en", [MapLoader::new([("calendar.days", ["Mon", "Tue"])]).into_shared()])
///     .unwrap();
///
/// let rendered = days.value(None, &Resolver::empty()).unwrap();
/// assert_eq!(rendered.to_string(), "[Mon, Tue]");
/// ```
#[derive(Clone)]
pub struct Entry {
    manager: Arc<LanguageManager>,
    slot: Arc<EntrySlot>,
}

impl Entry {
    /// Registers a text entry.
    pub fn new(
        manager: &Arc<LanguageManager>,
        path: impl Into<String>,
    ) -> Result<Self, RegisterError> {
        Self::register(manager, path, EntryOptions::default())
    }

    /// Registers an entry with the given options.
    ///
    /// Fails if the path is malformed or already registered.
    pub fn register(
        manager: &Arc<LanguageManager>,
        path: impl Into<String>,
        options: EntryOptions,
    ) -> Result<Self, RegisterError> {
        let path = path.into();
        validate_path(&path)?;
        let slot = Arc::new(EntrySlot {
            path,
            shape: options.shape,
            style: options.style.unwrap_or_else(|| manager.style()),
            resolver: options.resolver,
            cache: RwLock::default(),
        });
        manager.register(Arc::clone(&slot))?;
        Ok(Self {
            manager: Arc::clone(manager),
            slot,
        })
    }

    pub fn path(&self) -> &str {
        &self.slot.path
    }

    pub fn shape(&self) -> &Shape {
        &self.slot.shape
    }

    pub fn style(&self) -> PlaceholderStyle {
        self.slot.style
    }

    pub fn manager(&self) -> &Arc<LanguageManager> {
        &self.manager
    }

    /// Returns the translation for the language `context` selects.
    pub fn get(&self, context: Option<&dyn Context>) -> Result<Arc<Translation>, TranslateError> {
        let language = self.manager.language(context)?;
        self.slot.translation(&language)
    }

    /// Looks up and evaluates this entry.
    pub fn value(
        &self,
        context: Option<&dyn Context>,
        resolver: &Resolver,
    ) -> Result<Rendered, TranslateError> {
        Ok(self.get(context)?.evaluate(context, resolver))
    }

    /// Looks up and evaluates this entry as text. Lists and maps are
    /// formatted with [`Rendered`]'s `Display`.
    pub fn text(
        &self,
        context: Option<&dyn Context>,
        resolver: &Resolver,
    ) -> Result<String, TranslateError> {
        self.value(context, resolver).map(|rendered| match rendered {
            Rendered::Text(text) => text,
            other @ (Rendered::List(_) | Rendered::Map(_)) => other.to_string(),
        })
    }

    /// Number of languages with a cached translation.
    pub fn cache_len(&self) -> usize {
        self.slot.cache_len()
    }
}

impl Debug for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Entry")
            .field("path", &self.slot.path)
            .field("shape", &self.slot.shape)
            .finish_non_exhaustive()
    }
}

fn validate_path(path: &str) -> Result<(), RegisterError> {
    let reason = if path.is_empty() {
        Some("path is empty")
    } else if path.starts_with('.') || path.ends_with('.') {
        Some("path must not start or end with '.'")
    } else if path.contains("..") {
        Some("path must not contain empty segments")
    } else if !path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        Some("path may only contain ASCII letters, digits, '_', '-' and '.'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(RegisterError::InvalidPath {
            path: path.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_dotted_paths() {
        assert!(validate_path("menu.main-title_2").is_ok());
        assert!(validate_path("a").is_ok());
    }

    #[test]
    fn test_rejects_malformed_paths() {
        for path in ["", ".a", "a.", "a..b", "a b", "grüße"] {
            assert!(validate_path(path).is_err(), "{path:?} should be rejected");
        }
    }
}
