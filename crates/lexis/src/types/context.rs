//! Caller-supplied evaluation context.

use std::any::Any;

/// Optional per-call value passed to `Entry::get` and to placeholders.
///
/// A context may override the language used for a lookup, and placeholders
/// built with [`Placeholder::contextual`](crate::Placeholder::contextual)
/// activate only when the context is of the type they declare.
///
/// # Example
///
/// ```
/// use lexis::Context;
///
/// struct Player {
///     name: String,
///     locale: Option<String>,
/// }
///
/// impl Context for Player {
///     fn language(&self) -> Option<&str> {
///         self.locale.as_deref()
///     }
/// }
///
/// let player = Player { name: "Alex".into(), locale: Some("de".into()) };
/// let context: &dyn Context = &player;
/// assert_eq!(context.language(), Some("de"));
/// assert_eq!(context.downcast_ref::<Player>().map(|p| p.name.as_str()), Some("Alex"));
/// ```
pub trait Context: AsAny + Send + Sync + 'static {
    /// Identifier of the language this context prefers, if any.
    fn language(&self) -> Option<&str> {
        None
    }
}

impl<'a> dyn Context + 'a {
    /// Narrows this context to a concrete type.
    pub fn downcast_ref<T: Context>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns true if this context is of type `T`.
    pub fn is<T: Context>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

/// Access to a context as [`Any`], implemented for every `'static` type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A context that only carries a language override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageContext {
    language: String,
}

impl LanguageContext {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl Context for LanguageContext {
    fn language(&self) -> Option<&str> {
        Some(&self.language)
    }
}
