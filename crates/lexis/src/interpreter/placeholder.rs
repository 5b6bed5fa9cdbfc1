//! Named value producers.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::types::Context;

/// Placeholder value function signature.
///
/// Takes the optional call context and the placeholder's raw arguments.
pub type ValueFn = dyn Fn(Option<&dyn Context>, &[String]) -> String + Send + Sync;

/// Maps a context to the one handed to namespaced placeholders.
///
/// Returning `None` passes the original context through unchanged.
pub type ContextTransform =
    dyn Fn(&dyn Context, &[String]) -> Option<Box<dyn Context>> + Send + Sync;

/// Text produced by a typed placeholder when the context is absent or of another type.
pub const INVALID_CONTEXT: &str = "INVALID_CONTEXT";

/// Text produced by a comparison placeholder given fewer than two arguments.
pub const INVALID_COMPARISON: &str = "INVALID_COMPARISON";

/// A named value producer referenced from templates.
///
/// Output is inserted into the evaluated text literally, unless the
/// placeholder was reached through a resolver marked with
/// [`Resolver::into_unsafe`](crate::Resolver::into_unsafe).
///
/// # Example
///
/// ```
/// use lexis::Placeholder;
///
/// let name = Placeholder::constant("name", "World");
/// assert_eq!(name.value(None, &[]), "World");
///
/// let pick = Placeholder::with_args("second", |args| args.get(1).cloned().unwrap_or_default());
/// assert_eq!(pick.value(None, &["a".into(), "b".into()]), "b");
/// ```
#[derive(Clone)]
pub struct Placeholder {
    key: String,
    value: Arc<ValueFn>,
    reparse: bool,
}

impl Placeholder {
    /// A placeholder that sees both the context and the arguments.
    pub fn new(
        key: impl Into<String>,
        value: impl Fn(Option<&dyn Context>, &[String]) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            value: Arc::new(value),
            reparse: false,
        }
    }

    /// A placeholder that only looks at its arguments.
    pub fn with_args(
        key: impl Into<String>,
        value: impl Fn(&[String]) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::new(key, move |_, arguments| value(arguments))
    }

    /// A placeholder that only looks at the context.
    pub fn with_context(
        key: impl Into<String>,
        value: impl Fn(Option<&dyn Context>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::new(key, move |context, _| value(context))
    }

    /// A placeholder computed without context or arguments.
    pub fn variable(
        key: impl Into<String>,
        value: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self::new(key, move |_, _| value())
    }

    /// A placeholder that always produces `value`.
    pub fn constant(key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(key, move |_, _| value.clone())
    }

    /// A placeholder that only activates for contexts of type `T`.
    ///
    /// When the context is absent or of another type, `fallback` is used.
    pub fn contextual<T: Context>(
        key: impl Into<String>,
        value: impl Fn(&T, &[String]) -> String + Send + Sync + 'static,
        fallback: impl Into<Fallback>,
    ) -> Self {
        let fallback = fallback.into();
        Self::new(key, move |context, arguments| {
            match context.and_then(|c| c.downcast_ref::<T>()) {
                Some(typed) => value(typed, arguments),
                None => fallback.value(context, arguments),
            }
        })
    }

    /// Selects argument 0 when `predicate` holds for the typed context and
    /// argument 1 otherwise. Uses `fallback` for other contexts.
    pub fn conditional<T: Context>(
        key: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
        fallback: impl Into<Fallback>,
    ) -> Self {
        Self::contextual(
            key,
            move |context: &T, arguments: &[String]| select(predicate(context), arguments, 0),
            fallback,
        )
    }

    /// Selects argument 0 when `condition` returns true and argument 1 otherwise.
    pub fn condition(
        key: impl Into<String>,
        condition: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::with_args(key, move |arguments| select(condition(), arguments, 0))
    }

    /// Compares arguments 0 and 1, then selects argument 2 when the comparison
    /// holds and argument 3 otherwise.
    pub fn comparison(
        key: impl Into<String>,
        compare: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::with_args(key, move |arguments| match arguments {
            [left, right, ..] => select(compare(left.as_str(), right.as_str()), arguments, 2),
            _ => INVALID_COMPARISON.to_string(),
        })
    }

    /// The name this placeholder answers to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Produces this placeholder's text.
    pub fn value(&self, context: Option<&dyn Context>, arguments: &[String]) -> String {
        (self.value)(context, arguments)
    }

    /// Returns true if this placeholder's output is re-parsed before insertion.
    pub fn is_unsafe(&self) -> bool {
        self.reparse
    }

    pub(crate) fn into_unsafe(self) -> Self {
        Self {
            reparse: true,
            ..self
        }
    }

    /// Renames this placeholder and feeds it contexts mapped by `transform`.
    pub(crate) fn namespaced(self, key: String, transform: Arc<ContextTransform>) -> Self {
        let inner = self.value;
        Self {
            key,
            value: Arc::new(move |context: Option<&dyn Context>, arguments: &[String]| {
                let mapped = context.and_then(|c| transform(c, arguments));
                match mapped {
                    Some(mapped) => inner(Some(mapped.as_ref()), arguments),
                    None => inner(context, arguments),
                }
            }),
            reparse: self.reparse,
        }
    }
}

impl Debug for Placeholder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Placeholder")
            .field("key", &self.key)
            .field("unsafe", &self.reparse)
            .finish_non_exhaustive()
    }
}

/// Picks `arguments[offset]` when `condition` holds, else `arguments[offset + 1]`.
/// A missing argument selects the empty string.
fn select(condition: bool, arguments: &[String], offset: usize) -> String {
    let index = if condition { offset } else { offset + 1 };
    arguments.get(index).cloned().unwrap_or_default()
}

/// The value used by a typed placeholder for a non-matching context.
#[derive(Clone)]
pub enum Fallback {
    Text(String),
    Function(Arc<ValueFn>),
}

impl Fallback {
    pub fn function(
        value: impl Fn(Option<&dyn Context>, &[String]) -> String + Send + Sync + 'static,
    ) -> Self {
        Fallback::Function(Arc::new(value))
    }

    fn value(&self, context: Option<&dyn Context>, arguments: &[String]) -> String {
        match self {
            Fallback::Text(text) => text.clone(),
            Fallback::Function(f) => f(context, arguments),
        }
    }
}

impl Default for Fallback {
    fn default() -> Self {
        Fallback::Text(INVALID_CONTEXT.to_string())
    }
}

impl Debug for Fallback {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Fallback::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Fallback::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<&str> for Fallback {
    fn from(text: &str) -> Self {
        Fallback::Text(text.to_string())
    }
}

impl From<String> for Fallback {
    fn from(text: String) -> Self {
        Fallback::Text(text)
    }
}
