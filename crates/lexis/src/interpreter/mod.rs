//! Language management, placeholder resolution and template evaluation.
//!
//! A [`LanguageManager`] owns languages built by loaders and the entries
//! registered against it. An [`Entry`] turns its raw value in the selected
//! language into a cached [`Translation`], which evaluates against a
//! [`Resolver`] and an optional context.

mod builtin;
pub mod coercion;
mod entry;
mod error;
mod evaluator;
mod language;
mod manager;
mod placeholder;
mod resolver;
mod translation;

pub use entry::{Entry, EntryOptions};
pub use error::{
    CoercionError, LoadError, LoaderError, RegisterError, TranslateError, ValidationIssue,
    compute_suggestions,
};
pub use manager::LanguageManager;
pub use placeholder::{
    ContextTransform, Fallback, INVALID_COMPARISON, INVALID_CONTEXT, Placeholder, ValueFn,
};
pub use resolver::{PlaceholderResolver, Resolver, ResolverBuilder};
pub use translation::{Rendered, TextTranslation, Translation};
