//! Composable lookup from placeholder names to placeholders.

use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::iter;
use std::sync::Arc;

use crate::interpreter::builtin;
use crate::interpreter::placeholder::{ContextTransform, Fallback, Placeholder};
use crate::types::Context;

/// Maps a placeholder name to a placeholder.
///
/// Resolution depends on the name only. The evaluation context reaches the
/// placeholder when its value is produced.
pub trait PlaceholderResolver: Send + Sync {
    fn resolve(&self, key: &str) -> Option<Placeholder>;
}

impl<F> PlaceholderResolver for F
where
    F: Fn(&str) -> Option<Placeholder> + Send + Sync,
{
    fn resolve(&self, key: &str) -> Option<Placeholder> {
        self(key)
    }
}

impl PlaceholderResolver for Placeholder {
    fn resolve(&self, key: &str) -> Option<Placeholder> {
        (self.key() == key).then(|| self.clone())
    }
}

/// Placeholders indexed by key.
struct Table(HashMap<String, Placeholder>);

impl PlaceholderResolver for Table {
    fn resolve(&self, key: &str) -> Option<Placeholder> {
        self.0.get(key).cloned()
    }
}

/// A shared, cheaply cloned placeholder resolver.
///
/// Resolvers compose: [`chain`](Resolver::chain) tries several in order and
/// returns the first match, [`namespace`](Resolver::namespace) claims keys
/// with a prefix and delegates the rest of the key, and
/// [`into_unsafe`](Resolver::into_unsafe) marks every placeholder it yields
/// for one extra template pass over its output.
///
/// # Example
///
/// ```
/// use lexis::{Placeholder, Resolver};
///
/// let first = Resolver::of([Placeholder::constant("x", "first")]);
/// let second = Resolver::of([
///     Placeholder::constant("x", "second"),
///     Placeholder::constant("y", "second"),
/// ]);
/// let chain = Resolver::chain([first, second]);
///
/// assert_eq!(chain.resolve("x").map(|p| p.value(None, &[])), Some("first".into()));
/// assert_eq!(chain.resolve("y").map(|p| p.value(None, &[])), Some("second".into()));
/// assert!(chain.resolve("z").is_none());
/// ```
#[derive(Clone)]
pub struct Resolver(Arc<dyn PlaceholderResolver>);

impl Resolver {
    /// A resolver that claims no keys.
    pub fn empty() -> Self {
        Self::from_fn(|_| None)
    }

    pub fn new(resolver: impl PlaceholderResolver + 'static) -> Self {
        Self(Arc::new(resolver))
    }

    pub fn from_fn(resolve: impl Fn(&str) -> Option<Placeholder> + Send + Sync + 'static) -> Self {
        Self::new(resolve)
    }

    /// A resolver for a single constant value.
    pub fn constant(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Placeholder::constant(key, value))
    }

    /// A resolver over a fixed set of placeholders. When two share a key, the
    /// first one wins.
    pub fn of(placeholders: impl IntoIterator<Item = Placeholder>) -> Self {
        let mut table = HashMap::new();
        for placeholder in placeholders {
            if let MapEntry::Vacant(slot) = table.entry(placeholder.key().to_string()) {
                slot.insert(placeholder);
            }
        }
        Self::new(Table(table))
    }

    /// Tries each resolver in order and returns the first match.
    pub fn chain(resolvers: impl IntoIterator<Item = Resolver>) -> Self {
        let resolvers: Vec<Resolver> = resolvers.into_iter().collect();
        Self::from_fn(move |key| resolvers.iter().find_map(|resolver| resolver.resolve(key)))
    }

    /// Tries `self` first, then `other`.
    pub fn then(self, other: Resolver) -> Self {
        Self::chain([self, other])
    }

    /// Claims keys starting with `prefix` and resolves the remainder against
    /// `inner`.
    ///
    /// Placeholders found this way keep the full key and receive the context
    /// produced by `transform`. When `transform` returns `None` the original
    /// context is passed through.
    pub fn namespace(
        prefix: impl Into<String>,
        transform: impl Fn(&dyn Context, &[String]) -> Option<Box<dyn Context>>
        + Send
        + Sync
        + 'static,
        inner: Resolver,
    ) -> Self {
        let prefix = prefix.into();
        let transform: Arc<ContextTransform> = Arc::new(transform);
        Self::from_fn(move |key| {
            let rest = key.strip_prefix(prefix.as_str())?;
            inner
                .resolve(rest)
                .map(|placeholder| placeholder.namespaced(key.to_string(), Arc::clone(&transform)))
        })
    }

    /// A namespace whose transform narrows the context to `T` and maps it to
    /// another context type.
    ///
    /// Contexts of other types are passed through unchanged.
    pub fn namespace_for<T: Context, C: Context>(
        prefix: impl Into<String>,
        map: impl Fn(&T) -> C + Send + Sync + 'static,
        inner: Resolver,
    ) -> Self {
        Self::namespace(
            prefix,
            move |context, _| {
                context
                    .downcast_ref::<T>()
                    .map(|typed| Box::new(map(typed)) as Box<dyn Context>)
            },
            inner,
        )
    }

    /// Marks every placeholder this resolver yields as unsafe: its output is
    /// parsed and evaluated once more before insertion.
    pub fn into_unsafe(self) -> Self {
        Self::from_fn(move |key| self.resolve(key).map(Placeholder::into_unsafe))
    }

    /// The built-in comparison placeholders (`if_eq`, `if_num_lt`, ...).
    pub fn builtin() -> Self {
        builtin::resolver()
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    pub fn resolve(&self, key: &str) -> Option<Placeholder> {
        self.0.resolve(key)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::empty()
    }
}

impl Debug for Resolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Resolver(..)")
    }
}

impl From<Placeholder> for Resolver {
    fn from(placeholder: Placeholder) -> Self {
        Self::new(placeholder)
    }
}

/// Collects placeholders by key into a [`Resolver`].
///
/// Later additions replace earlier ones with the same key.
///
/// ```
/// use lexis::Resolver;
///
/// let resolver = Resolver::builder()
///     .constant("name", "World")
///     .with_args("first", |args| args.first().cloned().unwrap_or_default())
///     .build();
///
/// assert!(resolver.resolve("name").is_some());
/// assert!(resolver.resolve("first").is_some());
/// ```
#[derive(Default)]
pub struct ResolverBuilder {
    placeholders: HashMap<String, Placeholder>,
    nested: Vec<Resolver>,
}

impl ResolverBuilder {
    pub fn add(mut self, placeholder: Placeholder) -> Self {
        self.placeholders.insert(placeholder.key().to_string(), placeholder);
        self
    }

    pub fn constant(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(Placeholder::constant(key, value))
    }

    pub fn variable(
        self,
        key: impl Into<String>,
        value: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.add(Placeholder::variable(key, value))
    }

    pub fn with_args(
        self,
        key: impl Into<String>,
        value: impl Fn(&[String]) -> String + Send + Sync + 'static,
    ) -> Self {
        self.add(Placeholder::with_args(key, value))
    }

    pub fn with_context(
        self,
        key: impl Into<String>,
        value: impl Fn(Option<&dyn Context>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.add(Placeholder::with_context(key, value))
    }

    pub fn contextual<T: Context>(
        self,
        key: impl Into<String>,
        value: impl Fn(&T, &[String]) -> String + Send + Sync + 'static,
        fallback: impl Into<Fallback>,
    ) -> Self {
        self.add(Placeholder::contextual(key, value, fallback))
    }

    pub fn conditional<T: Context>(
        self,
        key: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
        fallback: impl Into<Fallback>,
    ) -> Self {
        self.add(Placeholder::conditional(key, predicate, fallback))
    }

    pub fn condition(
        self,
        key: impl Into<String>,
        condition: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        self.add(Placeholder::condition(key, condition))
    }

    /// Adds the built-in comparison placeholders.
    pub fn builtin(self) -> Self {
        builtin::placeholders()
            .into_iter()
            .fold(self, ResolverBuilder::add)
    }

    /// Adds a namespace whose placeholders are collected by `build`.
    ///
    /// Namespaced keys are tried after the keys added directly.
    pub fn namespace(
        mut self,
        prefix: impl Into<String>,
        transform: impl Fn(&dyn Context, &[String]) -> Option<Box<dyn Context>>
        + Send
        + Sync
        + 'static,
        build: impl FnOnce(ResolverBuilder) -> ResolverBuilder,
    ) -> Self {
        let inner = build(ResolverBuilder::default()).build();
        self.nested.push(Resolver::namespace(prefix, transform, inner));
        self
    }

    pub fn build(self) -> Resolver {
        let direct = Resolver::new(Table(self.placeholders));
        if self.nested.is_empty() {
            direct
        } else {
            Resolver::chain(iter::once(direct).chain(self.nested))
        }
    }
}
