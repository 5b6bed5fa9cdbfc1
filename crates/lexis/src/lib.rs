pub mod interpreter;
pub mod loader;
pub mod parser;
pub mod types;

pub use interpreter::{
    CoercionError, Entry, EntryOptions, Fallback, LanguageManager, LoadError, LoaderError,
    Placeholder, PlaceholderResolver, RegisterError, Rendered, Resolver, ResolverBuilder,
    TextTranslation, TranslateError, Translation, ValidationIssue, compute_suggestions,
};
pub use loader::{JsonLoader, Loader, MapLoader, Values};
pub use parser::{PlaceholderStyle, Segment, Template, parse_template};
pub use types::{AsAny, Context, KeyKind, LanguageContext, MapKey, RawValue, Shape};

/// Creates a [`Resolver`] of constant placeholders from key-value pairs.
///
/// Values are converted with `ToString`, so strings, numbers and anything
/// else that implements `Display` can be passed directly.
///
/// # Example
///
/// ```
/// use lexis::placeholders;
///
/// let resolver = placeholders! { "name" => "Alice", "count" => 3 };
/// assert_eq!(resolver.resolve("count").map(|p| p.value(None, &[])), Some("3".into()));
/// assert!(resolver.resolve("missing").is_none());
/// ```
#[macro_export]
macro_rules! placeholders {
    {} => {
        $crate::Resolver::empty()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        $crate::Resolver::of([
            $(
                $crate::Placeholder::constant($key, ::std::string::ToString::to_string(&$value)),
            )+
        ])
    };
}
