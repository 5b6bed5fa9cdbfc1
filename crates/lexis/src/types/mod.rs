mod context;
mod map_key;
mod raw_value;
mod shape;

pub use context::{AsAny, Context, LanguageContext};
pub use map_key::{KeyKind, MapKey};
pub use raw_value::RawValue;
pub use shape::Shape;
