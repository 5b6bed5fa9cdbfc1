//! Template tokenizer.
//!
//! Turns a raw translation string into an immutable sequence of literal and
//! placeholder segments. Parsing never fails: text that does not form a
//! well-delimited placeholder is kept as literal text.

pub mod ast;
mod style;
mod template;

pub use ast::*;
pub use style::PlaceholderStyle;
pub use template::parse_template;
