use serde::{Deserialize, Serialize};

/// The characters that make up template syntax.
///
/// All presets share one tokenizer; only these four characters differ.
///
/// # Example
///
/// ```
/// use lexis::parser::PlaceholderStyle;
///
/// let style = PlaceholderStyle::new('[', ']', '|');
/// assert_eq!(style.escape, '\\');
/// assert_eq!(PlaceholderStyle::default(), PlaceholderStyle::ANGLE_BRACKETS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderStyle {
    /// Opens a placeholder.
    pub head: char,
    /// Closes a placeholder.
    pub tail: char,
    /// Separates the placeholder name from its arguments.
    pub separator: char,
    /// Makes the following syntax character literal.
    pub escape: char,
}

impl PlaceholderStyle {
    /// `<name:arg>`
    pub const ANGLE_BRACKETS: Self = Self::new('<', '>', ':');

    /// `{name:arg}`
    pub const CURLY_BRACKETS: Self = Self::new('{', '}', ':');

    /// `(name:arg)`
    pub const PARENTHESES: Self = Self::new('(', ')', ':');

    /// `%name:arg%`
    pub const PERCENT: Self = Self::new('%', '%', ':');

    pub const DEFAULT_ESCAPE: char = '\\';

    /// Creates a style using the default backslash escape.
    pub const fn new(head: char, tail: char, separator: char) -> Self {
        Self {
            head,
            tail,
            separator,
            escape: Self::DEFAULT_ESCAPE,
        }
    }

    /// Returns a copy of this style with a different escape character.
    pub const fn with_escape(self, escape: char) -> Self {
        Self { escape, ..self }
    }
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self::ANGLE_BRACKETS
    }
}
