//! Public AST types for parsed templates.

/// A parsed template string.
///
/// Adjacent literal text is always merged, so a template never contains two
/// `Literal` segments in a row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    pub segments: Vec<Segment>,
}

/// A segment within a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text with escape sequences already removed.
    Literal(String),
    /// A placeholder reference: `<name:arg1:arg2>` in the angle-bracket style.
    Placeholder {
        /// Placeholder name, unescaped and unquoted.
        name: String,
        /// Raw argument strings, unescaped and unquoted. Empty arguments are kept.
        arguments: Vec<String>,
        /// The source text of the whole placeholder, delimiters included.
        /// Re-emitted verbatim when the name cannot be resolved.
        raw: String,
    },
}

impl Template {
    /// Returns true if the template contains no placeholders.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Iterates over the names of all placeholders, in order of appearance.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}
