//! Shape-checked, parsed translations and their evaluated output.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::interpreter::coercion::{check_array, check_map, check_string};
use crate::interpreter::error::CoercionError;
use crate::interpreter::evaluator::{EvalContext, eval_template};
use crate::interpreter::placeholder::Placeholder;
use crate::interpreter::resolver::Resolver;
use crate::parser::{PlaceholderStyle, Segment, Template, parse_template};
use crate::types::{Context, MapKey, RawValue, Shape};

/// One entry's value in one language, checked against the entry's shape.
///
/// Every text leaf is parsed exactly once, when the translation is built.
#[derive(Debug, Clone)]
pub enum Translation {
    Text(TextTranslation),
    List(Vec<Translation>),
    Map(BTreeMap<MapKey, Translation>),
}

impl Translation {
    /// Checks `raw` against `shape` and parses every text leaf.
    pub fn build(
        raw: &RawValue,
        shape: &Shape,
        style: &PlaceholderStyle,
        local: &Resolver,
    ) -> Result<Self, CoercionError> {
        match shape {
            Shape::Text => Ok(Translation::Text(TextTranslation::new(
                check_string(raw)?,
                style,
                local,
            ))),
            Shape::Array(element) => check_array(raw, |item| {
                Translation::build(item, element, style, local)
            })
            .map(Translation::List),
            Shape::Map(kind, value) => check_map(raw, *kind, |item| {
                Translation::build(item, value, style, local)
            })
            .map(Translation::Map),
        }
    }

    /// Evaluates every text leaf against `resolver` and `context`.
    pub fn evaluate(&self, context: Option<&dyn Context>, resolver: &Resolver) -> Rendered {
        match self {
            Translation::Text(text) => Rendered::Text(text.evaluate(context, resolver)),
            Translation::List(items) => Rendered::List(
                items
                    .iter()
                    .map(|item| item.evaluate(context, resolver))
                    .collect(),
            ),
            Translation::Map(entries) => Rendered::Map(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), item.evaluate(context, resolver)))
                    .collect(),
            ),
        }
    }

    /// Number of elements of a list or map. A text translation has none.
    pub fn len(&self) -> usize {
        match self {
            Translation::Text(_) => 0,
            Translation::List(items) => items.len(),
            Translation::Map(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&Translation> {
        match self {
            Translation::List(items) => items.get(index),
            Translation::Text(_) | Translation::Map(_) => None,
        }
    }

    pub fn get_key(&self, key: &MapKey) -> Option<&Translation> {
        match self {
            Translation::Map(entries) => entries.get(key),
            Translation::Text(_) | Translation::List(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextTranslation> {
        match self {
            Translation::Text(text) => Some(text),
            Translation::List(_) | Translation::Map(_) => None,
        }
    }
}

/// A parsed template together with the entry-local placeholders it uses.
#[derive(Debug, Clone)]
pub struct TextTranslation {
    template: Template,
    /// Entry-local placeholder per segment, found once at build time.
    bound: Vec<Option<Placeholder>>,
    local: Resolver,
    style: PlaceholderStyle,
}

impl TextTranslation {
    pub fn new(raw: &str, style: &PlaceholderStyle, local: &Resolver) -> Self {
        let template = parse_template(raw, style);
        let bound = template
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Placeholder { name, .. } => local.resolve(name),
                Segment::Literal(_) => None,
            })
            .collect();
        Self {
            template,
            bound,
            local: local.clone(),
            style: *style,
        }
    }

    pub fn evaluate(&self, context: Option<&dyn Context>, resolver: &Resolver) -> String {
        let ctx = EvalContext {
            context,
            local: &self.local,
            caller: resolver,
            style: &self.style,
        };
        eval_template(&self.template, &self.bound, &ctx)
    }

    pub fn template(&self) -> &Template {
        &self.template
    }
}

/// The evaluated form of a [`Translation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Text(String),
    List(Vec<Rendered>),
    Map(BTreeMap<MapKey, Rendered>),
}

impl Rendered {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Rendered::Text(text) => Some(text),
            Rendered::List(_) | Rendered::Map(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Rendered::Text(text) => Some(text),
            Rendered::List(_) | Rendered::Map(_) => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Rendered>> {
        match self {
            Rendered::List(items) => Some(items),
            Rendered::Text(_) | Rendered::Map(_) => None,
        }
    }

    pub fn into_map(self) -> Option<BTreeMap<MapKey, Rendered>> {
        match self {
            Rendered::Map(entries) => Some(entries),
            Rendered::Text(_) | Rendered::List(_) => None,
        }
    }
}

impl Display for Rendered {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Rendered::Text(text) => f.write_str(text),
            Rendered::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Rendered::Map(entries) => {
                f.write_str("{")?;
                for (index, (key, item)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
