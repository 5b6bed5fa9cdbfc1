//! Template evaluation.

use crate::interpreter::placeholder::Placeholder;
use crate::interpreter::resolver::Resolver;
use crate::parser::{PlaceholderStyle, Segment, Template, parse_template};
use crate::types::Context;

/// Everything a template needs besides its own segments.
pub(crate) struct EvalContext<'a> {
    pub context: Option<&'a dyn Context>,
    /// Resolver owned by the entry. Consulted first.
    pub local: &'a Resolver,
    /// Resolver supplied by the caller.
    pub caller: &'a Resolver,
    pub style: &'a PlaceholderStyle,
}

/// Evaluates a parsed template.
///
/// `bound` holds the entry-local placeholder found for each segment when the
/// template was built, so the local resolver is not consulted again. Names
/// without a bound placeholder are looked up in the caller's resolver.
pub(crate) fn eval_template(
    template: &Template,
    bound: &[Option<Placeholder>],
    ctx: &EvalContext<'_>,
) -> String {
    eval_segments(
        template,
        |index, name| {
            bound
                .get(index)
                .and_then(Option::as_ref)
                .cloned()
                .or_else(|| ctx.caller.resolve(name))
        },
        ctx,
        true,
    )
}

fn eval_segments(
    template: &Template,
    lookup: impl Fn(usize, &str) -> Option<Placeholder>,
    ctx: &EvalContext<'_>,
    reparse: bool,
) -> String {
    let mut output = String::new();
    for (index, segment) in template.segments.iter().enumerate() {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Placeholder {
                name,
                arguments,
                raw,
            } => match lookup_named(index, name, &lookup) {
                Some(placeholder) => {
                    let value = placeholder.value(ctx.context, arguments);
                    if reparse && placeholder.is_unsafe() {
                        output.push_str(&eval_unsafe_output(&value, ctx));
                    } else {
                        output.push_str(&value);
                    }
                }
                None => output.push_str(raw),
            },
        }
    }
    output
}

/// A placeholder without a name is never looked up.
fn lookup_named(
    index: usize,
    name: &str,
    lookup: impl Fn(usize, &str) -> Option<Placeholder>,
) -> Option<Placeholder> {
    if name.is_empty() {
        None
    } else {
        lookup(index, name)
    }
}

/// One further pass over an unsafe placeholder's output. Placeholders found in
/// this pass are inserted literally.
fn eval_unsafe_output(value: &str, ctx: &EvalContext<'_>) -> String {
    let template = parse_template(value, ctx.style);
    eval_segments(
        &template,
        |_, name| ctx.local.resolve(name).or_else(|| ctx.caller.resolve(name)),
        ctx,
        false,
    )
}
