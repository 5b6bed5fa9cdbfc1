//! Implementation of the `lexis eval` command.

use clap::ValueEnum;
use lexis::{Placeholder, PlaceholderStyle, Resolver, Segment, TextTranslation};
use miette::IntoDiagnostic;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Template string to evaluate
    #[arg(long, required = true)]
    pub template: String,

    /// Placeholder syntax
    #[arg(long, value_enum, default_value_t = StyleArg::Angle)]
    pub style: StyleArg,

    /// Placeholder values in name=value format (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Evaluate placeholder values as templates, one level deep
    #[arg(long = "unsafe")]
    pub unsafe_params: bool,

    /// Print the parsed segments instead of evaluating
    #[arg(long)]
    pub tokens: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Placeholder syntax presets.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StyleArg {
    /// <name:arg>
    Angle,
    /// {name:arg}
    Curly,
    /// (name:arg)
    Parentheses,
    /// %name:arg%
    Percent,
}

impl StyleArg {
    fn style(self) -> PlaceholderStyle {
        match self {
            StyleArg::Angle => PlaceholderStyle::ANGLE_BRACKETS,
            StyleArg::Curly => PlaceholderStyle::CURLY_BRACKETS,
            StyleArg::Parentheses => PlaceholderStyle::PARENTHESES,
            StyleArg::Percent => PlaceholderStyle::PERCENT,
        }
    }
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub result: String,
    pub unresolved: Vec<String>,
    pub style: PlaceholderStyle,
}

/// JSON output for one parsed segment.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum SegmentJson<'a> {
    Literal {
        text: &'a str,
    },
    Placeholder {
        name: &'a str,
        arguments: &'a [String],
    },
}

/// Parse a key=value parameter string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter format '{s}': expected name=value"))?;
    Ok((key.to_string(), value.to_string()))
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> miette::Result<i32> {
    let style = args.style.style();
    let translation = TextTranslation::new(&args.template, &style, &Resolver::empty());

    if args.tokens {
        print_tokens(&translation, args.json)?;
        return Ok(exitcode::OK);
    }

    let params = Resolver::of(
        args.params
            .into_iter()
            .map(|(name, value)| Placeholder::constant(name, value)),
    );
    let params = if args.unsafe_params {
        params.into_unsafe()
    } else {
        params
    };
    let resolver = Resolver::chain([params, Resolver::builtin()]);

    let result = translation.evaluate(None, &resolver);
    let mut unresolved: Vec<String> = translation
        .template()
        .placeholder_names()
        .filter(|name| resolver.resolve(name).is_none())
        .map(str::to_string)
        .collect();
    unresolved.sort();
    unresolved.dedup();

    if args.json {
        let output = EvalResult {
            result,
            unresolved,
            style,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).into_diagnostic()?
        );
    } else {
        println!("{result}");
        for name in &unresolved {
            eprintln!(
                "{}: no value for placeholder '{name}'",
                "warning".if_supports_color(Stream::Stderr, |t| t.yellow())
            );
        }
    }

    Ok(exitcode::OK)
}

fn print_tokens(translation: &TextTranslation, json: bool) -> miette::Result<()> {
    let segments = &translation.template().segments;
    if json {
        let output: Vec<SegmentJson<'_>> = segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => SegmentJson::Literal { text },
                Segment::Placeholder {
                    name, arguments, ..
                } => SegmentJson::Placeholder { name, arguments },
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).into_diagnostic()?
        );
    } else {
        for segment in segments {
            match segment {
                Segment::Literal(text) => println!("literal     {text:?}"),
                Segment::Placeholder {
                    name, arguments, ..
                } => println!("placeholder {name:?} {arguments:?}"),
            }
        }
    }
    Ok(())
}
