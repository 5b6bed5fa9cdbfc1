//! Implementation of the `lexis check` command.

use std::path::PathBuf;

use lexis::{Shape, ValidationIssue};
use miette::{IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::source::{LanguageFile, build_manager, declared_entries, read_language_file};

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Language files to check (.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Paths every language must provide (comma-separated, checked as text)
    #[arg(long, value_delimiter = ',', required_unless_present = "source")]
    pub paths: Vec<String>,

    /// Language file whose paths and value shapes every language must match
    #[arg(long, conflicts_with = "paths")]
    pub source: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for one problem.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum IssueJson<'a> {
    Missing {
        language: &'a str,
        path: &'a str,
    },
    InvalidType {
        language: &'a str,
        path: &'a str,
        expected: &'a str,
        found: &'a str,
    },
}

impl<'a> From<&'a ValidationIssue> for IssueJson<'a> {
    fn from(issue: &'a ValidationIssue) -> Self {
        match issue {
            ValidationIssue::Missing { language, path } => IssueJson::Missing { language, path },
            ValidationIssue::InvalidType {
                language,
                path,
                expected,
                found,
            } => IssueJson::InvalidType {
                language,
                path,
                expected,
                found,
            },
        }
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let files: Vec<LanguageFile> = args
        .files
        .iter()
        .map(|path| read_language_file(path))
        .collect::<Result<_>>()?;

    let entries = match &args.source {
        Some(source) => declared_entries(&read_language_file(source)?.document),
        None => args
            .paths
            .iter()
            .map(|path| (path.clone(), Shape::Text))
            .collect(),
    };

    let manager = build_manager(&files, &entries)?;
    let issues = manager.validate();

    if args.json {
        let output: Vec<IssueJson<'_>> = issues.iter().map(IssueJson::from).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).into_diagnostic()?
        );
    } else {
        for file in &files {
            let problems: Vec<&ValidationIssue> = issues
                .iter()
                .filter(|issue| issue.language() == file.language)
                .collect();
            if problems.is_empty() {
                println!(
                    "{} {} ({} paths)",
                    "ok".if_supports_color(Stream::Stdout, |t| t.green()),
                    file.language,
                    entries.len()
                );
            } else {
                println!(
                    "{} {} ({} problems)",
                    "error".if_supports_color(Stream::Stdout, |t| t.red()),
                    file.language,
                    problems.len()
                );
                for issue in problems {
                    print_issue(issue);
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}

fn print_issue(issue: &ValidationIssue) {
    match issue {
        ValidationIssue::Missing { path, .. } => println!("  - {path}: missing"),
        ValidationIssue::InvalidType {
            path,
            expected,
            found,
            ..
        } => println!("  - {path}: expected {expected}, found {found}"),
    }
}
