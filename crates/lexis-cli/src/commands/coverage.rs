//! Implementation of the `lexis coverage` command.

use std::path::PathBuf;

use lexis::ValidationIssue;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::output::table::{LanguageCoverage, format_coverage_table};
use crate::source::{LanguageFile, build_manager, declared_entries, read_language_file};

/// Arguments for the coverage command.
#[derive(Debug, clap::Args)]
pub struct CoverageArgs {
    /// Reference language file; every path it declares is expected
    #[arg(long)]
    pub source: PathBuf,

    /// Language files to measure (.json)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Exit with a data error if any language is incomplete
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CoverageJson<'a> {
    language: &'a str,
    translated: usize,
    total: usize,
    percent: usize,
    missing: &'a [String],
    invalid: &'a [String],
}

/// Run the coverage command.
pub fn run_coverage(args: CoverageArgs) -> Result<i32> {
    let entries = declared_entries(&read_language_file(&args.source)?.document);
    let files: Vec<LanguageFile> = args
        .files
        .iter()
        .map(|path| read_language_file(path))
        .collect::<Result<_>>()?;

    let manager = build_manager(&files, &entries)?;
    let total = manager.paths().len();
    let issues = manager.validate();
    let coverage: Vec<LanguageCoverage> = files
        .iter()
        .map(|file| measure(&file.language, &issues, total))
        .collect();

    if args.json {
        print_json(&coverage, total)?;
    } else {
        print_text(&coverage, total);
    }

    if args.strict && coverage.iter().any(|c| !c.is_complete()) {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}

fn measure(language: &str, issues: &[ValidationIssue], total: usize) -> LanguageCoverage {
    let mut missing = Vec::new();
    let mut invalid = Vec::new();
    for issue in issues.iter().filter(|issue| issue.language() == language) {
        match issue {
            ValidationIssue::Missing { path, .. } => missing.push(path.clone()),
            ValidationIssue::InvalidType { path, .. } => invalid.push(path.clone()),
        }
    }
    LanguageCoverage {
        language: language.to_string(),
        translated: total.saturating_sub(missing.len() + invalid.len()),
        missing,
        invalid,
    }
}

fn print_json(coverage: &[LanguageCoverage], total: usize) -> Result<()> {
    let rows: Vec<CoverageJson<'_>> = coverage
        .iter()
        .map(|c| CoverageJson {
            language: &c.language,
            translated: c.translated,
            total,
            percent: c.percent(total),
            missing: &c.missing,
            invalid: &c.invalid,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
    Ok(())
}

fn print_text(coverage: &[LanguageCoverage], total: usize) {
    println!("{}", format_coverage_table(total, coverage));

    for c in coverage {
        for (heading, paths) in [("Missing", &c.missing), ("Wrong shape", &c.invalid)] {
            if !paths.is_empty() {
                println!("\n{heading} in {}:", c.language);
                for path in paths {
                    println!("  - {path}");
                }
            }
        }
    }
}
