//! Coverage table rendering.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets};

/// How completely one language covers the source file's paths.
pub struct LanguageCoverage {
    /// Language identifier (the file stem, e.g. "de").
    pub language: String,
    /// Number of paths with a value of the right shape.
    pub translated: usize,
    /// Paths without a value.
    pub missing: Vec<String>,
    /// Paths whose value has the wrong shape.
    pub invalid: Vec<String>,
}

impl LanguageCoverage {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    /// Whole-number percentage of `total` that is translated. An empty
    /// source counts as fully covered.
    pub fn percent(&self, total: usize) -> usize {
        if total == 0 {
            100
        } else {
            (self.translated * 100).div_euclid(total)
        }
    }
}

/// One row per language: translated/total, percentage, missing and
/// wrong-shape counts.
pub fn format_coverage_table(total: usize, coverage: &[LanguageCoverage]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Language", "Translated", "%", "Missing", "Wrong shape"]);

    for row in coverage {
        let numbers = [
            format!("{}/{total}", row.translated),
            row.percent(total).to_string(),
            row.missing.len().to_string(),
            row.invalid.len().to_string(),
        ];
        let mut cells = vec![Cell::new(&row.language)];
        cells.extend(
            numbers
                .into_iter()
                .map(|text| Cell::new(text).set_alignment(CellAlignment::Right)),
        );
        table.add_row(cells);
    }

    table
}
