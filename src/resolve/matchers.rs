//! Column matching strategies
//!
//! Each matcher is one stage of the resolution cascade. A matcher looks for the
//! requested indicator among a table's column names and returns the position
//! of the first acceptable column.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::FuzzyMatchConfig;
use crate::resolve::aliases::AliasTable;

lazy_static! {
    // Half- and full-width parenthesised or bracketed qualifiers, e.g. units
    static ref BRACKETED: Regex = Regex::new(r"[（(\[【].*?[）)\]】]").unwrap();
    // Deduplication suffix appended to repeated column names
    static ref DEDUP_SUFFIX: Regex = Regex::new(r"\.\d+$").unwrap();
}

/// One stage of the indicator resolution cascade
pub trait ColumnMatcher: Send + Sync {
    /// Stage name, for logging
    fn name(&self) -> &'static str;

    /// Position of the first column in `columns` matching `indicator`
    fn find(&self, indicator: &str, columns: &[String], aliases: &AliasTable) -> Option<usize>;
}

fn exact(name: &str, columns: &[String]) -> Option<usize> {
    columns.iter().position(|column| column == name)
}

fn prefix(name: &str, columns: &[String]) -> Option<usize> {
    columns.iter().position(|column| column.starts_with(name))
}

fn exact_then_prefix(name: &str, columns: &[String]) -> Option<usize> {
    exact(name, columns).or_else(|| prefix(name, columns))
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Column base name: without a `#` annotation or a `.N` dedup suffix
fn column_base(column: &str) -> &str {
    let base = column.split('#').next().unwrap_or(column);
    DEDUP_SUFFIX
        .find(base)
        .map_or(base, |suffix| &base[..suffix.start()])
}

/// Name with bracketed qualifiers removed, trimmed
pub fn strip_brackets(text: &str) -> String {
    BRACKETED.replace_all(text, "").trim().to_string()
}

/// Exact column-name equality
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactMatcher;

impl ColumnMatcher for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn find(&self, indicator: &str, columns: &[String], _aliases: &AliasTable) -> Option<usize> {
        exact(indicator, columns)
    }
}

/// Declared aliases of the indicator, each tried exact then as a prefix
#[derive(Debug, Default, Clone, Copy)]
pub struct AliasMatcher;

impl ColumnMatcher for AliasMatcher {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn find(&self, indicator: &str, columns: &[String], aliases: &AliasTable) -> Option<usize> {
        aliases
            .aliases_of(indicator)?
            .iter()
            .find_map(|alias| exact_then_prefix(alias, columns))
    }
}

/// The indicator is itself an alias: try its canonical name, then its siblings
#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseAliasMatcher;

impl ColumnMatcher for ReverseAliasMatcher {
    fn name(&self) -> &'static str {
        "reverse-alias"
    }

    fn find(&self, indicator: &str, columns: &[String], aliases: &AliasTable) -> Option<usize> {
        aliases
            .canonicals_for(indicator)
            .find_map(|(canonical, siblings)| {
                exact_then_prefix(canonical, columns).or_else(|| {
                    siblings
                        .iter()
                        .find_map(|alias| exact_then_prefix(alias, columns))
                })
            })
    }
}

/// Column name starting with the indicator (annotated or deduplicated columns)
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixMatcher;

impl ColumnMatcher for PrefixMatcher {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn find(&self, indicator: &str, columns: &[String], _aliases: &AliasTable) -> Option<usize> {
        prefix(indicator, columns)
    }
}

/// Exact or prefix match once all whitespace, full-width included, is removed
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceMatcher;

impl ColumnMatcher for WhitespaceMatcher {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn find(&self, indicator: &str, columns: &[String], _aliases: &AliasTable) -> Option<usize> {
        let wanted = strip_whitespace(indicator);
        if wanted.is_empty() {
            return None;
        }
        columns.iter().position(|column| {
            let candidate = strip_whitespace(column);
            candidate == wanted || candidate.starts_with(&wanted)
        })
    }
}

/// Equality or containment, either way, after removing bracketed qualifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct BracketStrippedMatcher;

impl ColumnMatcher for BracketStrippedMatcher {
    fn name(&self) -> &'static str {
        "bracket-stripped"
    }

    fn find(&self, indicator: &str, columns: &[String], _aliases: &AliasTable) -> Option<usize> {
        let wanted = strip_brackets(indicator);
        if wanted.is_empty() {
            return None;
        }
        columns.iter().position(|column| {
            let candidate = strip_brackets(column_base(column));
            !candidate.is_empty()
                && (candidate == wanted || candidate.contains(&wanted) || wanted.contains(&candidate))
        })
    }
}

/// Character-overlap similarity between bracket-stripped names
///
/// Accepts the first column whose length is within `max_length_delta`
/// characters of the indicator and whose share of indicator characters
/// present in the column reaches `min_similarity`.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    config: FuzzyMatchConfig,
}

impl FuzzyMatcher {
    /// Matcher with the given thresholds
    #[must_use]
    pub const fn new(config: FuzzyMatchConfig) -> Self {
        Self { config }
    }

    /// Similarity of two names in `[0, 1]`, or `None` when their lengths differ too much
    #[must_use]
    pub fn similarity(&self, indicator: &str, column: &str) -> Option<f64> {
        let indicator_len = indicator.chars().count();
        let column_len = column.chars().count();
        if indicator_len.abs_diff(column_len) > self.config.max_length_delta {
            return None;
        }
        let longest = indicator_len.max(column_len);
        if longest == 0 {
            return None;
        }
        let shared = indicator.chars().filter(|&c| column.contains(c)).count();
        Some(shared as f64 / longest as f64)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(FuzzyMatchConfig::default())
    }
}

impl ColumnMatcher for FuzzyMatcher {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn find(&self, indicator: &str, columns: &[String], _aliases: &AliasTable) -> Option<usize> {
        let wanted = strip_brackets(indicator);
        columns.iter().position(|column| {
            let candidate = strip_brackets(column_base(column));
            self.similarity(&wanted, &candidate)
                .is_some_and(|score| score >= self.config.min_similarity)
        })
    }
}

/// The standard cascade, in precedence order
#[must_use]
pub fn default_cascade(fuzzy: FuzzyMatchConfig) -> Vec<Box<dyn ColumnMatcher>> {
    vec![
        Box::new(ExactMatcher),
        Box::new(AliasMatcher),
        Box::new(ReverseAliasMatcher),
        Box::new(PrefixMatcher),
        Box::new(WhitespaceMatcher),
        Box::new(BracketStrippedMatcher),
        Box::new(FuzzyMatcher::new(fuzzy)),
    ]
}
