//! Indicator resolution
//!
//! Maps a requested biomarker name onto the column that holds it in a given
//! table. Source exports name the same indicator inconsistently, so resolution
//! runs an ordered cascade of matchers and the first hit wins. A miss means the
//! indicator is absent from that table; it is never an error.

pub mod aliases;
pub mod matchers;

use std::fmt;

use log::debug;

use crate::config::FuzzyMatchConfig;
use crate::models::table::Table;

pub use aliases::{AliasTable, DEFAULT_ALIAS_VERSION};
pub use matchers::{ColumnMatcher, FuzzyMatcher, default_cascade};

/// Resolves indicator names to table columns
pub struct IndicatorResolver {
    aliases: AliasTable,
    matchers: Vec<Box<dyn ColumnMatcher>>,
}

impl IndicatorResolver {
    /// Resolver running the standard cascade
    #[must_use]
    pub fn new(aliases: AliasTable, fuzzy: FuzzyMatchConfig) -> Self {
        Self::with_matchers(aliases, default_cascade(fuzzy))
    }

    /// Resolver running a custom cascade, in the given order
    #[must_use]
    pub fn with_matchers(aliases: AliasTable, matchers: Vec<Box<dyn ColumnMatcher>>) -> Self {
        Self { aliases, matchers }
    }

    /// Alias table in use
    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Column holding `indicator` in `table`
    #[must_use]
    pub fn resolve<'t>(&self, table: &'t Table, indicator: &str) -> Option<&'t str> {
        self.resolve_in(table.columns(), indicator)
            .map(|index| table.columns()[index].as_str())
    }

    /// Position of the column holding `indicator` among `columns`
    #[must_use]
    pub fn resolve_in(&self, columns: &[String], indicator: &str) -> Option<usize> {
        self.resolve_with_stage(columns, indicator)
            .map(|(index, _)| index)
    }

    /// Position of the matching column and the name of the stage that found it
    #[must_use]
    pub fn resolve_with_stage(
        &self,
        columns: &[String],
        indicator: &str,
    ) -> Option<(usize, &'static str)> {
        let indicator = indicator.trim();
        if indicator.is_empty() {
            return None;
        }

        let hit = self.matchers.iter().find_map(|matcher| {
            matcher
                .find(indicator, columns, &self.aliases)
                .map(|index| (index, matcher.name()))
        });

        match hit {
            Some((index, stage)) => {
                debug!("Resolved '{indicator}' to '{}' ({stage})", columns[index]);
            }
            None => debug!("Indicator '{indicator}' not found among {} columns", columns.len()),
        }
        hit
    }
}

impl Default for IndicatorResolver {
    fn default() -> Self {
        Self::new(AliasTable::bundled(), FuzzyMatchConfig::default())
    }
}

impl fmt::Debug for IndicatorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicatorResolver")
            .field("aliases", &self.aliases.version())
            .field(
                "matchers",
                &self.matchers.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
