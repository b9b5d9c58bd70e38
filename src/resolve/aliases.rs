//! Indicator alias table
//!
//! Maps a canonical indicator name to the surface forms it appears under in
//! source exports. The table is versioned and read-only once built; new
//! surface forms are added as entries.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Version of the bundled alias table
pub const DEFAULT_ALIAS_VERSION: &str = "2025.1";

/// Surface forms of one canonical indicator
pub type AliasList = SmallVec<[String; 4]>;

/// Canonical indicator name to acceptable surface forms
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    version: String,
    entries: Vec<(String, AliasList)>,
    // alias -> positions in `entries`
    reverse: FxHashMap<String, SmallVec<[usize; 2]>>,
}

impl AliasTable {
    /// Empty table with a version tag
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Add an entry; entries keep insertion order
    #[must_use]
    pub fn with_entry<S: Into<String>>(
        mut self,
        canonical: impl Into<String>,
        aliases: impl IntoIterator<Item = S>,
    ) -> Self {
        let position = self.entries.len();
        let aliases: AliasList = aliases.into_iter().map(Into::into).collect();
        for alias in &aliases {
            self.reverse.entry(alias.clone()).or_default().push(position);
        }
        self.entries.push((canonical.into(), aliases));
        self
    }

    /// The bundled alias table
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(DEFAULT_ALIAS_VERSION)
            .with_entry(
                "Mean Corpuscular Hemoglobin Concentration",
                ["Mean Cell Hemoglobin Concentration", "MCHC", "Mean Hemoglobin Concentration"],
            )
            .with_entry("Mean Corpuscular Hemoglobin", ["Mean Cell Hemoglobin", "MCH"])
            .with_entry("Mean Corpuscular Volume", ["Mean Cell Volume", "MCV"])
            .with_entry(
                "Mean Hemoglobin Concentration",
                ["Mean Corpuscular Hemoglobin Concentration", "MCHC"],
            )
            .with_entry(
                "High-Sensitivity C-Reactive Protein",
                ["C-Reactive Protein", "CRP", "hsCRP", "hs-CRP"],
            )
            .with_entry("Reticulocyte Percentage", ["Reticulocytes", "retic", "Retic"])
            .with_entry("Blood Urea Nitrogen", ["Urea", "BUN"])
            .with_entry("Creatine Kinase", ["CK", "Creatine Phosphokinase", "CPK"])
            .with_entry("Hemoglobin", ["Haemoglobin", "HGB", "Hb"])
            .with_entry("Testosterone", ["Total Testosterone"])
            .with_entry("Free Testosterone", ["FT"])
            .with_entry("White Blood Cells", ["WBC", "Leukocytes"])
            .with_entry("Red Blood Cells", ["RBC", "Erythrocytes"])
            .with_entry("Platelets", ["PLT"])
            .with_entry("Ferritin", ["Serum Ferritin", "Ferri"])
    }

    /// Table version tag
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Declared aliases of a canonical name
    #[must_use]
    pub fn aliases_of(&self, canonical: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == canonical)
            .map(|(_, aliases)| aliases.as_slice())
    }

    /// Entries listing `alias` among their surface forms, in insertion order
    pub fn canonicals_for<'a>(
        &'a self,
        alias: &str,
    ) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        self.reverse
            .get(alias)
            .into_iter()
            .flatten()
            .map(|&position| {
                let (name, aliases) = &self.entries[position];
                (name.as_str(), aliases.as_slice())
            })
    }

    /// Number of canonical entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_lookup() {
        let table = AliasTable::bundled();
        assert_eq!(table.version(), DEFAULT_ALIAS_VERSION);
        assert!(table.aliases_of("Creatine Kinase").unwrap().contains(&"CK".to_string()));
        assert!(table.aliases_of("Sodium").is_none());

        let owners: Vec<&str> = table.canonicals_for("MCHC").map(|(name, _)| name).collect();
        assert_eq!(
            owners,
            vec!["Mean Corpuscular Hemoglobin Concentration", "Mean Hemoglobin Concentration"]
        );
        assert_eq!(table.canonicals_for("nothing").count(), 0);
    }

    #[test]
    fn test_extension_keeps_order() {
        let table = AliasTable::new("test")
            .with_entry("Sodium", ["Na"])
            .with_entry("Potassium", ["K"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.aliases_of("Sodium"), Some(&["Na".to_string()][..]));
    }
}
