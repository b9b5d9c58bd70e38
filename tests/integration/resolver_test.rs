use bloodwork::resolve::matchers::{ExactMatcher, FuzzyMatcher};
use bloodwork::{AliasTable, FuzzyMatchConfig, IndicatorResolver, Table};

fn table(columns: &[&str]) -> Table {
    Table::new(columns.iter().copied())
}

#[test]
fn test_exact_match_beats_alias() {
    let resolver = IndicatorResolver::default();
    let t = table(&["Name", "MCHC", "Mean Corpuscular Hemoglobin Concentration"]);
    assert_eq!(
        resolver.resolve(&t, "Mean Corpuscular Hemoglobin Concentration"),
        Some("Mean Corpuscular Hemoglobin Concentration")
    );
}

#[test]
fn test_cascade_stages() {
    let resolver = IndicatorResolver::default();
    let columns: Vec<String> = [
        "Name",
        "Hb (g/L)",
        "Creatine Kinase#7",
        "Blood\u{3000}Urea Nitrogen",
        "Serum Iron (umol/L)",
        "Reticulocyte Pct",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect();

    let stage = |indicator: &str| resolver.resolve_with_stage(&columns, indicator);

    assert_eq!(stage("Hemoglobin"), Some((1, "alias")));
    assert_eq!(stage("HGB"), Some((1, "reverse-alias")));
    assert_eq!(stage("Creatine Kinase"), Some((2, "prefix")));
    assert_eq!(stage("Blood Urea Nitrogen"), Some((3, "whitespace")));
    assert_eq!(stage("Serum Iron [umol/L]"), Some((4, "bracket-stripped")));
    assert_eq!(stage("Reticulocyte Pcnt"), Some((5, "fuzzy")));
    assert_eq!(stage("Sodium"), None);
}

#[test]
fn test_fuzzy_threshold_is_tunable() {
    let strict = FuzzyMatchConfig {
        max_length_delta: 3,
        min_similarity: 0.9,
    };
    let columns = vec!["abcdx".to_string()];

    let default_resolver =
        IndicatorResolver::with_matchers(AliasTable::default(), vec![Box::new(FuzzyMatcher::default())]);
    let strict_resolver =
        IndicatorResolver::with_matchers(AliasTable::default(), vec![Box::new(FuzzyMatcher::new(strict))]);

    assert_eq!(default_resolver.resolve_in(&columns, "abcde"), Some(0));
    assert_eq!(strict_resolver.resolve_in(&columns, "abcde"), None);
    assert_eq!(default_resolver.resolve_in(&["abcxy".to_string()], "abcde"), None);
}

#[test]
fn test_extended_alias_table() {
    let aliases = AliasTable::new("site").with_entry("Sodium", ["Na+"]);
    let resolver = IndicatorResolver::new(aliases, FuzzyMatchConfig::default());
    let t = table(&["Name", "Na+ (mmol/L)"]);
    assert_eq!(resolver.resolve(&t, "Sodium"), Some("Na+ (mmol/L)"));

    let exact_only = IndicatorResolver::with_matchers(AliasTable::bundled(), vec![Box::new(ExactMatcher)]);
    assert_eq!(exact_only.resolve(&t, "Sodium"), None);
}
