use bloodwork::models::sheet::{Cadence, Sheet};
use bloodwork::{CellValue, EngineConfig, FusionReport, Table, fuse};

use crate::utils::{monthly_table, quarterly_sheet, yearly_sheet};

#[test]
fn test_zero_secondaries_returns_deduplicated_primary() {
    let primary = Table::from_rows(
        ["Name", "Test Date", "Ferritin", "Ferritin"],
        vec![vec!["A".into(), "2024-01-05".into(), 50.0.into(), 51.0.into()]],
    )
    .unwrap();

    let outcome = fuse(primary.clone(), &[], &EngineConfig::default());

    assert_eq!(outcome.table.columns(), &["Name", "Test Date", "Ferritin", "Ferritin.1"]);
    assert_eq!(outcome.table.rows().collect::<Vec<_>>(), primary.rows().collect::<Vec<_>>());
    assert_eq!(outcome.report, FusionReport::default());
}

#[test]
fn test_duplicate_secondary_keys_last_row_wins() {
    let yearly = Sheet::new(
        Cadence::Yearly,
        ["Name", "Test Date", "Testosterone"],
        vec![
            vec!["A".into(), "2024-01-05".into(), 10.0.into()],
            vec!["A".into(), "2024-01-05".into(), 20.0.into()],
        ],
    );

    let outcome = fuse(monthly_table(), &[yearly], &EngineConfig::default());

    assert_eq!(outcome.table.value(0, "Testosterone"), Some(&CellValue::Number(20.0)));
    assert_eq!(outcome.table.value(1, "Testosterone"), Some(&CellValue::Null));
}

#[test]
fn test_secondaries_contribute_indicator_columns_only() {
    let outcome = fuse(
        monthly_table(),
        &[quarterly_sheet(), yearly_sheet()],
        &EngineConfig::default(),
    );
    let table = &outcome.table;

    assert_eq!(outcome.report.merged.len(), 2);
    assert_eq!(
        outcome.report.merged[0].columns,
        vec!["Serum Iron".to_string(), "Ferritin_quarterly".to_string()]
    );
    assert_eq!(outcome.report.merged[0].matched_rows, 2);
    assert_eq!(outcome.report.merged[1].columns, vec!["Testosterone".to_string()]);

    // Administrative, key and placeholder columns never leak in
    assert!(!table.has_column("Age"));
    assert!(!table.has_column("Athlete"));
    assert!(!table.has_column("Unnamed_4"));
    assert!(!table.columns().iter().any(|c| c.contains("_2024")));
    assert_eq!(table.num_rows(), monthly_table().num_rows());

    assert_eq!(table.value(0, "Serum Iron"), Some(&CellValue::Number(300.0)));
    assert_eq!(table.value(2, "Serum Iron"), Some(&CellValue::Number(150.0)));
    assert_eq!(table.value(0, "Ferritin"), Some(&CellValue::Number(50.0)));
    assert_eq!(table.value(0, "Ferritin_quarterly"), Some(&CellValue::Number(55.0)));
    assert_eq!(table.value(3, "Ferritin_quarterly"), Some(&CellValue::Null));
    assert_eq!(table.value(1, "Testosterone"), Some(&CellValue::Number(650.0)));
}

#[test]
fn test_unmergeable_sheet_is_skipped_without_side_effects() {
    let broken = Sheet::new(
        Cadence::AdHoc,
        ["Name", "Ferritin"],
        vec![vec!["A".into(), 1.0.into()]],
    );

    let outcome = fuse(
        monthly_table(),
        &[broken, yearly_sheet()],
        &EngineConfig::default(),
    );

    assert_eq!(outcome.report.skipped.len(), 1);
    assert_eq!(outcome.report.skipped[0].label, "other");
    assert_eq!(outcome.report.merged.len(), 1);
    assert_eq!(outcome.table.num_columns(), monthly_table().num_columns() + 1);
}
