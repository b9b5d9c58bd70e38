use bloodwork::algorithm::classify::classify_value;
use bloodwork::config::ReferenceColumns;
use bloodwork::{CellValue, PolarityRules, RangeSpec, ReferenceRanges, Sex, Table, ThresholdBand, ThresholdTable, Verdict};

use crate::utils::engine;

fn band(low_1: Option<f64>, low_2: f64, high_2: f64, high_1: Option<f64>) -> ThresholdBand {
    ThresholdBand {
        low_1,
        low_2: Some(low_2),
        high_2: Some(high_2),
        high_1,
        ..ThresholdBand::default()
    }
}

#[test]
fn test_below_normal_is_low() {
    let table: ThresholdTable = [("Serum Iron", band(None, 210.0, 430.0, None))].into_iter().collect();
    let result = classify_value("Serum Iron", 150.0, &table, &PolarityRules::default());
    assert_eq!(result.verdict, Verdict::Low);
    assert_eq!(result.severity_rank, Some(-1));
}

#[test]
fn test_higher_is_better_reads_favorably() {
    let table: ThresholdTable = [
        ("Ferritin", band(Some(15.0), 30.0, 400.0, Some(450.0))),
        ("Creatine Kinase", band(None, 50.0, 300.0, Some(450.0))),
    ]
    .into_iter()
    .collect();
    let rules = PolarityRules::default();

    assert_eq!(classify_value("Ferritin", 500.0, &table, &rules).verdict, Verdict::Excellent);
    assert_eq!(classify_value("Ferritin", 420.0, &table, &rules).verdict, Verdict::Good);
    assert_eq!(classify_value("Creatine Kinase", 500.0, &table, &rules).verdict, Verdict::SevereHigh);
    assert_eq!(classify_value("Ferritin", 10.0, &table, &rules).verdict, Verdict::SevereLow);
}

#[test]
fn test_classification_is_total() {
    let engine = engine();
    for cell in [
        CellValue::Null,
        CellValue::Number(f64::NAN),
        CellValue::Text("pending".into()),
        CellValue::Text(String::new()),
    ] {
        let result = engine.classify("Ferritin", &cell, Sex::Male);
        assert_eq!(result.verdict, Verdict::Missing);
        assert_eq!(result.severity_rank, None);
    }
    assert_eq!(engine.classify("Unknown Marker", &42.0.into(), Sex::Male).verdict, Verdict::Missing);
}

#[test]
fn test_monotone_along_tiers() {
    let rules = PolarityRules::default();
    let table: ThresholdTable = [("Glucose", band(Some(2.8), 3.9, 6.1, Some(7.0)))].into_iter().collect();

    let mut previous = i8::MIN;
    for step in 0..=100 {
        let value = f64::from(step) * 0.1;
        let rank = classify_value("Glucose", value, &table, &rules)
            .severity_rank
            .unwrap();
        assert!(rank >= previous, "rank fell at {value}");
        previous = rank;
    }
    assert_eq!(previous, 2);
}

#[test]
fn test_sex_specific_bundled_ranges() {
    let engine = engine();
    // 120 g/L is low for men and normal for women
    assert_eq!(engine.classify("Hemoglobin", &120.0.into(), Sex::Male).verdict, Verdict::Low);
    assert_eq!(engine.classify("Hemoglobin", &120.0.into(), Sex::Female).verdict, Verdict::Normal);
    assert_eq!(
        engine.thresholds(Sex::Female).get("Serum Iron").map(ThresholdBand::normal_range_display),
        Some("210.0-430.0".to_string())
    );
}

#[test]
fn test_override_table_round_trip() {
    let columns = ReferenceColumns::default();
    let table = Table::from_rows(
        [
            columns.indicator.as_str(),
            columns.sex.as_str(),
            columns.severe_low.as_str(),
            columns.low.as_str(),
            columns.normal.as_str(),
            columns.high.as_str(),
            columns.severe_high.as_str(),
        ],
        vec![
            vec!["Ferritin".into(), "common".into(), "< 15".into(), "15-30".into(), "30-400".into(), "400-450".into(), "> 450".into()],
            vec!["Ferritin".into(), "female".into(), CellValue::Null, "-".into(), "20-200".into(), CellValue::Null, CellValue::Null],
        ],
    )
    .unwrap();

    let ranges = ReferenceRanges::from_table(&table, &columns).unwrap();
    let male = ranges.for_sex(Sex::Male).get("Ferritin").unwrap();
    assert_eq!(male.severe_low_1, Some(15.0));
    assert_eq!(male.high_1, Some(450.0));
    let female = ranges.for_sex(Sex::Female).get("Ferritin").unwrap();
    assert_eq!((female.low_2, female.high_2, female.high_1), (Some(20.0), Some(200.0), None));
    assert_eq!(RangeSpec::parse("30-400"), RangeSpec::new(Some(30.0), Some(400.0)));
}
