use bloodwork::{
    Engine, Sex, Verdict, Workbook, record_batch_to_table, table_to_record_batch,
};

use crate::utils::{engine, monthly_table, quarterly_sheet, ymd, yearly_sheet};

fn prepared(engine: &Engine) -> bloodwork::Observations {
    let outcome = engine.fuse(monthly_table(), &[quarterly_sheet(), yearly_sheet()]);
    engine.prepare(outcome.table).unwrap()
}

#[test]
fn test_latest_panel_for_subject() {
    let engine = engine();
    let observations = prepared(&engine);

    assert_eq!(observations.len(), 4);
    assert_eq!(observations.subjects(), vec!["A", "B", "C"]);

    let summary = engine.summary(&observations, "A").unwrap();
    assert_eq!(summary.date, ymd(2024, 2, 5));
    assert!(summary.missing.is_empty());

    let verdicts: Vec<(&str, Verdict)> = summary
        .rows
        .iter()
        .map(|row| (row.indicator.as_str(), row.classification.verdict))
        .collect();
    assert_eq!(
        verdicts,
        vec![
            ("Hemoglobin", Verdict::Normal),
            ("Ferritin", Verdict::Normal),
            ("Creatine Kinase", Verdict::SevereHigh),
            ("Testosterone", Verdict::Missing),
            ("Cortisol", Verdict::Normal),
        ]
    );
    assert_eq!(summary.rows[1].display_value, "80.00");
    assert_eq!(summary.rows[3].display_value, "—");
    assert_eq!(summary.rows[0].normal_range, "130.0-175.0");
    assert_eq!(summary.flagged().count(), 1);
}

#[test]
fn test_missing_indicators_are_reported() {
    let engine = engine();
    let observations = prepared(&engine);
    let summary = engine
        .summary_for(&observations, "C", &["Serum Iron", "Uric Acid"])
        .unwrap();

    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0].classification.verdict, Verdict::Low);
    assert_eq!(summary.missing, vec!["Uric Acid".to_string()]);
}

#[test]
fn test_themed_panels() {
    let engine = engine();
    let observations = prepared(&engine);

    let themes = engine.theme_summaries(&observations, "A");
    let names: Vec<&str> = themes.iter().map(|theme| theme.theme.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Key Indicator Summary",
            "Training Load Tolerance",
            "Anabolism and Recovery",
            "Iron Status and Recovery",
            "Inflammation and Immune Response",
        ]
    );

    let key = &themes[0];
    assert_eq!(key.date, ymd(2024, 2, 5));
    assert_eq!(key.categories.len(), 1);
    let flat = engine.summary(&observations, "A").unwrap();
    assert_eq!(key.categories[0].rows, flat.rows);

    let inflammation = engine
        .theme_summary(&observations, "A", "Inflammation and Immune Response")
        .unwrap();
    assert_eq!(inflammation.categories.len(), 2);
    assert_eq!(inflammation.categories[0].title, "Hyperuricemia");
    assert!(inflammation.categories[0].rows.is_empty());
    assert!(inflammation.missing.contains(&"Uric Acid".to_string()));

    assert!(engine.theme_summary(&observations, "A", "No Such Theme").is_none());
    assert!(engine.theme_summaries(&observations, "Nobody").is_empty());
}

#[test]
fn test_trend_and_profile() {
    let engine = engine();
    let observations = prepared(&engine);

    let trend = engine
        .trend(&observations, "Ferritin", &["A", "B"], (None, None), Sex::Male)
        .unwrap();
    assert_eq!(trend.dates, vec![ymd(2024, 1, 5), ymd(2024, 2, 5)]);
    assert_eq!(trend.series[0].points.len(), 2);
    assert_eq!(trend.series[1].points.len(), 1);
    assert_eq!(trend.normal_band, Some((30.0, 400.0)));

    let profile = engine.profile(&observations, "A", &["A", "B", "C"]).unwrap();
    assert_eq!(profile.indicators.len(), 8);
    assert_eq!(profile.snapshots.len(), 2);
    assert!(profile.axis_limit >= 2.5);

    let bun = profile
        .indicators
        .iter()
        .position(|name| name == "Blood Urea Nitrogen")
        .unwrap();
    let ck = profile
        .indicators
        .iter()
        .position(|name| name == "Creatine Kinase")
        .unwrap();
    assert!(profile.inverted[ck]);
    let latest = profile.latest().unwrap();
    assert_eq!(latest.date, ymd(2024, 2, 5));
    assert_eq!(latest.z_scores[bun], 0.0);
    // Highest CK in the cohort reads unfavorably
    assert!(latest.z_scores[ck] < 0.0);
}

#[test]
fn test_arrow_interchange_of_prepared_table() {
    let engine = engine();
    let observations = prepared(&engine);

    let batch = table_to_record_batch(observations.table()).unwrap();
    assert_eq!(batch.num_rows(), observations.len());

    let back = record_batch_to_table(&batch).unwrap();
    assert_eq!(back.columns(), observations.table().columns());
    assert_eq!(back.value(0, "Date"), observations.table().value(0, "Date"));
}

#[test]
fn test_workbook_with_reference_override() {
    let json = r#"{
        "primary": {
            "label": "monthly",
            "cadence": "monthly_weekly",
            "headers": [["Name", "Sex", "Test Date", "Ferritin"]],
            "rows": [["A", "female", "2024-01-05", 25.0]]
        },
        "secondary": [{
            "label": "quarterly",
            "cadence": "quarterly",
            "headers": [["Name", "Test Date", "Serum Iron"]],
            "rows": [["A", "2024-01-05", 300.0]]
        }],
        "reference_ranges": {
            "columns": ["Indicator", "Sex", "Severe Low (<X)", "Low (Range)", "Normal (Range)", "High (Range)", "Severe High (>X)"],
            "rows": [
                ["Ferritin", "common", "< 10", "10-30", "30-300", "300-400", "> 400"],
                ["Serum Iron", "common", "-", "-", "210-430", "-", "-"]
            ]
        }
    }"#;

    let workbook = Workbook::from_json_str(json).unwrap();
    let engine = Engine::with_reference_override(
        workbook.config.clone().unwrap_or_default(),
        workbook.reference_ranges.as_ref(),
    );
    assert_eq!(engine.ranges().version(), "override");

    let outcome = engine
        .fuse_sheets(&workbook.primary, &workbook.secondary)
        .unwrap();
    let observations = engine.prepare(outcome.table).unwrap();
    let summary = engine
        .summary_for(&observations, "A", &["Ferritin", "Serum Iron"])
        .unwrap();

    assert_eq!(summary.rows[0].classification.verdict, Verdict::Low);
    assert_eq!(summary.rows[1].classification.verdict, Verdict::Normal);
}
