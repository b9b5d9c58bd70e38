use bloodwork::models::sheet::{Cadence, Sheet};
use bloodwork::{BaselineStat, CohortBaseline, IndicatorResolver, PolarityRules, Sex, Table};

use crate::utils::engine;

fn cohort() -> Table {
    Table::from_rows(
        ["Name", "Ferritin", "Cortisol", "Hemoglobin"],
        vec![
            vec!["A".into(), 50.0.into(), 10.0.into(), 150.0.into()],
            vec!["B".into(), 60.0.into(), 20.0.into(), "n/a".into()],
            vec!["C".into(), 70.0.into(), 30.0.into(), "n/a".into()],
        ],
    )
    .unwrap()
}

#[test]
fn test_ferritin_cohort_z_score() {
    let baseline = CohortBaseline::compute(&cohort(), &["Ferritin"], &IndicatorResolver::default());
    let stat = baseline.stat("Ferritin").unwrap();
    assert_eq!((stat.mean, stat.std_dev, stat.samples), (60.0, 10.0, 3));
    assert_eq!(baseline.zscore("Ferritin", Some(80.0), &PolarityRules::default()), 2.0);
}

#[test]
fn test_lower_is_better_below_mean_is_positive() {
    let baseline = CohortBaseline::compute(&cohort(), &["Cortisol"], &IndicatorResolver::default());
    let z = baseline.zscore("Cortisol", Some(15.0), &PolarityRules::default());
    assert_eq!(z, 0.5);
}

#[test]
fn test_degenerate_cohorts_fall_back_to_unit_spread() {
    let baseline = CohortBaseline::compute(
        &cohort(),
        &["Hemoglobin", "Testosterone"],
        &IndicatorResolver::default(),
    );
    let rules = PolarityRules::default();

    assert_eq!(baseline.stat("Hemoglobin"), Some(&BaselineStat { mean: 150.0, std_dev: 1.0, samples: 1 }));
    assert_eq!(baseline.zscore("Hemoglobin", Some(152.0), &rules), 2.0);
    assert_eq!(baseline.stat("Testosterone").map(|s| (s.mean, s.std_dev)), Some((0.0, 1.0)));
    assert_eq!(baseline.zscore("Testosterone", None, &rules), 0.0);
}

#[test]
fn test_engine_baseline_uses_recent_window() {
    let engine = engine();
    let rows = (1..=6)
        .map(|day| vec!["A".into(), format!("2024-01-0{day}").into(), f64::from(day * 10).into()])
        .collect();
    let sheet = Sheet::new(Cadence::MonthlyWeekly, ["Name", "Date", "Ferritin"], rows);
    let observations = engine.prepare(sheet.to_table().unwrap()).unwrap();

    // Window of 4: 30, 40, 50, 60
    let baseline = engine.baseline(&observations, &["A"], &["Ferritin"]);
    let stat = baseline.stat("Ferritin").unwrap();
    assert_eq!(stat.samples, 4);
    assert_eq!(stat.mean, 45.0);

    let band = engine.normal_band_z(&baseline, "Ferritin", Sex::Male).unwrap();
    assert!(band.lower.unwrap() < band.upper.unwrap());
}
