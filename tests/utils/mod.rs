use bloodwork::models::sheet::{Cadence, Sheet};
use bloodwork::{CellValue, Engine, EngineConfig, Table};
use chrono::NaiveDate;

/// Calendar date shorthand
#[must_use]
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Header labels, `None` for blank cells
#[must_use]
pub fn labels(items: &[Option<&str>]) -> Vec<Option<String>> {
    items.iter().map(|item| item.map(str::to_string)).collect()
}

/// Engine with default settings and bundled tables
#[must_use]
pub fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

/// Monthly panel: two male athletes and one female athlete
#[must_use]
pub fn monthly_table() -> Table {
    Table::from_rows(
        ["No.", "Name", "Sex", "Test Date", "Hemoglobin", "Ferritin", "Creatine Kinase", "Cortisol"],
        vec![
            vec![1.0.into(), "A".into(), "male".into(), "2024-01-05".into(), 150.0.into(), 50.0.into(), 200.0.into(), 10.0.into()],
            vec![2.0.into(), "B".into(), "male".into(), "2024-01-05".into(), 140.0.into(), 60.0.into(), 400.0.into(), 20.0.into()],
            vec![3.0.into(), "C".into(), "female".into(), "2024-01-05".into(), 120.0.into(), 70.0.into(), 150.0.into(), 30.0.into()],
            vec![4.0.into(), "A".into(), "male".into(), "2024-02-05".into(), 155.0.into(), 80.0.into(), 900.0.into(), 12.0.into()],
            vec![CellValue::Null; 8],
        ],
    )
    .expect("monthly fixture is rectangular")
}

/// Quarterly sheet with a grouped two-row header
#[must_use]
pub fn quarterly_sheet() -> Sheet {
    Sheet::with_grouped_header(
        Cadence::Quarterly,
        labels(&[Some("Name"), Some("Unnamed: 1_level_0"), Some("Unnamed: 2_level_0"), None, None]),
        labels(&[None, Some("Test Date"), Some("Serum Iron"), Some("Ferritin"), None]),
        vec![
            vec!["A".into(), ymd(2024, 1, 5).into(), 300.0.into(), 55.0.into(), "note".into()],
            vec!["C".into(), "2024/01/05".into(), 150.0.into(), 65.0.into(), CellValue::Null],
        ],
    )
}

/// Yearly sheet
#[must_use]
pub fn yearly_sheet() -> Sheet {
    Sheet::new(
        Cadence::Yearly,
        ["Athlete", "Date", "Age", "Testosterone"],
        vec![vec!["B".into(), "2024-01-05".into(), 24.0.into(), 650.0.into()]],
    )
}
