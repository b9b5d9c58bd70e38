//! Composite join keys

use crate::config::DateFormatConfig;
use crate::models::table::CellValue;
use crate::utils::date_utils::cell_to_date_string;

/// Join key `"{subject}_{date}"` for one row
///
/// Dates are normalised with the default format so that a date cell and its
/// textual spelling produce the same key. Rows lacking either part have no key.
#[must_use]
pub fn composite_key(name: &CellValue, date: &CellValue, config: &DateFormatConfig) -> Option<String> {
    let name = name.as_text()?;
    let date = cell_to_date_string(date, config)?;
    Some(format!("{name}_{date}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_date_spellings_share_a_key() {
        let config = DateFormatConfig::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let from_date = composite_key(&" A ".into(), &date.into(), &config);
        let from_text = composite_key(&"A".into(), &"2024/03/01".into(), &config);
        assert_eq!(from_date.as_deref(), Some("A_2024-03-01"));
        assert_eq!(from_date, from_text);
    }

    #[test]
    fn test_missing_parts() {
        let config = DateFormatConfig::default();
        assert_eq!(composite_key(&CellValue::Null, &"2024-03-01".into(), &config), None);
        assert_eq!(composite_key(&"A".into(), &CellValue::Null, &config), None);
        assert_eq!(
            composite_key(&"A".into(), &"Week 3".into(), &config).as_deref(),
            Some("A_Week 3")
        );
    }
}
