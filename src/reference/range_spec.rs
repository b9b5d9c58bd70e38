//! Textual range parsing
//!
//! Reference sheets encode bounds as free text: `"210-430"`, `"< 210"`,
//! `"> 500"`, `"36.63"` or `"-"`. Parsing is total; anything that cannot be
//! read degrades to an empty range.

use crate::models::table::CellValue;

/// Two optional bounds; both absent means "no defined range"
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeSpec {
    /// Lower bound, if any
    pub lower: Option<f64>,
    /// Upper bound, if any
    pub upper: Option<f64>,
}

fn parse_number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl RangeSpec {
    /// Range with no bounds
    pub const EMPTY: Self = Self {
        lower: None,
        upper: None,
    };

    /// Range from explicit bounds
    #[must_use]
    pub const fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    /// Parse a textual range
    ///
    /// Leading `<` yields an upper bound only, leading `>` a lower bound only,
    /// `A-B` both bounds, and a bare number a pinned point. Any parse failure
    /// yields [`RangeSpec::EMPTY`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text == "-" {
            return Self::EMPTY;
        }

        if let Some(rest) = text.strip_prefix('<') {
            return parse_number(rest).map_or(Self::EMPTY, |upper| {
                Self::new(None, Some(upper))
            });
        }

        if let Some(rest) = text.strip_prefix('>') {
            return parse_number(rest).map_or(Self::EMPTY, |lower| {
                Self::new(Some(lower), None)
            });
        }

        if text.contains('-') {
            let parts: Vec<&str> = text.split('-').collect();
            if parts.len() == 2 {
                return match (parse_number(parts[0]), parse_number(parts[1])) {
                    (Some(lower), Some(upper)) => Self::new(Some(lower), Some(upper)),
                    _ => Self::EMPTY,
                };
            }
        }

        parse_number(text).map_or(Self::EMPTY, |value| Self::new(Some(value), Some(value)))
    }

    /// Parse a spreadsheet cell
    ///
    /// Numeric cells are pinned points; dates and missing cells have no range.
    #[must_use]
    pub fn from_cell(cell: &CellValue) -> Self {
        match cell {
            CellValue::Number(n) if n.is_finite() => Self::new(Some(*n), Some(*n)),
            CellValue::Text(text) => Self::parse(text),
            _ => Self::EMPTY,
        }
    }

    /// Whether neither bound is present
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// The lower bound, falling back to the upper one
    #[must_use]
    pub fn lower_or_upper(&self) -> Option<f64> {
        self.lower.or(self.upper)
    }

    /// The upper bound, falling back to the lower one
    #[must_use]
    pub fn upper_or_lower(&self) -> Option<f64> {
        self.upper.or(self.lower)
    }
}
