//! Indicator algorithms
//!
//! Classification against reference bands, cohort-relative Z-scores, and the
//! summary, trend and radar views built on top of them.

pub mod classify;
pub mod profile;
pub mod summary;
pub mod trend;
pub mod zscore;

// Re-export key types
pub use classify::{Classification, Verdict, classify, classify_band, classify_value};
pub use profile::{ProfileSnapshot, RadarProfile, axis_limit, build_profile};
pub use summary::{CategorySummary, IndicatorSummary, SummaryRow, ThemeSummary, format_value};
pub use trend::{SubjectSeries, TrendPoint, TrendSeries, trend_series};
pub use zscore::{BaselineStat, CohortBaseline, ZInterval};
