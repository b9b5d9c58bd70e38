//! A Rust library for resolving, fusing and classifying athlete blood-test
//! indicators across heterogeneous spreadsheet exports.

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod models;
pub mod reference;
pub mod resolve;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{EngineConfig, FuzzyMatchConfig, PanelCategory, PanelTheme, Polarity, PolarityRules};
pub use engine::Engine;
pub use error::{BloodworkError, Result};
pub use models::{Cadence, CellValue, Observations, Sex, Sheet, Table, Workbook};

// Resolution and fusion
pub use fusion::{FusionOutcome, FusionReport, fuse};
pub use resolve::{AliasTable, IndicatorResolver};

// Reference ranges and scoring
pub use algorithm::{
    BaselineStat, Classification, CohortBaseline, IndicatorSummary, RadarProfile, ThemeSummary,
    TrendSeries, Verdict, ZInterval,
};
pub use reference::{RangeSpec, ReferenceRanges, ThresholdBand, ThresholdTable};

// Arrow interchange
pub use arrow::record_batch::RecordBatch;
pub use utils::{record_batch_to_table, table_to_record_batch};
