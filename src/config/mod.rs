//! Configuration for the indicator engine.
//!
//! Everything the engine would otherwise treat as ambient session state lives
//! here and is passed explicitly into the entry points.

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Deserialize;

use crate::error::Result;

/// Configuration for date format handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// Format used for date strings in composite keys and `DateStr`
    pub default_format: String,
    /// Enable heuristic format detection
    pub enable_format_detection: bool,
    /// Interpret plain numbers as spreadsheet serial dates
    pub accept_serial_dates: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2024-01-15
                "%Y/%m/%d".to_string(), // 2024/01/15
                "%Y.%m.%d".to_string(), // 2024.01.15
                "%d-%m-%Y".to_string(), // European: 15-01-2024
                "%m/%d/%Y".to_string(), // US: 01/15/2024
                "%d.%m.%Y".to_string(), // 15.01.2024
                "%Y%m%d".to_string(),   // Compact: 20240115
                "%d %b %Y".to_string(), // 15 Jan 2024
            ],
            default_format: "%Y-%m-%d".to_string(),
            enable_format_detection: true,
            accept_serial_dates: true,
        }
    }
}

/// Tunable parameters for the last-resort similarity match
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FuzzyMatchConfig {
    /// Maximum difference in character length between indicator and column
    pub max_length_delta: usize,
    /// Minimum character-overlap similarity to accept a column
    pub min_similarity: f64,
}

impl Default for FuzzyMatchConfig {
    fn default() -> Self {
        Self {
            max_length_delta: 3,
            min_similarity: 0.8,
        }
    }
}

/// Direction in which an indicator value is clinically favorable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Values above the normal range are favorable
    HigherIsBetter,
    /// Values below the cohort mean are favorable
    LowerIsBetter,
    /// Both tails are adverse
    Neutral,
}

/// Indicator sets that change how verdicts and Z-scores are oriented
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolarityRules {
    /// High-side verdicts become `good` / `excellent` for these indicators
    pub higher_is_better: Vec<String>,
    /// Z-scores are negated for these indicators
    pub lower_is_better: Vec<String>,
}

impl Default for PolarityRules {
    fn default() -> Self {
        Self {
            higher_is_better: vec![
                "Ferritin".to_string(),
                "Hemoglobin".to_string(),
                "Testosterone".to_string(),
                "Free Testosterone".to_string(),
            ],
            lower_is_better: vec![
                "Creatine Kinase".to_string(),
                "Blood Urea Nitrogen".to_string(),
                "High-Sensitivity C-Reactive Protein".to_string(),
                "Cortisol".to_string(),
            ],
        }
    }
}

impl PolarityRules {
    /// Polarity used when classifying against reference thresholds
    #[must_use]
    pub fn classification_polarity(&self, indicator: &str) -> Polarity {
        if self.higher_is_better.iter().any(|name| name == indicator) {
            Polarity::HigherIsBetter
        } else {
            Polarity::Neutral
        }
    }

    /// Whether Z-scores for the indicator are negated
    #[must_use]
    pub fn is_lower_better(&self, indicator: &str) -> bool {
        self.lower_is_better.iter().any(|name| name == indicator)
    }
}

/// Column names of a reference-range override table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReferenceColumns {
    /// Indicator name column
    pub indicator: String,
    /// Sex tag column (`male`, `female` or `common`)
    pub sex: String,
    /// Severe-low threshold column
    pub severe_low: String,
    /// Low range column
    pub low: String,
    /// Normal range column
    pub normal: String,
    /// High range column
    pub high: String,
    /// Severe-high threshold column
    pub severe_high: String,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            indicator: "Indicator".to_string(),
            sex: "Sex".to_string(),
            severe_low: "Severe Low (<X)".to_string(),
            low: "Low (Range)".to_string(),
            normal: "Normal (Range)".to_string(),
            high: "High (Range)".to_string(),
            severe_high: "Severe High (>X)".to_string(),
        }
    }
}

/// Titled group of indicators within a panel theme
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PanelCategory {
    /// Category heading
    pub title: String,
    /// Indicators in display order
    pub indicators: Vec<String>,
}

impl PanelCategory {
    fn new(title: &str, indicators: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            indicators: indicators.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Named latest-test panel made of categories
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PanelTheme {
    /// Theme name
    pub name: String,
    /// Categories in display order
    pub categories: Vec<PanelCategory>,
}

impl PanelTheme {
    /// Every indicator of the theme in order, first occurrence only
    #[must_use]
    pub fn indicators(&self) -> Vec<&str> {
        self.categories
            .iter()
            .flat_map(|category| category.indicators.iter().map(String::as_str))
            .unique()
            .collect()
    }
}

fn default_panel_themes() -> Vec<PanelTheme> {
    vec![
        PanelTheme {
            name: "Key Indicator Summary".to_string(),
            categories: vec![PanelCategory::new(
                "Key Indicators",
                &["Hemoglobin", "Ferritin", "Creatine Kinase", "Testosterone", "Cortisol"],
            )],
        },
        PanelTheme {
            name: "Training Load Tolerance".to_string(),
            categories: vec![
                PanelCategory::new(
                    "Muscle Tolerance to Training Intensity",
                    &["Creatine Kinase", "Creatinine"],
                ),
                PanelCategory::new(
                    "Training Volume Tolerance and Energy Metabolism",
                    &["Blood Urea Nitrogen", "Cortisol", "Blood Glucose"],
                ),
            ],
        },
        PanelTheme {
            name: "Anabolism and Recovery".to_string(),
            categories: vec![
                PanelCategory::new("Anabolic Recovery", &["Testosterone", "Free Testosterone"]),
                PanelCategory::new(
                    "Oxygen Transport",
                    &["Red Blood Cells", "Hemoglobin", "Reticulocyte Percentage"],
                ),
            ],
        },
        PanelTheme {
            name: "Iron Status and Recovery".to_string(),
            categories: vec![PanelCategory::new(
                "Iron Status and Recovery",
                &[
                    "Ferritin",
                    "Hemoglobin",
                    "Mean Corpuscular Volume",
                    "Mean Corpuscular Hemoglobin",
                    "Mean Corpuscular Hemoglobin Concentration",
                    "High-Sensitivity C-Reactive Protein",
                ],
            )],
        },
        PanelTheme {
            name: "Inflammation and Immune Response".to_string(),
            categories: vec![
                PanelCategory::new("Hyperuricemia", &["Uric Acid"]),
                PanelCategory::new(
                    "Immune and Inflammatory Response",
                    &["High-Sensitivity C-Reactive Protein", "White Blood Cells", "Platelets"],
                ),
            ],
        },
    ]
}

/// Configuration for the indicator engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Candidate headers for the subject name column, in priority order
    pub name_columns: Vec<String>,
    /// Candidate headers for the test date column, in priority order
    pub date_columns: Vec<String>,
    /// Candidate headers for the sex column, in priority order
    pub sex_columns: Vec<String>,
    /// Administrative columns never merged as indicators
    pub excluded_columns: Vec<String>,
    /// Canonical subject column added during preparation
    pub canonical_name_column: String,
    /// Canonical parsed-date column added during preparation
    pub canonical_date_column: String,
    /// Canonical formatted-date column added during preparation
    pub canonical_date_str_column: String,
    /// Date parsing
    pub date_format: DateFormatConfig,
    /// First synthetic date assigned when a table has no date column
    pub synthetic_start_date: NaiveDate,
    /// Number of most recent observations per cohort member in a baseline
    pub baseline_window: usize,
    /// Number of most recent test dates in a radar profile
    pub profile_window: usize,
    /// Similarity fallback parameters
    pub fuzzy: FuzzyMatchConfig,
    /// Polarity sets
    pub polarity: PolarityRules,
    /// Reference override column names
    pub reference_columns: ReferenceColumns,
    /// Indicators shown in the latest-test summary
    pub panel_indicators: Vec<String>,
    /// Themed latest-test panels
    pub panel_themes: Vec<PanelTheme>,
    /// Indicators plotted in a radar profile
    pub profile_indicators: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let name_columns = vec![
            "Name".to_string(),
            "Name_final".to_string(),
            "Athlete".to_string(),
            "Athlete Name".to_string(),
        ];
        let date_columns = vec![
            "Test Date".to_string(),
            "Date".to_string(),
            "Start Date".to_string(),
        ];
        let sex_columns = vec!["Sex".to_string(), "Gender".to_string()];

        let mut excluded_columns = Vec::new();
        excluded_columns.extend(name_columns.iter().cloned());
        excluded_columns.extend(date_columns.iter().cloned());
        excluded_columns.extend(sex_columns.iter().cloned());
        excluded_columns.extend(
            [
                "No.",
                "ID",
                "Birth Date",
                "Date of Birth",
                "Age",
                "Height",
                "Weight",
                "Coach",
                "Training Site",
                "Test Phase",
                "Specialty",
                "Event",
                "Team",
                "Remarks",
            ]
            .iter()
            .map(|s| (*s).to_string()),
        );

        Self {
            name_columns,
            date_columns,
            sex_columns,
            excluded_columns,
            canonical_name_column: "Name".to_string(),
            canonical_date_column: "Date".to_string(),
            canonical_date_str_column: "DateStr".to_string(),
            date_format: DateFormatConfig::default(),
            synthetic_start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            baseline_window: 4,
            profile_window: 4,
            fuzzy: FuzzyMatchConfig::default(),
            polarity: PolarityRules::default(),
            reference_columns: ReferenceColumns::default(),
            panel_indicators: vec![
                "Hemoglobin".to_string(),
                "Ferritin".to_string(),
                "Creatine Kinase".to_string(),
                "Testosterone".to_string(),
                "Cortisol".to_string(),
            ],
            panel_themes: default_panel_themes(),
            profile_indicators: vec![
                "Testosterone".to_string(),
                "Cortisol".to_string(),
                "Creatine Kinase".to_string(),
                "Blood Urea Nitrogen".to_string(),
                "Hemoglobin".to_string(),
                "Ferritin".to_string(),
                "White Blood Cells".to_string(),
                "Reticulocyte Percentage".to_string(),
            ],
        }
    }
}

impl EngineConfig {
    /// Load a configuration from JSON; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Panel theme by name
    #[must_use]
    pub fn panel_theme(&self, name: &str) -> Option<&PanelTheme> {
        self.panel_themes.iter().find(|theme| theme.name == name)
    }

    /// Whether a column is administrative and never an indicator
    #[must_use]
    pub fn is_excluded(&self, column: &str) -> bool {
        let column = column.trim();
        self.excluded_columns.iter().any(|excluded| excluded == column)
    }
}
