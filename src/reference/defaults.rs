//! Bundled default reference ranges
//!
//! Rows follow the override-table layout: indicator, sex tag, then the five
//! textual range cells (severe low, low, normal, high, severe high).

/// Version of the bundled reference table
pub const DEFAULT_REFERENCE_VERSION: &str = "2025.1";

/// Default reference rows
pub const DEFAULT_REFERENCE_ROWS: &[[&str; 7]] = &[
    ["Hemoglobin", "male", "< 110", "110-130", "130-175", "175-190", "> 190"],
    ["Hemoglobin", "female", "< 100", "100-115", "115-150", "150-165", "> 165"],
    ["Ferritin", "male", "< 15", "15-30", "30-400", "400-500", "> 500"],
    ["Ferritin", "female", "< 10", "10-20", "20-200", "200-300", "> 300"],
    ["Serum Iron", "common", "< 150", "150-210", "210-430", "430-450", "> 450"],
    ["Creatine Kinase", "male", "-", "-", "50-300", "300-800", "> 800"],
    ["Creatine Kinase", "female", "-", "-", "40-200", "200-600", "> 600"],
    ["Testosterone", "male", "< 200", "200-300", "300-1000", "1000-1200", "> 1200"],
    ["Testosterone", "female", "-", "< 15", "15-70", "70-100", "> 100"],
    ["Free Testosterone", "male", "< 3", "3-5", "5-21", "21-25", "> 25"],
    ["Free Testosterone", "female", "-", "-", "0.1-0.85", "0.85-1.2", "> 1.2"],
    ["Cortisol", "common", "< 3", "3-5", "5-23", "23-30", "> 30"],
    ["Blood Urea Nitrogen", "male", "-", "-", "2.9-8.2", "8.2-10", "> 10"],
    ["Blood Urea Nitrogen", "female", "-", "-", "2.6-7.5", "7.5-9", "> 9"],
    ["Glucose", "common", "< 2.8", "2.8-3.9", "3.9-6.1", "6.1-7.0", "> 7.0"],
    ["Creatinine", "male", "-", "-", "57-111", "111-133", "> 133"],
    ["Creatinine", "female", "-", "-", "41-81", "81-100", "> 100"],
    ["Uric Acid", "male", "-", "-", "208-428", "428-480", "> 480"],
    ["Uric Acid", "female", "-", "-", "155-357", "357-420", "> 420"],
    ["High-Sensitivity C-Reactive Protein", "common", "-", "-", "0-3", "3-10", "> 10"],
    ["White Blood Cells", "common", "< 2.5", "2.5-3.5", "3.5-9.5", "9.5-12", "> 12"],
    ["Red Blood Cells", "male", "< 3.5", "3.5-4.3", "4.3-5.8", "5.8-6.5", "> 6.5"],
    ["Red Blood Cells", "female", "< 3.2", "3.2-3.8", "3.8-5.1", "5.1-5.8", "> 5.8"],
    ["Platelets", "common", "< 80", "80-125", "125-350", "350-450", "> 450"],
    ["Reticulocyte Percentage", "common", "-", "-", "0.5-1.5", "1.5-2.5", "> 2.5"],
    ["Mean Corpuscular Volume", "common", "-", "-", "82-100", "100-110", "> 110"],
    ["Mean Corpuscular Hemoglobin", "common", "-", "-", "27-34", "34-36", "> 36"],
    ["Mean Corpuscular Hemoglobin Concentration", "common", "-", "-", "316-354", "354-370", "> 370"],
];
