use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use bloodwork::{Engine, Workbook};
use log::{info, warn};

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: bloodwork <workbook.json> [subject]");
    };
    let wanted = args.next();

    let start = Instant::now();
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read workbook {}", path.display()))?;
    let workbook = Workbook::from_json_str(&json)
        .with_context(|| format!("Failed to parse workbook {}", path.display()))?;

    let config = workbook.config.clone().unwrap_or_default();
    let engine = Engine::with_reference_override(config, workbook.reference_ranges.as_ref());

    let outcome = engine
        .fuse_sheets(&workbook.primary, &workbook.secondary)
        .context("Primary sheet is malformed")?;
    for skipped in &outcome.report.skipped {
        warn!("Sheet '{}' was not merged: {}", skipped.label, skipped.reason);
    }

    let observations = engine
        .prepare(outcome.table)
        .context("Failed to prepare the fused table")?;
    info!(
        "Prepared {} observations in {:?}",
        observations.len(),
        start.elapsed()
    );

    let subjects = match wanted {
        Some(subject) => vec![subject],
        None => observations.subjects(),
    };

    for subject in &subjects {
        let Some(summary) = engine.summary(&observations, subject) else {
            warn!("No observations for subject '{subject}'");
            continue;
        };

        println!("{} ({})", summary.subject, summary.date);
        for row in &summary.rows {
            println!(
                "  {:<40} {:>10} {:>14}  {}",
                row.indicator, row.display_value, row.normal_range, row.classification.verdict
            );
        }
        if !summary.missing.is_empty() {
            println!("  not found: {}", summary.missing.join(", "));
        }
    }

    Ok(())
}
