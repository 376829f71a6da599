use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use stripper_core::RunReport;

use crate::setup::execution::StripSummary;

/// Saves the run report as pretty-printed JSON.
///
/// Unlike the plain-text log, this is written for every run with rules,
/// even when nothing was processed.
pub fn save_summary(report: &RunReport, output_path: &Path) -> Result<()> {
    log::info!("Writing run summary to {:?}...", output_path);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create summary directory: {:?}", parent))?;
    }
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create summary file: {:?}", output_path))?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).context("Failed to serialize run summary")?;
    writeln!(writer)?;
    writer
        .flush()
        .context("Failed to flush writer for summary file")?;

    Ok(())
}

/// Prints the totals of a `strip` run to stdout.
pub fn print_summary(summary: &StripSummary) {
    if !summary.enabled {
        println!("Shader stripping disabled: no enabled rules");
    }
    println!(
        "Passes: {} | Variants kept: {} | Variants stripped: {}",
        summary.passes,
        summary.variants_out,
        summary.variants_in.saturating_sub(summary.variants_out)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use stripper_core::{BuildKind, ReportOptions, RunAggregator, PassType};
    use tempfile::tempdir;

    #[test]
    fn test_summary_is_json() {
        let mut aggregator = RunAggregator::new();
        let key = RunAggregator::pass_key("Lit", PassType::ForwardBase, "Forward");
        let slot = aggregator.slot(&key);
        aggregator.record(slot, "FOG_EXP".to_string(), false);
        let report = RunReport::generate(&aggregator, ReportOptions::default(), BuildKind::Player);

        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/summary.json");
        save_summary(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["stats"]["total_stripped"], 1);
        assert_eq!(value["kind"], "Player");
    }
}
