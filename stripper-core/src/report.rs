//! Run report generation.
//!
//! A report is a snapshot of a [`RunAggregator`] taken when a build run
//! finishes. It renders to the plain-text log format below and can be
//! written to a log directory as `ShaderStripLog_<date><suffix>.log`.
//!
//! ```text
//! Build Duration: 1520ms
//! Shader Stripping Duration: 312ms
//! Total shaders included: 1
//! Total shaders stripped: 2
//!
//! ----------...
//!
//! INCLUDED SHADER VARIANTS
//! ...
//! MyShader::ForwardBase::Forward [1 variants | 1 combinations]
//! 	 <no keywords>
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::aggregator::{PassLogEntry, RunAggregator};
use crate::StripError;

const SEPARATOR_WIDTH: usize = 100;
const NO_KEYWORDS: &str = "<no keywords>";

/// Kind of build a run belongs to; selects the report file suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BuildKind {
    #[default]
    Player,
    AssetBundles,
}

impl BuildKind {
    pub fn from_asset_bundle_flag(is_asset_bundle_build: bool) -> Self {
        if is_asset_bundle_build {
            Self::AssetBundles
        } else {
            Self::Player
        }
    }

    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Player => "_Build",
            Self::AssetBundles => "_AssetBundles",
        }
    }
}

/// Headline numbers of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BuildStats {
    pub build_duration: Duration,
    pub strip_duration: Duration,
    pub total_included: usize,
    pub total_stripped: usize,
}

impl BuildStats {
    pub fn from_aggregator(aggregator: &RunAggregator) -> Self {
        Self {
            build_duration: aggregator.build_time(),
            strip_duration: aggregator.strip_time(),
            total_included: aggregator.total_included(),
            total_stripped: aggregator.total_stripped(),
        }
    }
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Build Duration: {}ms", self.build_duration.as_millis())?;
        writeln!(f, "Shader Stripping Duration: {}ms", self.strip_duration.as_millis())?;
        writeln!(f, "Total shaders included: {}", self.total_included)?;
        write!(f, "Total shaders stripped: {}", self.total_stripped)
    }
}

/// Which detail lines the report lists under each pass summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ReportOptions {
    pub log_included_variants: bool,
    pub log_stripped_variants: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            log_included_variants: true,
            log_stripped_variants: false,
        }
    }
}

/// Snapshot of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RunReport {
    pub stats: BuildStats,
    pub kind: BuildKind,
    pub options: ReportOptions,
    /// Pass entries in first-seen order.
    pub passes: Vec<(String, PassLogEntry)>,
}

impl RunReport {
    pub fn generate(aggregator: &RunAggregator, options: ReportOptions, kind: BuildKind) -> Self {
        Self {
            stats: BuildStats::from_aggregator(aggregator),
            kind,
            options,
            passes: aggregator
                .entries()
                .map(|(key, entry)| (key.to_owned(), entry.clone()))
                .collect(),
        }
    }

    /// Whether no pass was processed during the run.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Renders the report, one log line per element.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.stats.to_string().lines().map(str::to_owned).collect();
        lines.push(String::new());
        self.push_section(
            &mut lines,
            "INCLUDED SHADER VARIANTS",
            self.options.log_included_variants,
            |entry| (entry.include_count, &entry.include_variants),
        );
        lines.push(String::new());
        self.push_section(
            &mut lines,
            "STRIPPED SHADER VARIANTS",
            self.options.log_stripped_variants,
            |entry| (entry.strip_count, &entry.strip_variants),
        );
        lines
    }

    fn push_section<'a, F>(&'a self, lines: &mut Vec<String>, title: &str, details: bool, select: F)
    where
        F: Fn(&'a PassLogEntry) -> (usize, &'a std::collections::BTreeSet<String>),
    {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        lines.push(separator.clone());
        lines.push(String::new());
        lines.push(title.to_owned());
        lines.push(String::new());
        lines.push(separator);
        lines.push(String::new());

        for (key, entry) in &self.passes {
            let (count, signatures) = select(entry);
            if count == 0 {
                continue;
            }
            lines.push(format!(
                "{key} [{count} variants | {} combinations]",
                signatures.len()
            ));
            if details {
                for signature in signatures {
                    let shown = if signature.trim().is_empty() {
                        NO_KEYWORDS
                    } else {
                        signature.as_str()
                    };
                    lines.push(format!("\t {shown}"));
                }
                lines.push(String::new());
            }
        }
    }

    /// The full report text.
    pub fn render(&self) -> String {
        let mut text = self.lines().join("\n");
        text.push('\n');
        text
    }

    /// Report file name for a run finished on `date`.
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!(
            "ShaderStripLog_{}{}.log",
            date.format("%Y-%m-%d"),
            self.kind.file_suffix()
        )
    }

    /// Writes the report into `dir`, named after today's local date.
    ///
    /// Nothing is written for an empty report.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` with the written file.
    /// * `Ok(None)` if the report was empty.
    ///
    /// # Errors
    ///
    /// Returns `StripError::Report` if the directory or file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<Option<PathBuf>, StripError> {
        self.save_dated(dir, Local::now().date_naive())
    }

    /// Like [`RunReport::save`], with an explicit date for the file name.
    pub fn save_dated(&self, dir: &Path, date: NaiveDate) -> Result<Option<PathBuf>, StripError> {
        if self.is_empty() {
            log::debug!("Nothing was logged; skipping report");
            return Ok(None);
        }
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(date));
        fs::write(&path, self.render())?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stripper_rules::PassType;
    use tempfile::tempdir;

    fn sample() -> RunAggregator {
        let mut agg = RunAggregator::new();
        let slot = agg.slot(&RunAggregator::pass_key("MyShader", PassType::ForwardBase, "Forward"));
        agg.record(slot, String::new(), true);
        agg.record(slot, "FOG_EXP".into(), false);
        agg.record(slot, "FOG_EXP INSTANCING_ON".into(), false);
        let slot = agg.slot(&RunAggregator::pass_key("Other", PassType::ShadowCaster, ""));
        agg.record(slot, "A".into(), true);
        agg
    }

    #[test]
    fn test_report_layout() {
        let report = RunReport::generate(&sample(), ReportOptions::default(), BuildKind::Player);
        let lines = report.lines();
        let separator = "-".repeat(100);

        assert!(lines[0].starts_with("Build Duration: "));
        assert!(lines[1].starts_with("Shader Stripping Duration: "));
        assert_eq!(lines[2], "Total shaders included: 2");
        assert_eq!(lines[3], "Total shaders stripped: 2");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], separator);
        assert_eq!(lines[7], "INCLUDED SHADER VARIANTS");
        assert_eq!(lines[9], separator);
        assert_eq!(lines[11], "MyShader::ForwardBase::Forward [1 variants | 1 combinations]");
        assert_eq!(lines[12], "\t <no keywords>");
        assert_eq!(lines[13], "");
        assert_eq!(lines[14], "Other::ShadowCaster:: [1 variants | 1 combinations]");
        assert_eq!(lines[15], "\t A");

        let stripped = lines.iter().position(|l| l == "STRIPPED SHADER VARIANTS").unwrap();
        // Stripped details are off by default, and "Other" stripped nothing.
        assert_eq!(
            &lines[stripped + 4..],
            ["MyShader::ForwardBase::Forward [2 variants | 2 combinations]"]
        );
    }

    #[test]
    fn test_stripped_details() {
        let options = ReportOptions {
            log_included_variants: false,
            log_stripped_variants: true,
        };
        let report = RunReport::generate(&sample(), options, BuildKind::Player);
        let text = report.render();
        assert!(text.contains("\t FOG_EXP\n\t FOG_EXP INSTANCING_ON\n"));
        assert!(!text.contains("<no keywords>"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_file_name_suffix() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let agg = sample();
        let player = RunReport::generate(&agg, ReportOptions::default(), BuildKind::Player);
        let bundles = RunReport::generate(&agg, ReportOptions::default(), BuildKind::AssetBundles);
        assert_eq!(player.file_name(date), "ShaderStripLog_2024-03-09_Build.log");
        assert_eq!(bundles.file_name(date), "ShaderStripLog_2024-03-09_AssetBundles.log");
    }

    #[test]
    fn test_save_writes_file_and_skips_empty() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("Logs");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let empty = RunReport::generate(&RunAggregator::new(), ReportOptions::default(), BuildKind::Player);
        assert_eq!(empty.save_dated(&logs, date).unwrap(), None);
        assert!(!logs.exists());

        let report = RunReport::generate(&sample(), ReportOptions::default(), BuildKind::Player);
        let path = report.save_dated(&logs, date).unwrap().unwrap();
        assert_eq!(path, logs.join("ShaderStripLog_2024-03-09_Build.log"));
        assert_eq!(fs::read_to_string(path).unwrap(), report.render());
    }
}
