use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use stripper_core::StripperSettings;

use crate::error::AppError;

/// Default location of the optional application config file.
pub const DEFAULT_CONFIG_FILE: &str = "shader-stripper.toml";
/// Prefix of environment variables that override the config file.
pub const ENV_PREFIX: &str = "SHADER_STRIPPER_";

/// Log level for everything except per-variant decisions.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Log level for the per-variant decision log. Strips are logged at `trace`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecisionLogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
}

/// Configuration for the shader stripper application.
#[derive(Parser, Debug)]
#[command(name = "shader-stripper", author, version, about, long_about = None)]
pub struct AppConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Log level for the application and libraries.
    #[arg(long = "log-level", value_enum, default_value_t = GlobalLogLevel::Info, global = true)]
    pub global_log_level: GlobalLogLevel,

    /// Log level for individual keep/strip decisions.
    #[arg(long, value_enum, default_value_t = DecisionLogLevel::Warn, global = true)]
    pub decision_log_level: DecisionLogLevel,

    /// Optional TOML file with report settings.
    #[arg(long = "config", value_name = "FILE", default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config_file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a recorded build manifest through the stripping rules.
    Strip(StripArgs),
    /// Combine reference catalogs into one validated catalog.
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
pub struct StripArgs {
    /// Stripper settings (RON or JSON).
    #[arg(short, long, value_name = "FILE")]
    pub settings: PathBuf,

    /// Recorded build manifest (JSON).
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Directory to write the run report to.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// List kept keyword combinations in the report.
    #[arg(long, value_name = "BOOL")]
    pub log_included_variants: Option<bool>,

    /// List stripped keyword combinations in the report.
    #[arg(long, value_name = "BOOL")]
    pub log_stripped_variants: Option<bool>,

    /// Treat the run as an asset bundle build.
    #[arg(long, default_value_t = false)]
    pub asset_bundles: bool,

    /// Treat the run as a development build.
    #[arg(long, default_value_t = false)]
    pub development: bool,

    /// Number of worker threads evaluating passes.
    #[arg(short, long, env = "SHADER_STRIPPER_JOBS", default_value_t = 1)]
    pub jobs: usize,

    /// Write the manifest with only the kept variants.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the run report as JSON.
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Catalogs to combine (RON or JSON). Missing files count as empty.
    #[arg(required = true, value_name = "CATALOG")]
    pub inputs: Vec<PathBuf>,

    /// Build manifest describing the shaders to validate against.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Merged catalog destination; the extension selects the format.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

/// Report settings that can be set outside the stripper settings file.
///
/// Layered as: stripper settings ← config file ← `SHADER_STRIPPER_*`
/// environment ← command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOverrides {
    pub log_dir: Option<PathBuf>,
    pub log_included_variants: Option<bool>,
    pub log_stripped_variants: Option<bool>,
}

impl ReportOverrides {
    /// The config file and environment layers.
    pub fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extracts the config file and environment layers, then applies `args`.
    pub fn load(config_file: &Path, args: &StripArgs) -> Result<Self, AppError> {
        let mut overrides: Self = Self::figment(config_file)
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if args.log_dir.is_some() {
            overrides.log_dir.clone_from(&args.log_dir);
        }
        if args.log_included_variants.is_some() {
            overrides.log_included_variants = args.log_included_variants;
        }
        if args.log_stripped_variants.is_some() {
            overrides.log_stripped_variants = args.log_stripped_variants;
        }
        Ok(overrides)
    }

    /// Writes the values that are set into `settings`.
    pub fn apply(&self, settings: &mut StripperSettings) {
        if let Some(dir) = &self.log_dir {
            settings.log_path = Some(dir.clone());
        }
        if let Some(value) = self.log_included_variants {
            settings.log_included_variants = value;
        }
        if let Some(value) = self.log_stripped_variants {
            settings.log_stripped_variants = value;
        }
    }
}
