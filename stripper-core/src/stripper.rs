use std::path::PathBuf;

use log::{debug, info, warn};
use stripper_rules::{StripperSettings, VariantCatalog};

use crate::aggregator::RunAggregator;
use crate::engine::{DecisionEngine, PassOutcome};
use crate::host::{CompilerData, ShaderHost, ShaderSnippet};
use crate::report::{BuildKind, ReportOptions, RunReport};
use crate::rules::BuildContext;
use crate::variant::ShaderRef;
use crate::StripError;

/// Configuration of a [`ShaderStripper`].
#[derive(Debug, Clone, Default)]
pub struct StripperConfig {
    pub settings: StripperSettings,
    pub build_context: BuildContext,
    pub is_development_build: bool,
}

impl StripperConfig {
    /// Creates a new builder for `StripperConfig`.
    pub fn builder() -> StripperConfigBuilder {
        StripperConfigBuilder::default()
    }

    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            log_included_variants: self.settings.log_included_variants,
            log_stripped_variants: self.settings.log_stripped_variants,
        }
    }
}

/// Builder for `StripperConfig`.
#[derive(Debug, Default)]
pub struct StripperConfigBuilder {
    settings: StripperSettings,
    base_dir: Option<PathBuf>,
    extra_catalogs: Vec<VariantCatalog>,
    is_development_build: bool,
}

impl StripperConfigBuilder {
    /// Sets the rule list and report toggles.
    pub fn settings(mut self, settings: StripperSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the directory relative catalog paths are resolved against.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Adds an in-memory catalog for every catalog rule.
    pub fn extra_catalog(mut self, catalog: VariantCatalog) -> Self {
        self.extra_catalogs.push(catalog);
        self
    }

    /// Overrides the report directory from the settings.
    pub fn log_path(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.settings.log_path = dir;
        }
        self
    }

    /// Selects the development keyword exclusion lists.
    pub fn development_build(mut self, is_development_build: bool) -> Self {
        self.is_development_build = is_development_build;
        self
    }

    pub fn build(self) -> StripperConfig {
        StripperConfig {
            settings: self.settings,
            build_context: BuildContext {
                base_dir: self.base_dir,
                extra_catalogs: self.extra_catalogs,
            },
            is_development_build: self.is_development_build,
        }
    }
}

/// Drives one build run: prepare, per-pass processing, finalize.
///
/// The aggregator lives here rather than in global state, so independent
/// strippers can run side by side.
#[derive(Debug)]
pub struct ShaderStripper {
    config: StripperConfig,
    engine: Option<DecisionEngine>,
    aggregator: RunAggregator,
    build_kind: BuildKind,
}

impl ShaderStripper {
    pub fn new(config: StripperConfig) -> Self {
        Self {
            config,
            engine: None,
            aggregator: RunAggregator::new(),
            build_kind: BuildKind::Player,
        }
    }

    /// Starts a build run.
    ///
    /// Builds and initializes the enabled rules and resets the aggregator.
    /// Without enabled rules stripping stays off for the run and every
    /// variant passes through untouched.
    ///
    /// # Errors
    ///
    /// Returns the `StripError` of the first rule that could not be built or
    /// initialized. Stripping is disabled for the run in that case.
    pub fn prepare(
        &mut self,
        host: &dyn ShaderHost,
        is_asset_bundle_build: bool,
    ) -> Result<(), StripError> {
        self.engine = None;
        self.aggregator.reset();
        self.build_kind = BuildKind::from_asset_bundle_flag(is_asset_bundle_build);

        let mut engine = DecisionEngine::from_settings(
            &self.config.settings,
            &self.config.build_context,
            self.config.is_development_build,
        )?;
        if engine.rule_count() == 0 {
            info!("No shader stripping rules are enabled; stripping is disabled for this build");
            return Ok(());
        }
        engine.initialize(host)?;
        info!(
            "Shader stripping enabled with {} rule(s) ({:?} build)",
            engine.rule_count(),
            self.build_kind
        );
        self.engine = Some(engine);
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    /// The engine of the current run, for evaluating passes on worker threads.
    pub fn engine(&self) -> Option<&DecisionEngine> {
        self.engine.as_ref()
    }

    pub fn aggregator(&self) -> &RunAggregator {
        &self.aggregator
    }

    /// Host callback: filters the candidates of one shader pass in place.
    pub fn on_process_variants(
        &mut self,
        host: &dyn ShaderHost,
        shader: ShaderRef,
        snippet: &ShaderSnippet,
        candidates: &mut Vec<CompilerData>,
    ) -> PassOutcome {
        match &self.engine {
            Some(engine) => {
                engine.process_variants(host, shader, snippet, candidates, &mut self.aggregator)
            }
            None => PassOutcome {
                kept: candidates.len(),
                stripped: 0,
            },
        }
    }

    /// Folds a worker's aggregator into the run.
    pub fn absorb(&mut self, shard: RunAggregator) {
        self.aggregator.merge(shard);
    }

    /// Ends the build run.
    ///
    /// Writes the report when a log directory is configured and something was
    /// recorded, then resets the aggregator. Failing to write the report is
    /// logged and otherwise ignored.
    ///
    /// # Returns
    ///
    /// The run report, or `None` if stripping was disabled for the run.
    pub fn finalize(&mut self) -> Option<RunReport> {
        self.engine.as_ref()?;

        let report = RunReport::generate(
            &self.aggregator,
            self.config.report_options(),
            self.build_kind,
        );
        info!("{}", report.stats);

        match &self.config.settings.log_path {
            Some(dir) => match report.save(dir) {
                Ok(Some(path)) => info!("Shader strip report written to {}", path.display()),
                Ok(None) => {}
                Err(e) => warn!("Could not write shader strip report to {}: {}", dir.display(), e),
            },
            None => debug!("No log directory configured; skipping report"),
        }

        self.aggregator.reset();
        Some(report)
    }
}
