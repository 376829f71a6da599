//! Core library for the shader variant stripper.
//!
//! Defines variant identity and matching, the rule trait with its concrete
//! rules, the decision engine that folds rule votes into a keep/strip
//! decision, and the run-scoped bookkeeping and report generation.

use thiserror::Error;

// Module declarations (keep public if they contain public items)
/// Per-run counters and keyword-combination sets.
pub mod aggregator;
/// The ordered-rule decision engine.
pub mod engine;
/// Host collaborator interface and a data-driven implementation.
pub mod host;
/// String pattern matching for textual rules.
pub mod matcher;
/// Reference catalog combination and validation.
pub mod merge;
/// Reference variant index used by catalog rules.
pub mod reference;
/// Run report generation and persistence.
pub mod report;
/// The rule trait and all concrete rules.
pub mod rules;
/// Build lifecycle: prepare, process, finalize.
pub mod stripper;
/// Variant identity and keyword sets.
pub mod variant;

// Re-export core public items
pub use crate::aggregator::{PassLogEntry, PassSlot, RunAggregator};
pub use crate::engine::{Decision, DecisionEngine, PassOutcome};
pub use crate::host::{CompilerData, ShaderHost, ShaderSnippet, StaticHost, StaticShader};
pub use crate::matcher::{is_match, StringMatcher};
pub use crate::merge::merge_catalogs;
pub use crate::reference::{ReferenceMatch, VariantReferenceIndex};
pub use crate::report::{BuildKind, BuildStats, ReportOptions, RunReport};
pub use crate::rules::{BuildContext, ConfiguredRule, ShaderRule, VariantContext};
pub use crate::stripper::{ShaderStripper, StripperConfig, StripperConfigBuilder};
pub use crate::variant::{KeywordSet, ShaderRef, ShaderVariant};

pub use stripper_rules::{
    CompilerPlatform, GraphicsTier, LoadError, PassType, RuleConfig, RuleKind, RuleParams,
    StringFilter, StringMatchType, StripperSettings, VariantCatalog,
};

/// Errors that can occur while building rules, evaluating variants or
/// writing run reports.
#[derive(Error, Debug)]
pub enum StripError {
    /// A regular expression (or a translated wildcard) failed to compile.
    #[error("Invalid match pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// A catalog rule was queried before `initialize` ran.
    #[error("Rule '{0}' was used before it was initialized")]
    RuleNotInitialized(&'static str),
    /// Loading a reference catalog source failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] LoadError),
    /// The host could not answer a query about a shader.
    #[error("Host error: {0}")]
    Host(String),
    /// Writing the run report failed.
    #[error("Report I/O error: {0}")]
    Report(#[from] std::io::Error),
}
