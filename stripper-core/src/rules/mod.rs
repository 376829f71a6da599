//! The rule trait and the factory that turns configuration into rules.
//!
//! Each concrete rule answers up to three questions about a candidate
//! variant. Which of them it answers is declared by its kind in the
//! registry (`RuleKind::descriptor`), and the decision engine only asks
//! the declared ones.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use stripper_rules::{RuleCapabilities, RuleConfig, RuleKind, RuleParams, VariantCatalog};

use crate::host::{CompilerData, ShaderHost, ShaderSnippet};
use crate::variant::ShaderRef;
use crate::StripError;

mod builtin;
mod catalog;
mod keywords;
mod name;
mod passes;
mod path;
mod platform;

pub use builtin::{is_hidden_shader, is_internal_shader, BuiltinShaderRule};
pub use catalog::VariantCatalogRule;
pub use keywords::{
    StripKeywordsRule, DOTS_KEYWORDS, FOG_KEYWORDS, INSTANCING_KEYWORDS, LIGHTMAP_KEYWORDS,
    VR_KEYWORDS,
};
pub use name::ShaderNameRule;
pub use passes::StripPassesRule;
pub use path::StripShaderPathRule;
pub use platform::{StripHardwareTierRule, StripPlatformsRule};

/// Everything a rule may look at when judging one candidate variant.
#[derive(Clone, Copy)]
pub struct VariantContext<'a> {
    pub host: &'a dyn ShaderHost,
    pub shader: ShaderRef,
    /// Display name of `shader`; empty if the host does not know it.
    pub shader_name: &'a str,
    pub snippet: &'a ShaderSnippet,
    pub data: &'a CompilerData,
    /// Whether the player being built is a development build.
    pub is_development_build: bool,
}

impl<'a> VariantContext<'a> {
    /// Active keywords of the candidate, in host order.
    pub fn keywords(&self) -> &'a [String] {
        &self.data.keywords
    }

    /// Asset path of the shader, if it has one.
    pub fn asset_path(&self) -> Option<&'a str> {
        self.host.asset_path(self.shader)
    }
}

impl Debug for VariantContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantContext")
            .field("shader", &self.shader)
            .field("shader_name", &self.shader_name)
            .field("snippet", self.snippet)
            .field("data", self.data)
            .field("is_development_build", &self.is_development_build)
            .finish()
    }
}

/// A configurable filter over shader variants.
///
/// Hooks that a kind does not declare in its [`RuleCapabilities`] are never
/// called, so implementations only override what they declare.
pub trait ShaderRule: Send + Sync + Debug {
    /// The registry kind of this rule.
    fn kind(&self) -> RuleKind;

    /// Hooks this rule takes part in. Defaults to the registry declaration.
    fn capabilities(&self) -> RuleCapabilities {
        self.kind().descriptor().capabilities
    }

    /// Called once per build run, before any variant is evaluated.
    ///
    /// # Errors
    ///
    /// Returns a `StripError` if the rule cannot be made ready, e.g. when a
    /// reference catalog source fails to parse.
    fn initialize(&mut self, _host: &dyn ShaderHost) -> Result<(), StripError> {
        Ok(())
    }

    /// Scope gate: whether this rule has an opinion about the variant at all.
    fn is_applicable(&self, _ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(true)
    }

    /// Include vote.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The candidate variant and the shader pass it belongs to.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the rule wants the variant kept.
    /// * `Err(StripError)` if the rule could not decide; the vote is ignored.
    fn should_include(&self, _ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(false)
    }

    /// Strip vote. A single `Ok(true)` from any applicable rule removes the variant.
    fn should_strip(&self, _ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(false)
    }
}

/// A built rule together with the description it was configured with.
#[derive(Debug)]
pub struct ConfiguredRule {
    pub description: String,
    pub rule: Box<dyn ShaderRule>,
}

impl ConfiguredRule {
    /// Description for logs, falling back to the kind's display name.
    pub fn label(&self) -> &str {
        if self.description.is_empty() {
            self.rule.kind().display_name()
        } else {
            &self.description
        }
    }
}

/// Inputs for turning rule configuration into rules.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Directory relative catalog paths are resolved against, usually the
    /// directory of the settings file.
    pub base_dir: Option<PathBuf>,
    /// Catalogs supplied in memory, consulted by every catalog rule in
    /// addition to its configured files.
    pub extra_catalogs: Vec<VariantCatalog>,
}

impl BuildContext {
    /// Resolves a configured path against `base_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Builds the rule described by `config`.
///
/// # Errors
///
/// Returns `StripError::InvalidPattern` if any of the rule's string filters
/// is malformed.
pub fn build_rule(config: &RuleConfig, ctx: &BuildContext) -> Result<Box<dyn ShaderRule>, StripError> {
    let rule: Box<dyn ShaderRule> = match &config.rule {
        RuleParams::IncludeShaderName(params) => Box::new(ShaderNameRule::include(params)?),
        RuleParams::StripShaderName(params) => Box::new(ShaderNameRule::strip(params)?),
        RuleParams::StripShaderPath(params) => Box::new(StripShaderPathRule::new(params)?),
        RuleParams::StripKeywords(params) => Box::new(StripKeywordsRule::new(params)?),
        RuleParams::StripPlatforms(params) => Box::new(StripPlatformsRule::new(params)),
        RuleParams::StripHardwareTier(params) => Box::new(StripHardwareTierRule::new(params)),
        RuleParams::StripPasses(params) => Box::new(StripPassesRule::new(params)?),
        RuleParams::IncludeInternalShaders
        | RuleParams::StripInternalShaders
        | RuleParams::IncludeHiddenShaders
        | RuleParams::StripHiddenShaders => Box::new(BuiltinShaderRule::new(config.kind())),
        RuleParams::IncludeVariantCatalog(params) => Box::new(VariantCatalogRule::new(params, ctx)),
    };
    Ok(rule)
}

/// Builds every enabled rule of `rules`, in order.
///
/// # Errors
///
/// Fails on the first rule that cannot be built.
pub fn build_rules<'a, I>(rules: I, ctx: &BuildContext) -> Result<Vec<ConfiguredRule>, StripError>
where
    I: IntoIterator<Item = &'a RuleConfig>,
{
    rules
        .into_iter()
        .filter(|config| config.enabled)
        .map(|config| {
            Ok(ConfiguredRule {
                description: config.description.clone(),
                rule: build_rule(config, ctx)?,
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use stripper_rules::{ShaderNameParams, StringFilter, StringMatchType};

    #[test]
    fn test_build_rules_skips_disabled_and_keeps_order() {
        let configs = vec![
            RuleConfig::new(RuleParams::StripHiddenShaders).with_description("hidden"),
            RuleConfig::new(RuleParams::IncludeInternalShaders).disabled(),
            RuleConfig::new(RuleParams::StripShaderName(ShaderNameParams::default())),
        ];
        let rules = build_rules(&configs, &BuildContext::default()).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].rule.kind(), RuleKind::StripHiddenShaders);
        assert_eq!(rules[0].label(), "hidden");
        assert_eq!(rules[1].label(), "Strip Shader Name");
    }

    #[test]
    fn test_build_rule_rejects_bad_regex() {
        let config = RuleConfig::new(RuleParams::IncludeShaderName(ShaderNameParams {
            shader_names: vec![StringFilter::new(StringMatchType::Regex, "[unclosed")],
        }));
        let err = build_rule(&config, &BuildContext::default()).unwrap_err();
        assert!(matches!(err, StripError::InvalidPattern { .. }));
    }

    #[test]
    fn test_resolve_relative_paths() {
        let ctx = BuildContext {
            base_dir: Some(PathBuf::from("project/settings")),
            ..BuildContext::default()
        };
        assert_eq!(
            ctx.resolve(Path::new("catalogs/play.ron")),
            PathBuf::from("project/settings/catalogs/play.ron")
        );
        assert_eq!(BuildContext::default().resolve(Path::new("a.ron")), PathBuf::from("a.ron"));
    }
}
