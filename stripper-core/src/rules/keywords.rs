use std::collections::HashSet;

use stripper_rules::{KeywordParams, RuleKind};

use super::{ShaderRule, VariantContext};
use crate::matcher::{compile_all, StringMatcher};
use crate::StripError;

/// Single-pass and multi-view stereo rendering.
pub const VR_KEYWORDS: &[&str] = &[
    "UNITY_SINGLE_PASS_STEREO",
    "STEREO_INSTANCING_ON",
    "STEREO_MULTIVIEW_ON",
    "STEREO_CUBEMAP_RENDER_ON",
];
pub const INSTANCING_KEYWORDS: &[&str] = &["INSTANCING_ON"];
pub const FOG_KEYWORDS: &[&str] = &["FOG_LINEAR", "FOG_EXP", "FOG_EXP2"];
pub const LIGHTMAP_KEYWORDS: &[&str] = &[
    "LIGHTMAP_ON",
    "DIRLIGHTMAP_COMBINED",
    "DYNAMICLIGHTMAP_ON",
    "LIGHTMAP_SHADOW_MIXING",
    "SHADOWS_SHADOWMASK",
];
pub const DOTS_KEYWORDS: &[&str] = &["UNITY_DOTS_INSTANCING_ENABLED"];

/// Strips variants that use unwanted keywords.
///
/// A variant is stripped when any of its keywords matches a filter of the
/// list for the current build kind (development or release), or is part of
/// an enabled keyword preset.
#[derive(Debug)]
pub struct StripKeywordsRule {
    development: Vec<StringMatcher>,
    release: Vec<StringMatcher>,
    presets: HashSet<&'static str>,
}

impl StripKeywordsRule {
    pub fn new(params: &KeywordParams) -> Result<Self, StripError> {
        let presets = [
            (params.strip_vr_variants, VR_KEYWORDS),
            (params.strip_lightmap_variants, LIGHTMAP_KEYWORDS),
            (params.strip_fog_variants, FOG_KEYWORDS),
            (params.strip_instancing_variants, INSTANCING_KEYWORDS),
            (params.strip_dots_variants, DOTS_KEYWORDS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .flat_map(|(_, keywords)| keywords.iter().copied())
        .collect();

        Ok(Self {
            development: compile_all(&params.exclude_development_keywords)?,
            release: compile_all(&params.exclude_release_keywords)?,
            presets,
        })
    }
}

impl ShaderRule for StripKeywordsRule {
    fn kind(&self) -> RuleKind {
        RuleKind::StripKeywords
    }

    fn should_strip(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        let filters = if ctx.is_development_build {
            &self.development
        } else {
            &self.release
        };
        Ok(ctx.keywords().iter().any(|keyword| {
            self.presets.contains(keyword.as_str()) || filters.iter().any(|f| f.is_match(keyword))
        }))
    }
}
