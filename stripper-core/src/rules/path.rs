use stripper_rules::{RuleKind, ShaderPathParams};

use super::{ShaderRule, VariantContext};
use crate::matcher::{compile_all, StringMatcher};
use crate::StripError;

/// Strips shaders whose asset path matches any filter.
///
/// Shaders without an asset path are matched as the empty string.
#[derive(Debug)]
pub struct StripShaderPathRule {
    matchers: Vec<StringMatcher>,
}

impl StripShaderPathRule {
    pub fn new(params: &ShaderPathParams) -> Result<Self, StripError> {
        Ok(Self {
            matchers: compile_all(&params.paths)?,
        })
    }
}

impl ShaderRule for StripShaderPathRule {
    fn kind(&self) -> RuleKind {
        RuleKind::StripShaderPath
    }

    fn should_strip(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        let path = ctx.asset_path().unwrap_or_default();
        Ok(self.matchers.iter().any(|m| m.is_match(path)))
    }
}
