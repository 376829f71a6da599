use stripper_rules::{
    CompilerPlatform, HardwareTierParams, PlatformParams, PlatformTiers, RuleKind,
};

use super::{ShaderRule, VariantContext};
use crate::StripError;

/// Strips every variant compiled for one of the listed platforms.
#[derive(Debug)]
pub struct StripPlatformsRule {
    platforms: Vec<CompilerPlatform>,
}

impl StripPlatformsRule {
    pub fn new(params: &PlatformParams) -> Self {
        Self {
            platforms: params.platforms.clone(),
        }
    }
}

impl ShaderRule for StripPlatformsRule {
    fn kind(&self) -> RuleKind {
        RuleKind::StripPlatforms
    }

    fn should_strip(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(self.platforms.contains(&ctx.data.platform))
    }
}

/// Strips selected graphics tiers per platform.
///
/// Only the first entry for a platform is consulted.
#[derive(Debug)]
pub struct StripHardwareTierRule {
    platform_tiers: Vec<PlatformTiers>,
}

impl StripHardwareTierRule {
    pub fn new(params: &HardwareTierParams) -> Self {
        Self {
            platform_tiers: params.platform_tiers.clone(),
        }
    }
}

impl ShaderRule for StripHardwareTierRule {
    fn kind(&self) -> RuleKind {
        RuleKind::StripHardwareTier
    }

    fn should_strip(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(self
            .platform_tiers
            .iter()
            .find(|entry| entry.platform == ctx.data.platform)
            .is_some_and(|entry| entry.should_strip(ctx.data.tier)))
    }
}
