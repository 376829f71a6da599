use stripper_rules::{PassParams, PassType, RuleKind};

use super::{ShaderRule, VariantContext};
use crate::matcher::StringMatcher;
use crate::StripError;

/// Strips a pass type from the shaders matching each entry's name filter.
#[derive(Debug)]
pub struct StripPassesRule {
    entries: Vec<(StringMatcher, PassType)>,
}

impl StripPassesRule {
    pub fn new(params: &PassParams) -> Result<Self, StripError> {
        let entries = params
            .passes
            .iter()
            .map(|entry| Ok((StringMatcher::new(&entry.shader_name_filter)?, entry.pass_type)))
            .collect::<Result<_, StripError>>()?;
        Ok(Self { entries })
    }
}

impl ShaderRule for StripPassesRule {
    fn kind(&self) -> RuleKind {
        RuleKind::StripPasses
    }

    fn should_strip(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(self.entries.iter().any(|(matcher, pass_type)| {
            *pass_type == ctx.snippet.pass_type && matcher.is_match(ctx.shader_name)
        }))
    }
}
