use stripper_rules::{RuleKind, ShaderNameParams};

use super::{ShaderRule, VariantContext};
use crate::matcher::{compile_all, StringMatcher};
use crate::StripError;

/// Include or strip shaders whose name matches any of a set of filters.
#[derive(Debug)]
pub struct ShaderNameRule {
    kind: RuleKind,
    matchers: Vec<StringMatcher>,
}

impl ShaderNameRule {
    /// Keeps variants of shaders matching any filter.
    pub fn include(params: &ShaderNameParams) -> Result<Self, StripError> {
        Ok(Self {
            kind: RuleKind::IncludeShaderName,
            matchers: compile_all(&params.shader_names)?,
        })
    }

    /// Strips variants of shaders matching any filter.
    pub fn strip(params: &ShaderNameParams) -> Result<Self, StripError> {
        Ok(Self {
            kind: RuleKind::StripShaderName,
            matchers: compile_all(&params.shader_names)?,
        })
    }

    fn matches(&self, ctx: &VariantContext<'_>) -> bool {
        self.matchers.iter().any(|m| m.is_match(ctx.shader_name))
    }
}

impl ShaderRule for ShaderNameRule {
    fn kind(&self) -> RuleKind {
        self.kind
    }

    fn should_include(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(self.kind == RuleKind::IncludeShaderName && self.matches(ctx))
    }

    fn should_strip(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(self.kind == RuleKind::StripShaderName && self.matches(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{host, Candidate};
    use stripper_rules::{StringFilter, StringMatchType};

    fn params(filters: Vec<StringFilter>) -> ShaderNameParams {
        ShaderNameParams {
            shader_names: filters,
        }
    }

    #[test]
    fn test_strip_by_name() {
        let host = host();
        let rule = ShaderNameRule::strip(&params(vec![StringFilter::new(
            StringMatchType::StartsWith,
            "Custom/",
        )]))
        .unwrap();
        let water = Candidate::new(&host, "Custom/Water", &[]);
        let standard = Candidate::new(&host, "Standard", &[]);
        assert!(rule.should_strip(&water.ctx(&host)).unwrap());
        assert!(!rule.should_strip(&standard.ctx(&host)).unwrap());
        assert!(!rule.should_include(&water.ctx(&host)).unwrap());
    }

    #[test]
    fn test_include_by_name_any_filter() {
        let host = host();
        let rule = ShaderNameRule::include(&params(vec![
            StringFilter::new(StringMatchType::Equals, "Nope"),
            StringFilter::new(StringMatchType::Wildcard, "stand*").ignoring_case(),
        ]))
        .unwrap();
        let standard = Candidate::new(&host, "Standard", &[]);
        assert!(rule.should_include(&standard.ctx(&host)).unwrap());
        assert!(!rule.should_strip(&standard.ctx(&host)).unwrap());
    }

    #[test]
    fn test_no_filters_never_match() {
        let host = host();
        let rule = ShaderNameRule::strip(&params(Vec::new())).unwrap();
        let water = Candidate::new(&host, "Custom/Water", &[]);
        assert!(!rule.should_strip(&water.ctx(&host)).unwrap());
    }
}
