use stripper_rules::RuleKind;

use super::{ShaderRule, VariantContext};
use crate::StripError;

const HIDDEN_PREFIX: &str = "Hidden/";
const INTERNAL_PREFIX: &str = "Hidden/Internal";

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Built-in or internal shader: no asset path, or a `Hidden/Internal` name.
pub fn is_internal_shader(name: &str, asset_path: Option<&str>) -> bool {
    asset_path.map_or(true, |path| path.trim().is_empty())
        || starts_with_ignore_case(name, INTERNAL_PREFIX)
}

/// Hidden shader as far as stripping is concerned: `Hidden/` but not `Hidden/Internal`.
pub fn is_hidden_shader(name: &str) -> bool {
    starts_with_ignore_case(name, HIDDEN_PREFIX) && !starts_with_ignore_case(name, INTERNAL_PREFIX)
}

/// The four parameterless rules that include or strip internal and hidden shaders.
///
/// They are scoped to their shader family and vote unconditionally inside it.
#[derive(Debug)]
pub struct BuiltinShaderRule {
    kind: RuleKind,
}

impl BuiltinShaderRule {
    /// `kind` must be one of the internal or hidden shader kinds.
    pub fn new(kind: RuleKind) -> Self {
        debug_assert!(matches!(
            kind,
            RuleKind::IncludeInternalShaders
                | RuleKind::StripInternalShaders
                | RuleKind::IncludeHiddenShaders
                | RuleKind::StripHiddenShaders
        ));
        Self { kind }
    }
}

impl ShaderRule for BuiltinShaderRule {
    fn kind(&self) -> RuleKind {
        self.kind
    }

    fn is_applicable(&self, ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(match self.kind {
            RuleKind::IncludeInternalShaders | RuleKind::StripInternalShaders => {
                is_internal_shader(ctx.shader_name, ctx.asset_path())
            }
            // Including is case-sensitive and also covers `Hidden/Internal`.
            RuleKind::IncludeHiddenShaders => ctx.shader_name.starts_with(HIDDEN_PREFIX),
            RuleKind::StripHiddenShaders => is_hidden_shader(ctx.shader_name),
            _ => false,
        })
    }

    fn should_include(&self, _ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(matches!(
            self.kind,
            RuleKind::IncludeInternalShaders | RuleKind::IncludeHiddenShaders
        ))
    }

    fn should_strip(&self, _ctx: &VariantContext<'_>) -> Result<bool, StripError> {
        Ok(matches!(
            self.kind,
            RuleKind::StripInternalShaders | RuleKind::StripHiddenShaders
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{host, Candidate};

    #[test]
    fn test_internal_shader_detection() {
        assert!(is_internal_shader("Standard", None));
        assert!(is_internal_shader("Standard", Some("  ")));
        assert!(is_internal_shader("hidden/internal-Colored", Some("Assets/x.shader")));
        assert!(!is_internal_shader("Custom/Water", Some("Assets/Water.shader")));
    }

    #[test]
    fn test_hidden_shader_detection() {
        assert!(is_hidden_shader("Hidden/Blit"));
        assert!(is_hidden_shader("hidden/blit"));
        assert!(!is_hidden_shader("Hidden/Internal-Colored"));
        assert!(!is_hidden_shader("Hidd"));
        assert!(!is_hidden_shader("Custom/Hidden/Blit"));
    }

    #[test]
    fn test_scope_gates() {
        let host = host();
        let internal = Candidate::new(&host, "Hidden/Internal-Colored", &[]);
        let blit = Candidate::new(&host, "Hidden/Blit", &[]);
        let water = Candidate::new(&host, "Custom/Water", &[]);

        let strip_internal = BuiltinShaderRule::new(RuleKind::StripInternalShaders);
        assert!(strip_internal.is_applicable(&internal.ctx(&host)).unwrap());
        assert!(!strip_internal.is_applicable(&water.ctx(&host)).unwrap());
        assert!(strip_internal.should_strip(&internal.ctx(&host)).unwrap());

        let strip_hidden = BuiltinShaderRule::new(RuleKind::StripHiddenShaders);
        assert!(strip_hidden.is_applicable(&blit.ctx(&host)).unwrap());
        assert!(!strip_hidden.is_applicable(&internal.ctx(&host)).unwrap());

        let include_hidden = BuiltinShaderRule::new(RuleKind::IncludeHiddenShaders);
        assert!(include_hidden.is_applicable(&internal.ctx(&host)).unwrap());
        assert!(include_hidden.should_include(&blit.ctx(&host)).unwrap());
        assert!(!include_hidden.should_strip(&blit.ctx(&host)).unwrap());
    }
}
