use crate::catalog::VariantCatalog;
use crate::formats::{validate_settings, FormatParser};
use crate::types::StripperSettings;
use crate::LoadError;
use ron::ser::PrettyConfig;

/// A parser implementation for RON (Rusty Object Notation) configuration files.
#[derive(Debug, Default, Clone, Copy)]
pub struct RonFormatParser;

impl RonFormatParser {
    /// Creates a new RON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for RonFormatParser {
    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    fn parse_settings(&self, content: &str) -> Result<StripperSettings, LoadError> {
        let settings: StripperSettings = ron::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))?;
        validate_settings(settings)
    }

    fn parse_catalog(&self, content: &str) -> Result<VariantCatalog, LoadError> {
        ron::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("RON deserialization failed: {e}")))
    }

    fn write_catalog(&self, catalog: &VariantCatalog) -> Result<String, LoadError> {
        ron::ser::to_string_pretty(catalog, PrettyConfig::default())
            .map_err(|e| LoadError::ParseError(format!("RON serialization failed: {e}")))
    }
}

/// Parses stripper settings defined in a RON string.
pub fn parse_ron_settings(ron_content: &str) -> Result<StripperSettings, LoadError> {
    RonFormatParser::new().parse_settings(ron_content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleParams, StringMatchType};

    #[test]
    fn test_parse_minimal_settings_uses_defaults() {
        let settings = parse_ron_settings("()").unwrap();
        assert!(settings.rules.is_empty());
        assert!(settings.log_included_variants);
        assert!(!settings.log_stripped_variants);
        assert!(settings.process_always_included_shaders);
        assert_eq!(settings.log_path, None);
    }

    #[test]
    fn test_parse_rule_list() {
        let content = r#"
            (
                log_stripped_variants: true,
                rules: [
                    (
                        description: "no fog",
                        rule: StripKeywords((strip_fog_variants: true)),
                    ),
                    (
                        enabled: false,
                        rule: StripShaderName((
                            shader_names: [
                                (match_type: StartsWith, pattern: "Legacy", ignore_case: true),
                            ],
                        )),
                    ),
                    (rule: StripHiddenShaders),
                ],
            )
        "#;
        let settings = parse_ron_settings(content).unwrap();
        assert!(settings.log_stripped_variants);
        assert_eq!(settings.rules.len(), 3);
        assert_eq!(settings.rules[0].description, "no fog");
        assert!(settings.rules[0].enabled);
        match &settings.rules[0].rule {
            RuleParams::StripKeywords(params) => {
                assert!(params.strip_fog_variants);
                assert!(!params.strip_vr_variants);
            }
            other => panic!("Expected StripKeywords, got {other:?}"),
        }
        assert!(!settings.rules[1].enabled);
        match &settings.rules[1].rule {
            RuleParams::StripShaderName(params) => {
                assert_eq!(params.shader_names[0].match_type, StringMatchType::StartsWith);
                assert!(params.shader_names[0].ignore_case);
            }
            other => panic!("Expected StripShaderName, got {other:?}"),
        }
        assert_eq!(settings.rules[2].rule, RuleParams::StripHiddenShaders);
    }

    #[test]
    fn test_parse_rejects_exclusive_rules() {
        let content = "(rules: [(rule: IncludeHiddenShaders), (rule: StripHiddenShaders)])";
        assert!(matches!(
            parse_ron_settings(content),
            Err(LoadError::ExclusiveRule(_, _))
        ));
    }

    #[test]
    fn test_parse_invalid_syntax() {
        let result = parse_ron_settings("(rules: [");
        match result {
            Err(LoadError::ParseError(msg)) => assert!(msg.contains("RON deserialization failed")),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }
}
