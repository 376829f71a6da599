use crate::catalog::VariantCatalog;
use crate::formats::{validate_settings, FormatParser};
use crate::types::StripperSettings;
use crate::LoadError;

/// A parser implementation for JSON configuration files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatParser;

impl JsonFormatParser {
    /// Creates a new JSON format parser
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for JsonFormatParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn parse_settings(&self, content: &str) -> Result<StripperSettings, LoadError> {
        let settings: StripperSettings = serde_json::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        validate_settings(settings)
    }

    fn parse_catalog(&self, content: &str) -> Result<VariantCatalog, LoadError> {
        serde_json::from_str(content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))
    }

    fn write_catalog(&self, catalog: &VariantCatalog) -> Result<String, LoadError> {
        serde_json::to_string_pretty(catalog)
            .map_err(|e| LoadError::ParseError(format!("JSON serialization failed: {e}")))
    }
}
