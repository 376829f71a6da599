use crate::catalog::VariantCatalog;
use crate::types::StripperSettings;
use crate::LoadError;

/// Trait defining the interface for format-specific configuration parsers.
///
/// Implementors read stripper settings and reference catalogs from one
/// concrete text format (RON, JSON, ...), and write catalogs back out.
pub trait FormatParser {
    /// Parses stripper settings and validates the rule list constraints.
    ///
    /// # Errors
    ///
    /// * `LoadError::ParseError` if the content is not valid for this format.
    /// * `LoadError::DuplicateRule` / `LoadError::ExclusiveRule` if the rule list
    ///   violates the registry constraints.
    fn parse_settings(&self, content: &str) -> Result<StripperSettings, LoadError>;

    /// Parses a reference variant catalog.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::ParseError` if the content is not valid for this format.
    fn parse_catalog(&self, content: &str) -> Result<VariantCatalog, LoadError>;

    /// Serializes a catalog into this format.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::ParseError` if serialization fails.
    fn write_catalog(&self, catalog: &VariantCatalog) -> Result<String, LoadError>;

    /// Returns a descriptive name for this parser format.
    ///
    /// This can be used for debugging, logging, or user-facing error messages.
    fn format_name(&self) -> &'static str;
}
