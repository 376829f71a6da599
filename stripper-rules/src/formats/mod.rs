//! Module defining parsers for the supported configuration file formats.

// Export the core parser trait
pub mod parser;
pub use parser::FormatParser;

// Format-specific implementations
pub mod json_format;
pub mod ron_format;

pub use json_format::JsonFormatParser;
pub use ron_format::RonFormatParser;

use crate::registry::RuleList;
use crate::types::StripperSettings;
use crate::LoadError;

/// Re-checks registry constraints on a freshly deserialized settings file.
///
/// Files can be edited by hand, so a duplicated "allow once" rule or a pair of
/// mutually exclusive rules is rejected here exactly as it would be when added
/// through [`RuleList::push`].
pub(crate) fn validate_settings(settings: StripperSettings) -> Result<StripperSettings, LoadError> {
    RuleList::try_from(settings.rules.clone())?;
    Ok(settings)
}
