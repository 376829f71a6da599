use crate::catalog::VariantCatalog;
use crate::formats::{FormatParser, JsonFormatParser, RonFormatParser};
use crate::types::StripperSettings;
use crate::LoadError;
use std::fs;
use std::path::Path;

/// Picks a parser from the file extension (`.ron` or `.json`, case-insensitive).
///
/// # Errors
///
/// Returns `LoadError::UnknownFormat` for any other extension.
pub fn parser_for_path(path: &Path) -> Result<Box<dyn FormatParser>, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("ron") => Ok(Box::new(RonFormatParser::new())),
        Some("json") => Ok(Box::new(JsonFormatParser::new())),
        _ => Err(LoadError::UnknownFormat(path.display().to_string())),
    }
}

/// Loads stripper settings from a specified file.
///
/// # Arguments
///
/// * `path` - The path to the settings file (a RON or JSON file).
///
/// # Returns
///
/// The parsed settings, with the rule list already checked against the
/// registry constraints, or a `LoadError` on failure.
pub fn load_from_file(path: &Path) -> Result<StripperSettings, LoadError> {
    let parser = parser_for_path(path)?;
    let content = fs::read_to_string(path)?;
    log::debug!(
        "Parsing settings {} as {}",
        path.display(),
        parser.format_name()
    );
    parser.parse_settings(&content)
}

/// Loads a reference variant catalog.
///
/// A missing file is not an error: it yields `Ok(None)` so callers can treat
/// the source as empty.
pub fn load_catalog_from_file(path: &Path) -> Result<Option<VariantCatalog>, LoadError> {
    let parser = parser_for_path(path)?;
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    parser.parse_catalog(&content).map(Some)
}

/// Writes a catalog in the format implied by the file extension.
pub fn save_catalog_to_file(path: &Path, catalog: &VariantCatalog) -> Result<(), LoadError> {
    let parser = parser_for_path(path)?;
    let content = parser.write_catalog(catalog)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    log::info!(
        "Wrote catalog with {} shaders / {} variants to {}",
        catalog.shader_count(),
        catalog.variant_count(),
        path.display()
    );
    Ok(())
}
