//! Configuration layer for the shader variant stripper.
//!
//! Holds the serializable description of a stripping setup: string filters,
//! the ordered rule list and its registry constraints, the settings file
//! formats, and the reference variant catalogs used by catalog rules.
//! Nothing in here evaluates a variant; that lives in `stripper-core`.

use thiserror::Error;

pub mod catalog;
pub mod formats;
pub mod loader;
pub mod registry;
pub mod types;

pub use catalog::{CatalogShader, CatalogVariant, VariantCatalog};
pub use registry::{RuleCapabilities, RuleDescriptor, RuleKind, RuleList};
pub use types::{
    CatalogParams, CompilerPlatform, GraphicsTier, HardwareTierParams, KeywordParams,
    PassParams, PassStripEntry, PassType, PlatformParams, PlatformTiers, RuleConfig, RuleParams,
    ShaderNameParams, ShaderPathParams, StringFilter, StringMatchType, StripperSettings,
};

/// Errors raised while loading or editing stripper configuration.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration format (e.g., RON/JSON): {0}")]
    ParseError(String),
    #[error("Invalid configuration data: {0}")]
    InvalidData(String),
    /// A rule kind that may only appear once was added a second time.
    #[error("Rule '{0}' can only be added once")]
    DuplicateRule(&'static str),
    /// A rule kind was added while a mutually exclusive kind is present.
    #[error("Rule '{0}' cannot be combined with '{1}'")]
    ExclusiveRule(&'static str, &'static str),
    #[error("Unsupported file format: {0}")]
    UnknownFormat(String),
}
