use stripper_core::StripError;
use stripper_rules::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings or catalog files could not be loaded.
    #[error("Load Error: {0}")]
    Load(#[from] LoadError),

    #[error("Stripper Error: {0}")]
    Strip(#[from] StripError),

    /// The build manifest is malformed.
    #[error("Manifest Error: {0}")]
    Manifest(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
