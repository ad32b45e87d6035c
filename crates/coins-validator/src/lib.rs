//! COINS validation profiles
//!
//! This crate reads the profile DSL that bundles validation and inference
//! rules for COINS containers:
//! - line scanning and value unquoting (Scanner)
//! - rule block construction (Builder)
//! - profile parsing (Parser)
//! - bundled and on-disk profile files (Resources)
//! - the name → profile catalog (Registry)

pub mod scanner;
pub mod model;
pub mod builder;
pub mod parser;
pub mod resources;
pub mod registry;
pub mod config;

// Re-exports
pub use scanner::{LineScanner, unquote};
pub use model::{Profile, ValidationQuery, InferenceQuery};
pub use parser::{ProfileParser, ParseOptions, ParseReport, TopLevelIoPolicy};
pub use resources::{ResourceProvider, BundledResources, DirectoryResources};
pub use registry::ProfileRegistry;
pub use config::RegistryConfig;

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("The profile with name \"{0}\" is not registered")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProfileError {
    /// True for the errors that reject the profile text itself
    pub fn is_invalid_profile(&self) -> bool {
        matches!(self, ProfileError::InvalidProfile(_))
    }
}
