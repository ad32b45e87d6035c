//! Registry configuration

use crate::parser::{ParseOptions, TopLevelIoPolicy};
use crate::ProfileError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the registry looks for profile files and how it reads them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// File extension that marks a profile; a leading dot is ignored
    pub extension: String,

    /// Load the profiles compiled into the library
    pub include_bundled: bool,

    /// Extra directories scanned during initialization
    pub profile_dirs: Vec<PathBuf>,

    /// Handling of read failures between rule blocks
    pub top_level_io: TopLevelIoPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            extension: "profile".to_string(),
            include_bundled: true,
            profile_dirs: Vec::new(),
            top_level_io: TopLevelIoPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        serde_json::from_str(json).map_err(|e| ProfileError::Config(e.to_string()))
    }

    pub fn with_profile_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profile_dirs.push(dir.into());
        self
    }

    pub fn without_bundled(mut self) -> Self {
        self.include_bundled = false;
        self
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions { top_level_io: self.top_level_io }
    }

    /// True if `name` carries the profile extension
    pub fn matches(&self, name: &str) -> bool {
        let extension = self.extension.trim_start_matches('.');
        name.strip_suffix(extension)
            .map(|stem| stem.ends_with('.'))
            .unwrap_or(false)
    }
}
