//! Profile registry
//!
//! Maps profile names to parsed profiles. The registry fills itself from its
//! resource providers the first time any operation touches it; after that,
//! runtime registrations overwrite entries of the same name.

use crate::config::RegistryConfig;
use crate::model::Profile;
use crate::parser::ProfileParser;
use crate::resources::{BundledResources, DirectoryResources, ResourceProvider};
use crate::ProfileError;
use lazy_static::lazy_static;
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

type ProfileMap = BTreeMap<String, Arc<Profile>>;

lazy_static! {
    static ref GLOBAL_REGISTRY: ProfileRegistry = ProfileRegistry::new(RegistryConfig::default());
}

/// Process-wide registry over the bundled profiles
pub fn global() -> &'static ProfileRegistry {
    &GLOBAL_REGISTRY
}

/// Name → profile catalog
pub struct ProfileRegistry {
    config: RegistryConfig,
    parser: ProfileParser,
    providers: Vec<Box<dyn ResourceProvider>>,
    profiles: OnceLock<RwLock<ProfileMap>>,
}

impl ProfileRegistry {
    /// Registry over the providers named by `config`
    pub fn new(config: RegistryConfig) -> Self {
        let mut providers: Vec<Box<dyn ResourceProvider>> = Vec::new();
        if config.include_bundled {
            providers.push(Box::new(BundledResources::coins()));
        }
        for dir in &config.profile_dirs {
            providers.push(Box::new(DirectoryResources::new(dir.clone())));
        }
        Self::with_providers(config, providers)
    }

    /// Registry over explicit providers; `config.include_bundled` and
    /// `config.profile_dirs` are not consulted.
    pub fn with_providers(config: RegistryConfig, providers: Vec<Box<dyn ResourceProvider>>) -> Self {
        let parser = ProfileParser::new(config.parse_options());
        Self {
            config,
            parser,
            providers,
            profiles: OnceLock::new(),
        }
    }

    /// Registry with no resource providers
    pub fn empty() -> Self {
        Self::with_providers(RegistryConfig::default(), Vec::new())
    }

    /// Add a provider; only effective before the first lookup.
    pub fn with_provider(mut self, provider: Box<dyn ResourceProvider>) -> Self {
        if self.is_initialized() {
            warn!("Provider {} added after initialization is ignored", provider.describe());
        } else {
            self.providers.push(provider);
        }
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.profiles.get().is_some()
    }

    /// Profile registered under `name`
    pub fn select(&self, name: &str) -> Result<Arc<Profile>, ProfileError> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    /// Parse a profile from `reader` and register it under its own name.
    ///
    /// A parse failure leaves the registry unchanged.
    pub fn register<R: Read>(&self, reader: R) -> Result<Arc<Profile>, ProfileError> {
        let profile = self.parse_reported(reader, "<runtime registration>")?;
        Ok(self.register_profile(profile))
    }

    /// Register an already-built profile, replacing any entry of that name.
    pub fn register_profile(&self, profile: Profile) -> Arc<Profile> {
        let profile = Arc::new(profile);
        let previous = self.write().insert(profile.name().to_string(), Arc::clone(&profile));
        if previous.is_some() {
            info!("Profile re-registered with this name: {}", profile.name());
        } else {
            info!("Profile registered with this name: {}", profile.name());
        }
        profile
    }

    /// Sorted snapshot of the registered names
    pub fn list(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn map(&self) -> &RwLock<ProfileMap> {
        self.profiles.get_or_init(|| RwLock::new(self.load_bundled()))
    }

    // A poisoned lock still holds a consistent map: every write is a single insert.
    fn read(&self) -> RwLockReadGuard<'_, ProfileMap> {
        self.map().read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProfileMap> {
        self.map().write().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_bundled(&self) -> ProfileMap {
        let mut profiles = ProfileMap::new();

        for provider in &self.providers {
            let names = match provider.list() {
                Ok(names) => names,
                Err(e) => {
                    error!("Could not list profile files in {}: {}", provider.describe(), e);
                    continue;
                }
            };

            for name in names.iter().filter(|name| self.config.matches(name)) {
                match self.load_one(provider.as_ref(), name) {
                    Ok(profile) => {
                        info!("Profile file registered with this name: {}", profile.name());
                        if let Some(previous) = profiles.insert(profile.name().to_string(), Arc::new(profile)) {
                            warn!("Profile {} from {} replaces an earlier file", previous.name(), name);
                        }
                    }
                    Err(e) => {
                        error!("Skipping profile file {} in {}: {}", name, provider.describe(), e);
                    }
                }
            }
        }

        debug!("Profile registry initialized with {} profiles", profiles.len());
        profiles
    }

    fn load_one(&self, provider: &dyn ResourceProvider, name: &str) -> Result<Profile, ProfileError> {
        let stream = provider.open(name)?;
        self.parse_reported(stream, name)
    }

    fn parse_reported<R: Read>(&self, reader: R, source: &str) -> Result<Profile, ProfileError> {
        let report = self.parser.parse_with_report(reader)?;
        if let Some(reason) = &report.interrupted {
            warn!("Profile {} from {} was only partly read: {}", report.profile.name(), source, reason);
        }
        Ok(report.profile)
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl std::fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let providers: Vec<String> = self.providers.iter().map(|p| p.describe()).collect();
        f.debug_struct("ProfileRegistry")
            .field("config", &self.config)
            .field("providers", &providers)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
