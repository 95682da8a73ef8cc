//! Global profile registry for looking up device profiles by name.

use std::sync::RwLock;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::definition::DeviceProfile;
use super::devices;
use crate::error::{ProfileError, Result};

/// Global profile registry.
static REGISTRY: Lazy<RwLock<ProfileRegistry>> = Lazy::new(|| {
    let mut registry = ProfileRegistry::new();
    registry.register_builtin_profiles();
    RwLock::new(registry)
});

/// Registry of device profiles, kept in registration order.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: IndexMap<String, DeviceProfile>,
}

impl ProfileRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            profiles: IndexMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<ProfileRegistry> {
        &REGISTRY
    }

    /// Look up a profile in the global registry and clone it.
    pub fn lookup(name: &str) -> Result<DeviceProfile> {
        Self::global()
            .read()
            .map_err(|_| ProfileError::InvalidDefinition {
                message: "Failed to acquire registry lock".to_string(),
            })?
            .get(name)
            .cloned()
            .ok_or_else(|| {
                ProfileError::UnknownProfile {
                    name: name.to_string(),
                }
                .into()
            })
    }

    fn register_builtin_profiles(&mut self) {
        for profile in [
            devices::generic(),
            devices::ble12::profile(),
            devices::bm78::profile(),
            devices::bt840::profile(),
            devices::expresslink::profile(),
        ] {
            self.profiles.insert(profile.name.clone(), profile);
        }
    }

    /// Register a profile. Names must be unique.
    pub fn register(&mut self, profile: DeviceProfile) -> Result<()> {
        profile.validate()?;
        if self.profiles.contains_key(&profile.name) {
            return Err(ProfileError::AlreadyRegistered {
                name: profile.name.clone(),
            }
            .into());
        }
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Get a profile by name.
    pub fn get(&self, name: &str) -> Option<&DeviceProfile> {
        self.profiles.get(name)
    }

    /// Check if a profile is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// List registered profile names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.profiles.keys()
    }

    /// Get a mutable reference to a profile.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DeviceProfile> {
        self.profiles.get_mut(name)
    }
}
