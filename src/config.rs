//! Rules configuration.
//!
//! The host keeps world settings in a global key-value registry. Here they
//! are an explicit `RulesConfig` passed into derivation, plus a
//! `SettingsStore` that gives a persistence adapter a narrow get/set
//! surface over raw JSON values.

use crate::error::RulesError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Settings key: whether the armor pool is shown and tracked.
pub const SHOW_ARMOR_POOL: &str = "showArmorPool";
/// Settings key: resource pools the sheet tracks.
pub const TRACKED_RESOURCES: &str = "trackedResources";

const KNOWN_KEYS: [&str; 2] = [SHOW_ARMOR_POOL, TRACKED_RESOURCES];

/// A resource pool on the character sheet.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Health,
    Shield,
    Armor,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Health, Resource::Shield, Resource::Armor];

    pub fn key(self) -> &'static str {
        match self {
            Resource::Health => "health",
            Resource::Shield => "shield",
            Resource::Armor => "armor",
        }
    }
}

/// Raw settings, as persisted by the host.
///
/// # Examples
///
/// ```rust
/// use bnbstat::config::{SettingsStore, SHOW_ARMOR_POOL};
///
/// let mut store = SettingsStore::new();
/// store.set(SHOW_ARMOR_POOL, false).unwrap();
///
/// let shown: Option<bool> = store.get(SHOW_ARMOR_POOL).unwrap();
/// assert_eq!(shown, Some(false));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsStore {
    data: HashMap<String, serde_json::Value>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a known key.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<(), RulesError> {
        if !KNOWN_KEYS.contains(&key) {
            return Err(RulesError::UnknownSetting(key.to_string()));
        }
        let json = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json);
        Ok(())
    }

    /// Read a value. `Ok(None)` if unset; an error if set with the wrong shape.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, RulesError> {
        match self.data.get(key) {
            None => Ok(None),
            Some(v) => serde_json::from_value(v.clone()).map(Some).map_err(|e| {
                RulesError::InvalidSetting {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

/// Typed settings read by derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    pub show_armor_pool: bool,
    pub tracked_resources: Vec<Resource>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            show_armor_pool: true,
            tracked_resources: Resource::ALL.to_vec(),
        }
    }
}

impl RulesConfig {
    /// Build from a store, falling back to defaults for unset keys.
    pub fn from_store(store: &SettingsStore) -> Result<Self, RulesError> {
        let defaults = Self::default();
        Ok(Self {
            show_armor_pool: store
                .get(SHOW_ARMOR_POOL)?
                .unwrap_or(defaults.show_armor_pool),
            tracked_resources: store
                .get(TRACKED_RESOURCES)?
                .unwrap_or(defaults.tracked_resources),
        })
    }

    pub fn write_to(&self, store: &mut SettingsStore) -> Result<(), RulesError> {
        store.set(SHOW_ARMOR_POOL, self.show_armor_pool)?;
        store.set(TRACKED_RESOURCES, &self.tracked_resources)
    }

    /// Resources that are actually shown: armor drops out when its pool is
    /// hidden.
    pub fn active_resources(&self) -> Vec<Resource> {
        self.tracked_resources
            .iter()
            .copied()
            .filter(|r| self.show_armor_pool || *r != Resource::Armor)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_rejected() {
        let mut store = SettingsStore::new();
        assert!(matches!(
            store.set("autoRollDamage", true),
            Err(RulesError::UnknownSetting(_))
        ));
    }

    #[test]
    fn test_wrong_shape_is_error() {
        let mut store = SettingsStore::new();
        store.set(SHOW_ARMOR_POOL, "yes").unwrap();
        assert!(RulesConfig::from_store(&store).is_err());
    }

    #[test]
    fn test_store_round_trip() {
        let config = RulesConfig {
            show_armor_pool: false,
            tracked_resources: vec![Resource::Health, Resource::Armor],
        };
        let mut store = SettingsStore::new();
        config.write_to(&mut store).unwrap();
        assert_eq!(RulesConfig::from_store(&store).unwrap(), config);
        assert_eq!(config.active_resources(), vec![Resource::Health]);
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RulesConfig::from_store(&SettingsStore::new()).unwrap();
        assert_eq!(config, RulesConfig::default());
    }
}
