use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

pub const ALLOW_DEFINITION_OVERRIDING: &str = "FNBEANS_ALLOW_DEFINITION_OVERRIDING";
pub const ALLOW_ALIAS_OVERRIDING: &str = "FNBEANS_ALLOW_ALIAS_OVERRIDING";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Creates a service seeded from the process environment.
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    /// Creates a service with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Reads a boolean flag. Accepts `true/false`, `1/0`, `yes/no` and `on/off`;
    /// anything else is treated as absent.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.get(key)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            other => {
                tracing::warn!("Ignoring unrecognized boolean '{}' for {}", other, key);
                None
            }
        }
    }
}

/// Registry policies of a [`Container`](crate::di::Container).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// Replace an existing definition when a bean name is registered twice.
    pub allow_definition_overriding: bool,
    /// Rebind an alias that already points at another bean.
    pub allow_alias_overriding: bool,
}

impl ContainerSettings {
    pub fn from_config(config: &ConfigService) -> Self {
        let defaults = Self::default();
        Self {
            allow_definition_overriding: config
                .get_bool(ALLOW_DEFINITION_OVERRIDING)
                .unwrap_or(defaults.allow_definition_overriding),
            allow_alias_overriding: config
                .get_bool(ALLOW_ALIAS_OVERRIDING)
                .unwrap_or(defaults.allow_alias_overriding),
        }
    }

    /// Settings taken from the process environment.
    pub fn from_env() -> Self {
        Self::from_config(&ConfigService::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_to_strict() {
        let settings = ContainerSettings::from_config(&ConfigService::empty());
        assert_eq!(settings, ContainerSettings::default());
        assert!(!settings.allow_definition_overriding);
        assert!(!settings.allow_alias_overriding);
    }

    #[test]
    fn test_settings_from_config() {
        let config = ConfigService::empty();
        config.set(ALLOW_DEFINITION_OVERRIDING, "yes");
        config.set(ALLOW_ALIAS_OVERRIDING, "garbage");
        let settings = ContainerSettings::from_config(&config);
        assert!(settings.allow_definition_overriding);
        assert!(!settings.allow_alias_overriding);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: ContainerSettings =
            serde_json::from_str(r#"{"allow_alias_overriding": true}"#).unwrap();
        assert!(settings.allow_alias_overriding);
        assert!(!settings.allow_definition_overriding);
    }
}
