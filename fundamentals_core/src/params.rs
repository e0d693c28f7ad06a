//! Runtime parameter store
//!
//! A sorted key-value map of JSON values shared by a context and every node
//! built on it. Parameters can be loaded from and saved to YAML.

use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Scheduler loop frequency in Hz
pub const TICK_RATE_HZ: &str = "tick_rate_hz";
/// Keep-last depth of each topic buffer
pub const TOPIC_CAPACITY: &str = "topic_capacity";
/// Default per-node logging switch
pub const ENABLE_LOGGING: &str = "enable_logging";

/// Shared runtime parameters
#[derive(Clone)]
pub struct RuntimeParams {
    params: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl RuntimeParams {
    /// Create a parameter store holding the defaults
    pub fn new() -> Self {
        let store = Self {
            params: Arc::new(RwLock::new(BTreeMap::new())),
        };
        store.set_defaults();
        store
    }

    /// Defaults overlaid with the contents of a YAML file
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let store = Self::new();
        store.load_from_disk(path)?;
        Ok(store)
    }

    fn set_defaults(&self) {
        let mut params = self.params.write();
        params.insert(TICK_RATE_HZ.to_string(), Value::from(100));
        params.insert(TOPIC_CAPACITY.to_string(), Value::from(10));
        params.insert(ENABLE_LOGGING.to_string(), Value::from(true));
    }

    /// Get a parameter value
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let params = self.params.read();
        let value = params.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Get parameter with default
    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get_or(key, default)
    }

    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.get_or(key, default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_or(key, default)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get_or(key, default.to_string())
    }

    /// Set a parameter value
    pub fn set<T: Serialize>(&self, key: &str, value: T) -> CoreResult<()> {
        let json_value = serde_json::to_value(value)?;
        self.params.write().insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.params.write().remove(key)
    }

    pub fn list_keys(&self) -> Vec<String> {
        self.params.read().keys().cloned().collect()
    }

    pub fn get_all(&self) -> BTreeMap<String, Value> {
        self.params.read().clone()
    }

    /// Clear everything and restore the defaults
    pub fn reset(&self) {
        self.params.write().clear();
        self.set_defaults();
    }

    /// Merge a YAML mapping into the store; keys in the file win
    pub fn load_from_disk(&self, path: &Path) -> CoreResult<()> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Parameter file not found: {}",
                path.display()
            )));
        }

        let yaml_str = std::fs::read_to_string(path)?;
        let loaded: BTreeMap<String, Value> = serde_yaml::from_str(&yaml_str)?;

        let mut params = self.params.write();
        params.extend(loaded);
        log::debug!("Loaded parameters from {}", path.display());
        Ok(())
    }

    /// Save parameters to a YAML file
    pub fn save_to_disk(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&*self.params.read())?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

impl Default for RuntimeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuntimeParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.params.read().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let params = RuntimeParams::new();

        // Defaults
        assert_eq!(params.get_u64(TICK_RATE_HZ, 0), 100);
        assert_eq!(params.get_u64(TOPIC_CAPACITY, 0), 10);
        assert!(params.get_bool(ENABLE_LOGGING, false));

        params.set("test_value", 42.5).unwrap();
        assert_eq!(params.get::<f64>("test_value"), Some(42.5));

        params.set(TICK_RATE_HZ, 20).unwrap();
        assert_eq!(params.get_u64(TICK_RATE_HZ, 0), 20);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let params = RuntimeParams::new();
        params.set("extra", "value").unwrap();
        params.remove(TOPIC_CAPACITY);
        assert!(!params.has(TOPIC_CAPACITY));

        params.reset();
        assert!(!params.has("extra"));
        assert_eq!(params.get_u64(TOPIC_CAPACITY, 0), 10);
    }

    #[test]
    fn test_clones_share_storage() {
        let params = RuntimeParams::new();
        let other = params.clone();
        other.set("shared", true).unwrap();
        assert!(params.get_bool("shared", false));
    }

    #[test]
    fn test_wrong_type_falls_back_to_default() {
        let params = RuntimeParams::new();
        params.set("name", "talker").unwrap();
        assert_eq!(params.get_u64("name", 7), 7);
        assert_eq!(params.get_string("name", ""), "talker");
    }
}
