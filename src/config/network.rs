//! Fullnode endpoint configuration.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::ConfigError;

/// Network used when none is configured.
pub const DEFAULT_NETWORK: &str = "testnet";

/// Well-known public fullnode endpoints.
pub const WELL_KNOWN_ENDPOINTS: &[(&str, &str)] = &[
    ("devnet", "https://fullnode.devnet.sui.io:443"),
    ("testnet", "https://fullnode.testnet.sui.io:443"),
    ("mainnet", "https://fullnode.mainnet.sui.io:443"),
    ("localnet", "http://127.0.0.1:9000"),
];

/// Which endpoint to talk to.
///
/// `endpoints` entries override or extend [`WELL_KNOWN_ENDPOINTS`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Name of the active network.
    pub active: String,
    /// Extra or overriding name -> URL entries.
    pub endpoints: BTreeMap<String, String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            active: DEFAULT_NETWORK.to_string(),
            endpoints: BTreeMap::new(),
        }
    }
}

impl NetworkConfig {
    /// URL of the active network.
    pub fn resolve(&self) -> Result<String, ConfigError> {
        self.url_for(&self.active).ok_or_else(|| {
            ConfigError::UnknownNetwork(self.active.clone(), self.known_networks().join(", "))
        })
    }

    /// URL for a network name, configured entries first.
    pub fn url_for(&self, name: &str) -> Option<String> {
        if let Some(url) = self.endpoints.get(name) {
            return Some(url.clone());
        }
        WELL_KNOWN_ENDPOINTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, url)| url.to_string())
    }

    /// All network names that resolve, sorted.
    pub fn known_networks(&self) -> Vec<String> {
        let mut names: Vec<String> = WELL_KNOWN_ENDPOINTS
            .iter()
            .map(|(n, _)| n.to_string())
            .chain(self.endpoints.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
