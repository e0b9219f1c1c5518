//! On-chain identifiers the app operates on.
//!
//! These are plain strings here; validation happens when a request is
//! built, so a bad id surfaces as an invalid-argument notification.

use serde::Deserialize;

/// Package of the published shared counter.
pub const DEFAULT_COUNTER_PACKAGE: &str =
    "0x068a952d2a9b01b66c8817dc46b7703653e383d9d00d1c64d7336dcacc4df25b";
/// Shared counter object.
pub const DEFAULT_COUNTER_OBJECT: &str =
    "0x12d4c43c867c68c97c6f6b5ca644096c57dad511a5584ec33883d30315aa6470";
/// Module holding the counter functions.
pub const DEFAULT_COUNTER_MODULE: &str = "shared_counter";
/// Counter struct field holding the count.
pub const DEFAULT_COUNTER_FIELD: &str = "value";
/// Entry function that bumps the counter.
pub const DEFAULT_INCREMENT_FUNCTION: &str = "increment";

/// Entry function that mints coins.
pub const DEFAULT_MINT_FUNCTION: &str = "mint";
/// Field path of the circulating supply on a `TreasuryCap`.
pub const DEFAULT_SUPPLY_FIELD: &str = "total_supply.value";

/// Shared counter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub package_id: String,
    pub module: String,
    pub object_id: String,
    /// Field (or dotted path) holding the displayed value.
    pub field: String,
    pub function: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            package_id: DEFAULT_COUNTER_PACKAGE.to_string(),
            module: DEFAULT_COUNTER_MODULE.to_string(),
            object_id: DEFAULT_COUNTER_OBJECT.to_string(),
            field: DEFAULT_COUNTER_FIELD.to_string(),
            function: DEFAULT_INCREMENT_FUNCTION.to_string(),
        }
    }
}

/// Coin minting configuration. Minting is disabled unless this is present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MintConfig {
    pub package_id: String,
    pub module: String,
    /// `TreasuryCap` object passed as the first argument.
    pub treasury_cap_id: String,
    pub function: String,
    /// Field path re-read from the treasury cap after a mint.
    pub supply_field: String,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            package_id: String::new(),
            module: String::new(),
            treasury_cap_id: String::new(),
            function: DEFAULT_MINT_FUNCTION.to_string(),
            supply_field: DEFAULT_SUPPLY_FIELD.to_string(),
        }
    }
}
