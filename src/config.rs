//! Store configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! key_prefix = "myapp"
//! view_throttle_secs = 10
//! codec = "json"
//!
//! [seeds.featured-001]
//! view_count = 1250
//! like_count = 89
//! save_count = 34
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::codec::CodecFormat;
use crate::error::StoreError;
use crate::interaction::SeedTable;

/// Default minimum gap between two counted views of the same item.
pub const DEFAULT_VIEW_THROTTLE_SECS: u64 = 10;

/// Default prefix for persisted namespace keys.
pub const DEFAULT_KEY_PREFIX: &str = "engagement";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix for every namespace key written to the substrate.
    pub key_prefix: String,
    /// Throttling window for `record_view`, in seconds.
    pub view_throttle_secs: u64,
    /// Serialized form of namespace tables.
    pub codec: CodecFormat,
    /// Non-zero starting values for featured items.
    pub seeds: SeedTable,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            view_throttle_secs: DEFAULT_VIEW_THROTTLE_SECS,
            codec: CodecFormat::default(),
            seeds: SeedTable::featured(),
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, StoreError> {
        toml::from_str(input).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_seeds(mut self, seeds: SeedTable) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_codec(mut self, codec: CodecFormat) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_view_throttle_secs(mut self, secs: u64) -> Self {
        self.view_throttle_secs = secs;
        self
    }

    /// The throttling window as a duration.
    pub fn view_throttle(&self) -> Duration {
        // Clamped so the conversion to chrono's signed milliseconds cannot overflow.
        let secs = self.view_throttle_secs.min(u64::from(u32::MAX));
        Duration::seconds(secs as i64)
    }
}
