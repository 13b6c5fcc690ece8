//! Engine timing and storage configuration.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const DEFAULT_REGEN_INTERVAL_MS: u64 = 300;
pub const DEFAULT_BONUS_INTERVAL_MS: u64 = 15_000;
pub const DEFAULT_BONUS_WINDOW_MS: u64 = 3_000;
pub const DEFAULT_BONUS_CLICK_MULTIPLIER: u64 = 10;
pub const DEFAULT_STORAGE_KEY: &str = "brainrot_clicker_save";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period of the battery regeneration tick.
    pub regen_interval_ms: u64,
    /// Period of the bonus event.
    pub bonus_interval_ms: u64,
    /// How long a bonus stays claimable.
    pub bonus_window_ms: u64,
    /// Bonus reward is `click_level * bonus_click_multiplier`.
    pub bonus_click_multiplier: u64,
    /// Name of the persisted-state slot.
    pub storage_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            regen_interval_ms: DEFAULT_REGEN_INTERVAL_MS,
            bonus_interval_ms: DEFAULT_BONUS_INTERVAL_MS,
            bonus_window_ms: DEFAULT_BONUS_WINDOW_MS,
            bonus_click_multiplier: DEFAULT_BONUS_CLICK_MULTIPLIER,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.regen_interval_ms == 0 {
            return Err(GameError::InvalidConfig("regen_interval_ms must be > 0".into()));
        }
        if self.bonus_interval_ms == 0 {
            return Err(GameError::InvalidConfig("bonus_interval_ms must be > 0".into()));
        }
        if self.bonus_window_ms == 0 || self.bonus_window_ms >= self.bonus_interval_ms {
            return Err(GameError::InvalidConfig(
                "bonus_window_ms must be in (0, bonus_interval_ms)".into(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(GameError::InvalidConfig("storage_key is empty".into()));
        }
        Ok(())
    }
}
