//! Engine configuration

use crate::game::{OutputMode, VerbosityLevel, DEFAULT_MAX_AUTOMATIC_ACTIONS};
use crate::{MtgError, Result};
use serde::{Deserialize, Serialize};

/// Tunable limits and logging settings for a game
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub starting_life: i32,
    pub land_plays_per_turn: u8,
    pub opening_hand_size: usize,
    /// Automatic actions one engine run may apply before the kill switch trips
    pub max_automatic_actions: usize,
    pub verbosity: VerbosityLevel,
    pub output_mode: OutputMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            starting_life: 20,
            land_plays_per_turn: 1,
            opening_hand_size: 7,
            max_automatic_actions: DEFAULT_MAX_AUTOMATIC_ACTIONS,
            verbosity: VerbosityLevel::Normal,
            output_mode: OutputMode::Stdout,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.land_plays_per_turn == 0 {
            return Err(MtgError::InvalidConfig(
                "land_plays_per_turn must be at least 1".to_string(),
            ));
        }
        if self.max_automatic_actions == 0 {
            return Err(MtgError::InvalidConfig(
                "max_automatic_actions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.starting_life, 20);
        assert_eq!(config.opening_hand_size, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(r#"{"starting_life": 30, "verbosity": "verbose"}"#).unwrap();
        assert_eq!(config.starting_life, 30);
        assert_eq!(config.verbosity, VerbosityLevel::Verbose);
        assert_eq!(config.land_plays_per_turn, 1);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"land_plays_per_turn": 0}"#),
            Err(MtgError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"bogus": 1}"#),
            Err(MtgError::Json(_))
        ));
    }
}
