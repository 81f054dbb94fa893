//! Configuration system for the APEX simulator.
//!
//! The hardware geometry (register file sizes, queue depths) is fixed in
//! [`crate::common::constants`]; configuration covers the run-level knobs:
//! whether the speculative front end is active, and the forced-termination
//! cycle cap. Supply it as JSON via [`Config::from_json`] or use
//! `Config::default()` for the CLI defaults.

use serde::Deserialize;

/// Default configuration constants for the simulator.
mod defaults {
    /// Hard cap on simulated cycles; the run is force-stopped at this count.
    pub const MAX_CYCLES: u64 = 200;

    /// Branch/call/return prediction is off unless requested.
    pub const PREDICTOR_ENABLED: bool = false;
}

/// Run-level simulator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Enables the BTB, CTP and RAP. When disabled, conditional branches are
    /// always predicted not-taken and calls/returns do not speculate.
    pub predictor_enabled: bool,

    /// Hard cap on simulated cycles (bounded simulation).
    pub max_cycles: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predictor_enabled: defaults::PREDICTOR_ENABLED,
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

impl Config {
    /// Deserializes a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the document is
    /// malformed or contains unknown fields.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = Config::default();
        assert!(!config.predictor_enabled);
        assert_eq!(config.max_cycles, 200);
    }

    #[test]
    fn from_json_overrides_fields() {
        let config = Config::from_json(r#"{"predictor_enabled": true, "max_cycles": 50}"#).unwrap();
        assert!(config.predictor_enabled);
        assert_eq!(config.max_cycles, 50);
    }

    #[test]
    fn from_json_partial_uses_defaults() {
        let config = Config::from_json(r#"{"predictor_enabled": true}"#).unwrap();
        assert!(config.predictor_enabled);
        assert_eq!(config.max_cycles, 200);
    }

    #[test]
    fn from_json_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"btb_size": 64}"#).is_err());
    }
}
