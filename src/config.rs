use std::collections::HashMap;

use thiserror::Error;

use crate::domain::Decimal;

/// Default max-gain cap in percent of collateral, matching the mirrored
/// protocol's configuration.
const DEFAULT_MAX_GAIN_P: &str = "900";

/// Engine-level defaults a consumer can override through the environment.
#[derive(Debug, Clone)]
pub struct ValuationConfig {
    /// Max gain cap in percent of collateral; None disables the cap.
    /// Used when the snapshot does not carry its own value.
    pub max_gain_p: Option<Decimal>,
    /// Whether PnL evaluation deducts rollover/funding/closing fees.
    pub apply_fees: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for ValuationConfig {
    fn default() -> Self {
        ValuationConfig {
            max_gain_p: Decimal::from_str_canonical(DEFAULT_MAX_GAIN_P).ok(),
            apply_fees: true,
        }
    }
}

impl ValuationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let max_gain_p = match env_map.get("MAX_GAIN_P").map(|s| s.as_str()) {
            None => Decimal::from_str_canonical(DEFAULT_MAX_GAIN_P).ok(),
            Some("uncapped") => None,
            Some(raw) => Some(Decimal::from_str_canonical(raw).map_err(|_| {
                ConfigError::InvalidValue(
                    "MAX_GAIN_P".to_string(),
                    "must be a decimal number or \"uncapped\"".to_string(),
                )
            })?),
        };

        let apply_fees = match env_map.get("APPLY_FEES").map(|s| s.as_str()).unwrap_or("true") {
            "true" => true,
            "false" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "APPLY_FEES".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(ValuationConfig {
            max_gain_p,
            apply_fees,
        })
    }
}
