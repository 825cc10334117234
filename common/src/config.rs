use std::path::Path;

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::money::MoneyPrecision;

const DEFAULT_CONFIG_FILE: &str = "config/lendr.toml";

/// Engine-wide settings shared by every product and application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Decimal places every schedule amount is rounded to.
    #[serde(default = "default_currency_digits")]
    pub currency_digits: u32,
    /// Tolerated rounding residual when checking that a principal fits the currency.
    #[serde(default)]
    pub rounding_epsilon: Decimal,
    /// Day-count basis used to turn annual rates into daily ones.
    #[serde(default = "default_days_in_year")]
    pub days_in_year: u32,
}

fn default_currency_digits() -> u32 {
    2
}

fn default_days_in_year() -> u32 {
    365
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_digits: default_currency_digits(),
            rounding_epsilon: Decimal::ZERO,
            days_in_year: default_days_in_year(),
        }
    }
}

impl Config {
    /// Load settings from `config/lendr.toml`, overlaid with `LENDR__ENGINE__*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load settings from `path` (optional) and the environment.
    ///
    /// The `[engine]` section is optional; when absent the defaults apply. A file that
    /// exists but cannot be parsed is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("LENDR").separator("__"))
            .build()
            .map_err(|err| {
                ConfigError::Message(format!(
                    "failed to read configuration from {}: {}",
                    path.display(),
                    err
                ))
            })?;

        let config = match settings.get::<Config>("engine") {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Config::default(),
            Err(err) => return Err(err),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn precision(&self) -> MoneyPrecision {
        MoneyPrecision::new(self.currency_digits, self.rounding_epsilon)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.days_in_year == 0 {
            return Err(ConfigError::Message("days_in_year must be positive".into()));
        }
        if self.rounding_epsilon.is_sign_negative() {
            return Err(ConfigError::Message(
                "rounding_epsilon must not be negative".into(),
            ));
        }
        if self.currency_digits > 10 {
            return Err(ConfigError::Message(format!(
                "currency_digits {} exceeds the supported maximum of 10",
                self.currency_digits
            )));
        }
        Ok(())
    }
}
