//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// One-time passcode configuration.
    #[serde(default)]
    pub otp: OtpConfig,
}

/// One-time passcode configuration.
///
/// The code length is fixed at six digits and is not configurable; only
/// the validity window varies by deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    /// Seconds an issued code stays valid.
    #[serde(default = "default_code_ttl")]
    pub code_ttl_secs: u64,
}

fn default_code_ttl() -> u64 {
    600 // 10 minutes
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: default_code_ttl(),
        }
    }
}

impl OtpConfig {
    /// Returns the validity window as a [`chrono::Duration`].
    #[must_use]
    pub fn code_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.code_ttl_secs).unwrap_or(i64::MAX))
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("OFFBOARD").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl_is_ten_minutes() {
        let config = OtpConfig::default();
        assert_eq!(config.code_ttl_secs, 600);
        assert_eq!(config.code_ttl(), chrono::Duration::minutes(10));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let config = OtpConfig { code_ttl_secs: 0 };
        assert_eq!(config.code_ttl(), chrono::Duration::zero());
    }
}
