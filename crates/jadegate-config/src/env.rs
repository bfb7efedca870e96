//! `JADEGATE_*` environment variable overrides, applied after the user
//! config file and before an explicit CLI flag.

use std::path::PathBuf;
use std::str::FromStr;

use jadegate_telemetry::LogFormat;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Apply any set `JADEGATE_*` environment variables on top of `config`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if a set variable cannot be
/// parsed into its field's type.
pub(crate) fn apply_env(mut config: Config) -> ConfigResult<Config> {
    if let Ok(v) = std::env::var("JADEGATE_LOG_LEVEL") {
        config.log_level = v;
    }
    if let Ok(v) = std::env::var("JADEGATE_LOG_FORMAT") {
        config.log_format = LogFormat::from_str(&v).map_err(|e| ConfigError::InvalidEnvVar {
            var: "JADEGATE_LOG_FORMAT",
            value: v,
            reason: e.to_string(),
        })?;
    }
    if let Ok(v) = std::env::var("JADEGATE_TRUST_DIR") {
        config.trust_dir = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("JADEGATE_POLICY_PATH") {
        config.policy_path = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("JADEGATE_AUDIT_LOG_PATH") {
        config.audit_log_path = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("JADEGATE_DEFAULT_TIMEOUT_SECS") {
        config.default_timeout_secs = v.parse().map_err(|e: std::num::ParseFloatError| {
            ConfigError::InvalidEnvVar {
                var: "JADEGATE_DEFAULT_TIMEOUT_SECS",
                value: v,
                reason: e.to_string(),
            }
        })?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn env_overrides_apply_on_top_of_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("JADEGATE_LOG_LEVEL", "debug");
        std::env::set_var("JADEGATE_DEFAULT_TIMEOUT_SECS", "42.5");

        let config = apply_env(Config::default()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!((config.default_timeout_secs - 42.5).abs() < f64::EPSILON);

        std::env::remove_var("JADEGATE_LOG_LEVEL");
        std::env::remove_var("JADEGATE_DEFAULT_TIMEOUT_SECS");
    }

    #[test]
    fn invalid_timeout_env_var_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("JADEGATE_DEFAULT_TIMEOUT_SECS", "not-a-number");
        let result = apply_env(Config::default());
        std::env::remove_var("JADEGATE_DEFAULT_TIMEOUT_SECS");
        assert!(result.is_err());
    }
}
