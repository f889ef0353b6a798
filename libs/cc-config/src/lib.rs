//! Layered configuration: defaults, an optional YAML file, then
//! environment variable overrides. Each module defines its own typed
//! config struct and loads its slice of the merged document; this
//! crate only owns the merge order and the env var prefix convention.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Serialize, de::DeserializeOwned};

pub const CONFIG_PATH_ENV_VAR: &str = "CONTROL_CORE_CONFIG";
pub const ENV_PREFIX: &str = "CONTROL_CORE_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

/// Builds the merged configuration document: `defaults` first, then an
/// optional YAML file (path from `CONTROL_CORE_CONFIG`), then
/// `CONTROL_CORE_`-prefixed environment variables, each layer
/// overriding the one before it.
///
/// # Errors
///
/// Returns [`ConfigError::Load`] if the YAML file is malformed or the
/// merged document does not deserialize into `T`.
pub fn load<T>(defaults: T) -> Result<T, ConfigError>
where
    T: Serialize + DeserializeOwned,
{
    let mut figment = Figment::new().merge(Serialized::defaults(defaults));
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV_VAR) {
        figment = figment.merge(Yaml::file(path));
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
    Ok(figment.extract()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct SampleConfig {
        bind_addr: String,
        max_connections: u32,
    }

    impl Default for SampleConfig {
        fn default() -> Self {
            Self { bind_addr: "0.0.0.0:8080".to_owned(), max_connections: 10 }
        }
    }

    #[test]
    fn defaults_round_trip_with_no_overrides() {
        let config: SampleConfig = load(SampleConfig::default()).unwrap();
        assert_eq!(config, SampleConfig::default());
    }

    #[test]
    fn env_override_wins_over_defaults() {
        temp_env::with_var("CONTROL_CORE_MAX_CONNECTIONS", Some("42"), || {
            let config: SampleConfig = load(SampleConfig::default()).unwrap();
            assert_eq!(config.max_connections, 42);
        });
    }
}
