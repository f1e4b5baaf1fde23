//! Layered service configuration.
//!
//! Sources, lowest precedence first:
//! 1. the `Default` of the settings struct,
//! 2. an optional TOML file,
//! 3. environment variables `<PREFIX>__<FIELD>` (nested with `__`).

use crate::args::ServiceArgs;
use config::{Config, Environment, File};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Whether error responses may carry internal detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunEnvironment {
    Development,
    #[default]
    Production,
}

impl RunEnvironment {
    pub fn is_development(&self) -> bool {
        matches!(self, RunEnvironment::Development)
    }
}

/// Loads settings for `service`.
///
/// # Arguments
///
/// * `service` - Service name, used for the default file `config/<service>`.
/// * `env_prefix` - Prefix of the environment variables, e.g. `ANALYTICS`.
/// * `args` - Parsed command-line arguments.
/// * `defaults` - Values used for every key no other source sets.
///
/// # Returns
///
/// * The merged settings. The port from `args` is applied by the caller.
pub fn load_settings<T>(
    service: &str,
    env_prefix: &str,
    args: &ServiceArgs,
    defaults: &T,
) -> Result<T, ConfigError>
where
    T: Serialize + DeserializeOwned,
{
    let path = args.config_path(service);
    info!("Loading {} configuration from {:?} and {}__*", service, path, env_prefix);

    let settings = Config::builder()
        .add_source(Config::try_from(defaults)?)
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        port: u16,
        environment: RunEnvironment,
        name: String,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                port: 3000,
                environment: RunEnvironment::Production,
                name: "sample".to_string(),
            }
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let args = ServiceArgs::new(Some("does/not/exist.toml".into()), None);
        let s: Sample = load_settings("sample", "TRADING_CORE_TEST_NONE", &args, &Sample::default()).unwrap();
        assert_eq!(s, Sample::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("trading-core-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "port = 4100\nenvironment = \"development\"").unwrap();

        let args = ServiceArgs::new(Some(path), None);
        let s: Sample = load_settings("sample", "TRADING_CORE_TEST_FILE", &args, &Sample::default()).unwrap();
        assert_eq!(s.port, 4100);
        assert!(s.environment.is_development());
        assert_eq!(s.name, "sample");
    }
}
