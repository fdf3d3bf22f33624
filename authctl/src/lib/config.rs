use std::env;
use std::path::Path;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::FileFormat;
use replay_auth::PasswordSettings;
use replay_auth::TokenSettings;
use serde::Deserialize;

pub const DEFAULT_CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "REPLAY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub jwt: TokenSettings,
    #[serde(default)]
    pub password: PasswordSettings,
}

/// REPLAY_JWT__SECRET_KEY=... overrides jwt.secret_key
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (REPLAY_JWT__SECRET_KEY, REPLAY_PASSWORD__TIME_COST, etc.)
    /// 2. Environment-specific config file ({dir}/{RUN_MODE}.toml)
    /// 3. Default config file ({dir}/default.toml)
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_layers(dir, &run_mode, environment())
    }

    fn load_layers(
        dir: &Path,
        run_mode: &str,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let default_file = dir.join("default");
        let mode_file = dir.join(run_mode);

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name(&default_file.to_string_lossy()).required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&mode_file.to_string_lossy()).required(false))
            .add_source(environment)
            .build()?;

        configuration.try_deserialize()
    }

    /// Parse configuration from a TOML document, without file or environment layers.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
