//! Layered configuration loading
//!
//! Sources, lowest precedence first: built-in defaults for the current
//! environment, `config/default.toml`, `config/{environment}.toml`, then
//! `BILLBOOK__`-prefixed environment variables such as
//! `BILLBOOK__SERVER__PORT=9000`. Missing files are skipped.

use bb_shared::{AppConfig, Environment, LoggingConfig};
use config::{Config, ConfigError, File, FileFormat};

/// Prefix of the environment variables that override file settings
pub const ENV_PREFIX: &str = "BILLBOOK";

/// Load the application configuration for the environment named by
/// `BILLBOOK_ENV` (or `ENVIRONMENT`)
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_for(Environment::from_env())
}

/// Load the application configuration for `environment`
pub fn load_config_for(environment: Environment) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig {
        environment,
        logging: LoggingConfig::for_environment(environment),
        ..AppConfig::default()
    };
    let defaults =
        serde_json::to_string(&defaults).map_err(|e| ConfigError::Message(e.to_string()))?;

    let settings = Config::builder()
        .add_source(File::from_str(&defaults, FileFormat::Json))
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(environment.config_name()).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins"),
        )
        .build()?;

    settings.try_deserialize()
}
