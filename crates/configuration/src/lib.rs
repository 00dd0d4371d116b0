use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    Config, DisplayConfig, LoggingConfig, OutputFormat, RefreshConfig, SourcesConfig,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `BULLION__DISPLAY__CURRENCY=EUR`.
pub const ENV_PREFIX: &str = "BULLION";

/// Loads the application configuration.
///
/// Reads the TOML file at `path`, layers `BULLION__SECTION__KEY` environment
/// variables on top, deserializes the result into our strongly-typed `Config`
/// struct and validates it. Every setting has a default, so with
/// `required = false` a missing file yields the default configuration.
pub fn load_config(path: &Path, required: bool) -> Result<Config, ConfigError> {
    build_config(path, required, None)
}

/// Builds the layered configuration. `env` replaces the process environment
/// when given.
fn build_config(
    path: &Path,
    required: bool,
    env: Option<config::Map<String, String>>,
) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
