use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub display: DisplayConfig,
    pub refresh: RefreshConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks the cross-field rules that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.window == 0 {
            return Err(ConfigError::ValidationError(
                "display.window must be at least 1".to_string(),
            ));
        }
        if !d.volatility_alert_pct.is_finite() || d.volatility_alert_pct < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "display.volatility_alert_pct must be a non-negative number, got {}",
                d.volatility_alert_pct
            )));
        }
        if d.summary_max_words == 0 {
            return Err(ConfigError::ValidationError(
                "display.summary_max_words must be at least 1".to_string(),
            ));
        }
        validate_currency(&d.currency)?;
        if self.refresh.interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "refresh.interval must be greater than zero".to_string(),
            ));
        }
        if self.sources.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "sources.timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Checks that `code` looks like an ISO 4217 currency code.
pub fn validate_currency(code: &str) -> Result<(), ConfigError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::ValidationError(format!(
            "currency must be a three-letter code, got '{}'",
            code
        )));
    }
    Ok(())
}

/// Where prices, headlines and exchange rates are loaded from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Path or http(s) URL of the metals document.
    pub metals: String,
    /// Path or http(s) URL of the news document.
    pub news: String,
    /// Public exchange-rate endpoint. When unset, the rates shipped in the
    /// metals document are used.
    pub rates_url: Option<String>,
    /// Timeout applied to every HTTP request.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            metals: "data/metals.json".to_string(),
            news: "data/news.json".to_string(),
            rates_url: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// How results are presented.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency prices are converted into. Unknown codes show USD figures.
    pub currency: String,
    /// Trailing window, in data points, for the windowed statistics.
    pub window: usize,
    /// Volatility (in percent) above which a metal is flagged.
    pub volatility_alert_pct: f64,
    pub summary_max_words: usize,
    pub format: OutputFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            window: 30,
            volatility_alert_pct: 2.0,
            summary_max_words: 25,
            format: OutputFormat::Table,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Delay between refreshes in `watch` mode.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[rstest]
    #[case("EUR", true)]
    #[case("gbp", true)]
    #[case("EURO", false)]
    #[case("E1R", false)]
    #[case("", false)]
    fn test_validate_currency(#[case] code: &str, #[case] ok: bool) {
        assert_eq!(validate_currency(code).is_ok(), ok);
    }

    #[rstest]
    fn test_negative_alert_threshold_is_rejected() {
        let mut config = Config::default();
        config.display.volatility_alert_pct = -1.0;
        assert!(config.validate().is_err());
    }

    #[rstest]
    fn test_zero_refresh_interval_is_rejected() {
        let mut config = Config::default();
        config.refresh.interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
