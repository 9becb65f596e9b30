//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "cachedeck";
const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
const DEFAULT_RETRY_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Command-line arguments for the cachedeck binary.
#[derive(Debug, Parser)]
#[command(name = "cachedeck", version, about = "Operator console for a tiered cache service")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "CACHEDECK_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the cache service base URL.
    #[arg(long = "service-url", env = "CACHEDECK_SERVICE_URL", value_name = "URL")]
    pub service_url: Option<String>,

    /// Override the dashboard stats refresh cadence.
    #[arg(long = "refresh-interval-seconds", value_name = "SECONDS")]
    pub refresh_interval_seconds: Option<u64>,

    /// Override the number of extra attempts for mutating calls.
    #[arg(long = "retry-max-retries", value_name = "COUNT")]
    pub retry_max_retries: Option<u32>,

    /// Override the base delay between retry attempts.
    #[arg(long = "retry-base-delay-ms", value_name = "MILLISECONDS")]
    pub retry_base_delay_ms: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub service: ServiceSettings,
    pub refresh: RefreshSettings,
    pub retry: RetrySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
}

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub interval: Duration,
}

#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse the command line and load settings in one step.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("CACHEDECK").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    service: RawServiceSettings,
    refresh: RawRefreshSettings,
    retry: RawRetrySettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServiceSettings {
    url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRefreshSettings {
    interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRetrySettings {
    max_retries: Option<u32>,
    base_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = overrides.service_url.as_ref() {
            self.service.url = Some(url.clone());
        }
        if let Some(seconds) = overrides.refresh_interval_seconds {
            self.refresh.interval_seconds = Some(seconds);
        }
        if let Some(count) = overrides.retry_max_retries {
            self.retry.max_retries = Some(count);
        }
        if let Some(delay) = overrides.retry_base_delay_ms {
            self.retry.base_delay_ms = Some(delay);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            service,
            refresh,
            retry,
            logging,
        } = raw;

        let service = build_service_settings(service)?;
        let refresh = build_refresh_settings(refresh)?;
        let retry = build_retry_settings(retry)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            service,
            refresh,
            retry,
            logging,
        })
    }
}

fn build_service_settings(service: RawServiceSettings) -> Result<ServiceSettings, LoadError> {
    let url_value = service
        .url
        .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());

    let base_url = Url::parse(url_value.trim())
        .map_err(|err| LoadError::invalid("service.url", format!("failed to parse: {err}")))?;

    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "service.url",
            format!("unsupported scheme `{}`", base_url.scheme()),
        ));
    }

    Ok(ServiceSettings { base_url })
}

fn build_refresh_settings(refresh: RawRefreshSettings) -> Result<RefreshSettings, LoadError> {
    let seconds = refresh
        .interval_seconds
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
    if seconds == 0 {
        return Err(LoadError::invalid(
            "refresh.interval_seconds",
            "must be greater than zero",
        ));
    }

    Ok(RefreshSettings {
        interval: Duration::from_secs(seconds),
    })
}

fn build_retry_settings(retry: RawRetrySettings) -> Result<RetrySettings, LoadError> {
    let max_retries = retry.max_retries.unwrap_or(DEFAULT_RETRY_MAX_RETRIES);

    let base_delay_ms = retry.base_delay_ms.unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS);
    if base_delay_ms == 0 {
        return Err(LoadError::invalid(
            "retry.base_delay_ms",
            "must be greater than zero",
        ));
    }

    Ok(RetrySettings {
        max_retries,
        base_delay: Duration::from_millis(base_delay_ms),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let settings = Settings::from_raw(RawSettings::default()).expect("defaults are valid");

        assert_eq!(settings.service.base_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(settings.refresh.interval, Duration::from_secs(30));
        assert_eq!(settings.retry.max_retries, 2);
        assert_eq!(settings.retry.base_delay, Duration::from_millis(1000));
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert!(matches!(settings.logging.format, LogFormat::Compact));
    }

    #[test]
    fn overrides_take_precedence() {
        let mut raw = RawSettings::default();
        raw.service.url = Some("http://file-host:9000".to_string());

        let overrides = Overrides {
            service_url: Some("https://cli-host:9443".to_string()),
            refresh_interval_seconds: Some(5),
            retry_max_retries: Some(0),
            retry_base_delay_ms: Some(250),
            log_level: Some("debug".to_string()),
            log_json: Some(true),
        };
        raw.apply_overrides(&overrides);

        let settings = Settings::from_raw(raw).expect("overridden settings are valid");
        assert_eq!(settings.service.base_url.host_str(), Some("cli-host"));
        assert_eq!(settings.refresh.interval, Duration::from_secs(5));
        assert_eq!(settings.retry.max_retries, 0);
        assert_eq!(settings.retry.base_delay, Duration::from_millis(250));
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert!(matches!(settings.logging.format, LogFormat::Json));
    }

    #[test]
    fn rejects_non_http_service_url() {
        let mut raw = RawSettings::default();
        raw.service.url = Some("ftp://cache-host".to_string());

        let error = Settings::from_raw(raw).expect_err("ftp scheme is rejected");
        assert!(matches!(
            error,
            LoadError::Invalid {
                key: "service.url",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_refresh_interval() {
        let mut raw = RawSettings::default();
        raw.refresh.interval_seconds = Some(0);

        let error = Settings::from_raw(raw).expect_err("zero interval is rejected");
        assert!(matches!(
            error,
            LoadError::Invalid {
                key: "refresh.interval_seconds",
                ..
            }
        ));
    }
}
