use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::sheet::RefreshSchedule;

const DEFAULT_REFRESH_SECS: u64 = 30;
const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub pricing: PricingConfig,
    pub sheet: SheetConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let currency_symbol = env::var("FARE_CURRENCY_SYMBOL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());

        let path = env::var("FARE_SHEET_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let refresh_secs = match env::var("FARE_SHEET_REFRESH_SECS") {
            Ok(raw) => parse_refresh_secs(&raw)?,
            Err(_) => DEFAULT_REFRESH_SECS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pricing: PricingConfig { currency_symbol },
            sheet: SheetConfig {
                path,
                refresh_interval: Duration::from_secs(refresh_secs),
            },
        })
    }
}

fn parse_refresh_secs(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidRefreshInterval {
            value: raw.to_string(),
        }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Presentation settings for quotes and operator blurbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    pub currency_symbol: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// Where the fare sheet lives and how often it is reloaded.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub path: Option<PathBuf>,
    pub refresh_interval: Duration,
}

impl SheetConfig {
    pub fn schedule(&self) -> RefreshSchedule {
        RefreshSchedule::new(self.refresh_interval)
    }

    pub fn require_path(&self) -> Result<&PathBuf, ConfigError> {
        self.path.as_ref().ok_or(ConfigError::MissingSheetPath)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRefreshInterval { value: String },
    MissingSheetPath,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRefreshInterval { value } => write!(
                f,
                "FARE_SHEET_REFRESH_SECS must be a positive number of seconds, got '{value}'"
            ),
            ConfigError::MissingSheetPath => {
                write!(f, "no fare sheet configured: pass --path or set FARE_SHEET_PATH")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidRefreshInterval { .. }
            | ConfigError::MissingSheetPath => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "FARE_SHEET_PATH",
            "FARE_SHEET_REFRESH_SECS",
            "FARE_CURRENCY_SYMBOL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.pricing.currency_symbol, "₹");
        assert!(config.sheet.path.is_none());
        assert_eq!(config.sheet.refresh_interval, Duration::from_secs(30));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_sheet_and_currency_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FARE_SHEET_PATH", "/tmp/fares.csv");
        env::set_var("FARE_SHEET_REFRESH_SECS", "5");
        env::set_var("FARE_CURRENCY_SYMBOL", "$");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.sheet.path, Some(PathBuf::from("/tmp/fares.csv")));
        assert_eq!(config.sheet.refresh_interval, Duration::from_secs(5));
        assert_eq!(config.pricing.currency_symbol, "$");
        reset_env();
    }

    #[test]
    fn rejects_zero_refresh_interval() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FARE_SHEET_REFRESH_SECS", "0");
        let error = AppConfig::load().expect_err("zero interval rejected");
        assert!(matches!(error, ConfigError::InvalidRefreshInterval { .. }));
        reset_env();
    }
}
