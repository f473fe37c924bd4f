use std::env;
use std::fmt;
use std::time::Duration;

use crate::workflows::cleanup::CutoffError;

mod resolver;

pub use resolver::RunConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration gathered from the environment before any prompt.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub presets: PresetParameters,
    pub http: HttpConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let presets = PresetParameters {
            server_url: non_empty_var("IQ_SERVER_URL"),
            username: non_empty_var("IQ_USERNAME"),
            password: non_empty_var("IQ_PASSWORD"),
            cutoff_date: non_empty_var("IQ_CUTOFF_DATE"),
        };

        let timeout = match non_empty_var("IQ_HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            presets,
            http: HttpConfig { timeout },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Values that skip their interactive prompt when present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PresetParameters {
    pub server_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cutoff_date: Option<String>,
}

impl PresetParameters {
    /// Overlay `other` on top of `self`; set fields in `other` win.
    pub fn overridden_by(self, other: PresetParameters) -> Self {
        Self {
            server_url: other.server_url.or(self.server_url),
            username: other.username.or(self.username),
            password: other.password.or(self.password),
            cutoff_date: other.cutoff_date.or(self.cutoff_date),
        }
    }
}

impl fmt::Debug for PresetParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetParameters")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("cutoff_date", &self.cutoff_date)
            .finish()
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout: Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: raw.to_string(),
        }),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout { value: String },
    InvalidCutoff(CutoffError),
    MissingServerUrl,
    Prompt { field: &'static str, source: std::io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "IQ_HTTP_TIMEOUT_SECS must be a positive number of seconds, got '{value}'"
            ),
            ConfigError::InvalidCutoff(err) => {
                write!(f, "{err}")
            }
            ConfigError::MissingServerUrl => write!(f, "an IQ Server URL is required"),
            ConfigError::Prompt { field, .. } => write!(f, "could not read {field} from the terminal"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidTimeout { .. } | ConfigError::MissingServerUrl => None,
            ConfigError::InvalidCutoff(err) => Some(err),
            ConfigError::Prompt { source, .. } => Some(source),
        }
    }
}

impl From<CutoffError> for ConfigError {
    fn from(value: CutoffError) -> Self {
        Self::InvalidCutoff(value)
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

    // Blank rather than removed so a stray .env file cannot refill them.
    fn reset_env() {
        for key in [
            "IQ_SERVER_URL",
            "IQ_USERNAME",
            "IQ_PASSWORD",
            "IQ_CUTOFF_DATE",
            "IQ_HTTP_TIMEOUT_SECS",
        ] {
            env::set_var(key, "");
        }
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.presets, PresetParameters::default());
        assert_eq!(config.http.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn load_reads_presets_and_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("IQ_SERVER_URL", "http://localhost:8070");
        env::set_var("IQ_USERNAME", "admin");
        env::set_var("IQ_PASSWORD", "admin123");
        env::set_var("IQ_CUTOFF_DATE", "2023-01-01");
        env::set_var("IQ_HTTP_TIMEOUT_SECS", "12");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.presets.server_url.as_deref(), Some("http://localhost:8070"));
        assert_eq!(config.presets.password.as_deref(), Some("admin123"));
        assert_eq!(config.presets.cutoff_date.as_deref(), Some("2023-01-01"));
        assert_eq!(config.http.timeout, Duration::from_secs(12));
        assert!(!format!("{:?}", config.presets).contains("admin123"));
        reset_env();
    }

    #[test]
    fn rejects_invalid_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("IQ_HTTP_TIMEOUT_SECS", "0");
        match AppConfig::load() {
            Err(ConfigError::InvalidTimeout { value }) => assert_eq!(value, "0"),
            other => panic!("expected invalid timeout, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn overrides_take_precedence_field_by_field() {
        let env_presets = PresetParameters {
            server_url: Some("http://env:8070".to_string()),
            username: Some("env-user".to_string()),
            password: Some("env-pass".to_string()),
            cutoff_date: None,
        };
        let cli_presets = PresetParameters {
            server_url: Some("http://cli:8070".to_string()),
            cutoff_date: Some("2024-01-01".to_string()),
            ..PresetParameters::default()
        };

        let merged = env_presets.overridden_by(cli_presets);
        assert_eq!(merged.server_url.as_deref(), Some("http://cli:8070"));
        assert_eq!(merged.username.as_deref(), Some("env-user"));
        assert_eq!(merged.password.as_deref(), Some("env-pass"));
        assert_eq!(merged.cutoff_date.as_deref(), Some("2024-01-01"));
    }
}
