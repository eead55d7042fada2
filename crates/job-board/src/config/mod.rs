use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::applications::TransitionPolicy;

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
    pub backend: BackendConfig,
    pub workflow: WorkflowConfig,
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

        let backend = BackendConfig {
            url: non_empty_var("BACKEND_URL").map(|url| url.trim_end_matches('/').to_string()),
            service_key: non_empty_var("BACKEND_SERVICE_KEY"),
            jwt_secret: non_empty_var("BACKEND_JWT_SECRET"),
        };
        if backend.url.is_some() && backend.service_key.is_none() {
            return Err(ConfigError::MissingServiceKey);
        }
        let needs_secret = environment == AppEnvironment::Production || backend.url.is_some();
        if needs_secret && backend.jwt_secret.is_none() {
            return Err(ConfigError::MissingJwtSecret);
        }

        let transitions = match non_empty_var("APP_STATUS_TRANSITIONS") {
            Some(raw) => TransitionPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidTransitionPolicy { value: raw })?,
            None => TransitionPolicy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            backend,
            workflow: WorkflowConfig { transitions },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Connection settings for the hosted database and auth service.
///
/// When `url` is absent the service runs against the in-memory backend.
#[derive(Clone, Default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub jwt_secret: Option<String>,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("service_key", &self.service_key.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Application workflow knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowConfig {
    pub transitions: TransitionPolicy,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingServiceKey,
    MissingJwtSecret,
    InvalidTransitionPolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingServiceKey => {
                write!(f, "BACKEND_SERVICE_KEY is required when BACKEND_URL is set")
            }
            ConfigError::MissingJwtSecret => {
                write!(
                    f,
                    "BACKEND_JWT_SECRET is required in production and whenever BACKEND_URL is set"
                )
            }
            ConfigError::InvalidTransitionPolicy { value } => write!(
                f,
                "APP_STATUS_TRANSITIONS must be 'permissive' or 'forward_only' (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingServiceKey
            | ConfigError::MissingJwtSecret
            | ConfigError::InvalidTransitionPolicy { .. } => None,
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
            "BACKEND_URL",
            "BACKEND_SERVICE_KEY",
            "BACKEND_JWT_SECRET",
            "APP_STATUS_TRANSITIONS",
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
        assert!(config.backend.url.is_none());
        assert_eq!(config.workflow.transitions, TransitionPolicy::Permissive);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn backend_url_requires_service_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BACKEND_URL", "https://db.example.test/");
        let err = AppConfig::load().expect_err("service key missing");
        assert!(matches!(err, ConfigError::MissingServiceKey));

        env::set_var("BACKEND_SERVICE_KEY", "service-role");
        env::set_var("BACKEND_JWT_SECRET", "jwt-signing-secret");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.backend.url.as_deref(),
            Some("https://db.example.test")
        );
        let debug = format!("{:?}", config.backend);
        assert!(!debug.contains("service-role"));
        assert!(!debug.contains("jwt-signing-secret"));
        reset_env();
    }

    #[test]
    fn hosted_backend_requires_jwt_secret_outside_production() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BACKEND_URL", "https://db.example.test");
        env::set_var("BACKEND_SERVICE_KEY", "service-role");
        let err = AppConfig::load().expect_err("jwt secret missing");
        assert!(matches!(err, ConfigError::MissingJwtSecret));

        env::set_var("APP_ENV", "test");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingJwtSecret)
        ));
        reset_env();
    }

    #[test]
    fn production_requires_jwt_secret_even_in_memory() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingJwtSecret)
        ));

        env::set_var("BACKEND_JWT_SECRET", "jwt-signing-secret");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        reset_env();
    }

    #[test]
    fn parses_transition_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_STATUS_TRANSITIONS", "forward_only");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.workflow.transitions, TransitionPolicy::ForwardOnly);

        env::set_var("APP_STATUS_TRANSITIONS", "sideways");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidTransitionPolicy { .. })
        ));
        reset_env();
    }
}
