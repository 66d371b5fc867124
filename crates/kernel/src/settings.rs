use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Maximum page size for calls to the database.
pub const MAX_PAGE_SIZE: u32 = 500;

const ENV_VAR_NAME: &str = "APP_ENV";
const CONFIG_DIR_ENV: &str = "SHELFIE_CONFIG_DIR";
const ENV_PREFIX: &str = "SHELFIE";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Only an explicit `production` selects the production parameter set.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "Settings::default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME)
            .map(|name| Environment::from_name(&name))
            .unwrap_or_default();

        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, environment)
    }

    /// Load configuration from `config_dir` for an already-selected environment.
    pub fn load_from(config_dir: &Path, environment: Environment) -> anyhow::Result<Self> {
        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment.as_str()));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = environment;
        settings.max_page_size = MAX_PAGE_SIZE;

        match environment {
            Environment::Production => {
                tracing::debug!("running with production configuration")
            }
            Environment::Development => {
                tracing::debug!("running with development configuration")
            }
        }

        Ok(settings)
    }

    /// Database parameters for the active environment.
    pub fn current_database(&self) -> &DatabaseParams {
        self.database.current(self.environment)
    }

    fn default_max_page_size() -> u32 {
        MAX_PAGE_SIZE
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            max_page_size: MAX_PAGE_SIZE,
            server: ServerSettings::default(),
            database: DatabaseSettings::default(),
            telemetry: TelemetrySettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "localhost".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Connection parameters for one database account.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct DatabaseParams {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub key: String,
}

/// Per-environment database parameter sets.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub production: DatabaseParams,
    #[serde(default = "DatabaseSettings::default_development")]
    pub development: DatabaseParams,
}

impl DatabaseSettings {
    pub fn current(&self, environment: Environment) -> &DatabaseParams {
        match environment {
            Environment::Production => &self.production,
            Environment::Development => &self.development,
        }
    }

    fn default_development() -> DatabaseParams {
        DatabaseParams {
            endpoint: "https://localhost:8081/".to_string(),
            key: String::new(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            production: DatabaseParams::default(),
            development: Self::default_development(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
