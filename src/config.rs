use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Tokio worker threads. 0 = runtime default.
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins. `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection string, e.g. `sqlite:data/rapport.db`.
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/rapport.db".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Symmetric signing secret for session tokens. Override via
    /// `RAPPORT_JWT_SECRET` in production.
    pub jwt_secret: String,

    pub jwt_issuer: String,

    pub jwt_audience: String,

    pub jwt_expiry_hours: u32,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "rapport-dev-secret-change-me".to_string(),
            jwt_issuer: "rapport".to_string(),
            jwt_audience: "rapport-api".to_string(),
            jwt_expiry_hours: 24,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("RAPPORT_CONFIG") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("rapport").join("config.toml"));
        }

        paths
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("RAPPORT_JWT_SECRET")
            && !secret.is_empty()
        {
            self.security.jwt_secret = secret;
        }

        if let Ok(url) = std::env::var("RAPPORT_DATABASE_URL")
            && !url.is_empty()
        {
            self.database.url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.jwt_secret.is_empty() {
            anyhow::bail!("security.jwt_secret must not be empty");
        }

        if self.security.jwt_expiry_hours == 0 {
            anyhow::bail!("security.jwt_expiry_hours must be at least 1");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("database.url must not be empty");
        }

        if self.database.max_connections < self.database.min_connections {
            anyhow::bail!("database.max_connections must be >= database.min_connections");
        }

        Ok(())
    }
}
