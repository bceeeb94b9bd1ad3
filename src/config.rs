use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ticket::Source;
use crate::error::{AppError, AppResult};

const APP_DIR: &str = "soporte";
const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub timeout: Duration,
    pub default_source: Source,
}

impl AppConfig {
    /// Stored settings, overridden by `SOPORTE_API_URL` and `SOPORTE_TIMEOUT_SECS`.
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(
            stored,
            env::var("SOPORTE_API_URL").ok(),
            env::var("SOPORTE_TIMEOUT_SECS").ok(),
        )
    }

    fn resolve(
        stored: StoredConfig,
        api_url_override: Option<String>,
        timeout_override: Option<String>,
    ) -> AppResult<Self> {
        let api_url = api_url_override
            .or(stored.api_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let timeout_secs = match timeout_override.or(stored.timeout_secs) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Configuration(format!("invalid timeout '{raw}', expected seconds"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let default_source = match stored.default_source.as_deref() {
            Some(raw) => Source::from_str(raw).ok_or_else(|| {
                AppError::Configuration(format!("unknown default source '{raw}'"))
            })?,
            None => Source::default(),
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            default_source,
        })
    }
}

/// Settings persisted by `soporte config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<String>,
    pub default_source: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Ok(dir) = env::var("SOPORTE_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| AppError::Configuration("no configuration directory available".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
