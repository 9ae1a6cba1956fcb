use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8281";
pub const API_URL_ENV: &str = "HELPDESK_API_URL";
pub const CONFIG_DIR_ENV: &str = "HELPDESK_CONFIG_DIR";

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub default_username: Option<String>,
    pub config_dir: PathBuf,
}

impl AppConfig {
    /// Resolves the API URL as flag, then environment, then stored file, then
    /// the default.
    pub fn load(api_url_flag: Option<String>) -> AppResult<Self> {
        let config_dir = config_directory()?;
        let stored = StoredConfig::load_from(&config_dir)?;
        let api_base_url = resolve_api_url(
            api_url_flag,
            env::var(API_URL_ENV).ok(),
            stored.api_base_url.clone(),
        )?;

        Ok(Self {
            api_base_url,
            default_username: stored.default_username,
            config_dir,
        })
    }
}

pub fn resolve_api_url(
    flag: Option<String>,
    environment: Option<String>,
    stored: Option<String>,
) -> AppResult<String> {
    let candidate = [flag, environment, stored]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    if !(candidate.starts_with("http://") || candidate.starts_with("https://")) {
        return Err(AppError::Configuration(format!(
            "API URL must start with http:// or https://, got '{candidate}'"
        )));
    }
    Ok(candidate.trim_end_matches('/').to_string())
}

/// Settings persisted by `helpdesk config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_username: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_directory()?)
    }

    pub fn load_from(dir: &Path) -> AppResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_directory()?)
    }

    pub fn save_to(&self, dir: &Path) -> AppResult<()> {
        fs::create_dir_all(dir)?;
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(dir.join(CONFIG_FILE_NAME), data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "aurum", "helpdesk")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            AppError::Configuration("cannot determine a configuration directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
