use std::fs;
use std::path::{Path, PathBuf};

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const SESSION_FILE_PREFIX: &str = "session-";
const KEY_LENGTH: usize = 16;

#[derive(Default, Serialize, Deserialize)]
struct SessionFile {
    api_base_url: String,
    #[serde(default)]
    cookie: Option<String>,
}

/// Session cookie persisted between invocations, one file per API URL.
pub struct SessionStore {
    file_path: PathBuf,
    file: SessionFile,
}

impl SessionStore {
    pub fn load(dir: &Path, api_base_url: &str) -> AppResult<Self> {
        let path = dir.join(format!(
            "{SESSION_FILE_PREFIX}{}.json",
            Self::compute_key(api_base_url)
        ));
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<SessionFile>(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid session file: {err}")))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => SessionFile {
                api_base_url: api_base_url.to_string(),
                cookie: None,
            },
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn cookie(&self) -> Option<&str> {
        self.file.cookie.as_deref()
    }

    pub fn set_cookie(&mut self, cookie: Option<String>) {
        self.file.cookie = cookie;
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.file)
            .map_err(|err| AppError::Configuration(format!("failed to write session: {err}")))?;
        write_private(&self.file_path, data.as_bytes())
    }

    pub fn clear(&mut self) -> AppResult<()> {
        self.file.cookie = None;
        match fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn compute_key(api_base_url: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(api_base_url.trim_end_matches('/').as_bytes());
        let mut key = hasher.finalize().to_hex().to_string();
        key.truncate(KEY_LENGTH);
        key
    }
}

/// The cookie is a live credential: the file is readable by its owner only.
#[cfg(unix)]
fn write_private(path: &Path, data: &[u8]) -> AppResult<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(data)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, data: &[u8]) -> AppResult<()> {
    fs::write(path, data)?;
    Ok(())
}
