use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Config;
use crate::error::{MoveForwardError, Result};

const CONFIG_FILE_NAME: &str = ".move-forward.json";

/// File-backed config store using a single pretty-printed JSON document.
///
/// # Example
/// ```no_run
/// use move_forward::config::ConfigStore;
///
/// let store = ConfigStore::new_default();
/// let mut config = store.load()?;
/// config.forward_url = Some("http://localhost:3000/webhooks".to_string());
/// store.save(&config)?;
/// # Ok::<(), move_forward::error::MoveForwardError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn new_default() -> Self {
        Self::new(Self::default_path())
    }

    /// `~/.move-forward.json`, or the working directory without a home.
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config; a missing file is an empty config.
    pub fn load(&self) -> Result<Config> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, starting empty");
                return Ok(Config::default());
            }
            Err(err) => {
                return Err(MoveForwardError::ConfigIo(format!(
                    "cannot read {}: {err}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_str(&raw).map_err(|err| {
            MoveForwardError::ConfigIo(format!("malformed {}: {err}", self.path.display()))
        })
    }

    /// Rewrite the whole file; owner-only on unix since it holds the token.
    pub fn save(&self, config: &Config) -> Result<()> {
        Self::ensure_parent(&self.path)?;
        let serialized = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, serialized).map_err(|err| {
            MoveForwardError::ConfigIo(format!("cannot write {}: {err}", self.path.display()))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
