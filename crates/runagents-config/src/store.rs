//! File-backed persistence for [`ConfigRecord`].
//!
//! # Design
//! - One JSON document per user, read at most once and written at most once
//!   per invocation; there is no locking, the last writer wins.
//! - The containing directory and the file are restricted to the owner on Unix.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::{ConfigError, ConfigResult};
use crate::model::ConfigRecord;

/// Location of the persisted configuration record.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at an explicit file path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.runagents/config.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeDirUnavailable`] when the home directory
    /// cannot be resolved.
    pub fn from_home() -> ConfigResult<Self> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirUnavailable)?;
        Ok(Self::at(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record, falling back to [`ConfigRecord::default`]
    /// when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(&self) -> ConfigResult<ConfigRecord> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file; using defaults");
                return Ok(ConfigRecord::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    operation: "read config file",
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Persist the record as indented JSON with owner-only permissions.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, record: &ConfigRecord) -> ConfigResult<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            create_private_dir(dir).map_err(|source| ConfigError::Io {
                operation: "create config directory",
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let data =
            serde_json::to_vec_pretty(record).map_err(|source| ConfigError::Serialize { source })?;

        write_private_file(&self.path, &data).map_err(|source| ConfigError::Io {
            operation: "write config file",
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn write_private_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(data)?;

    // `mode` applies only when the file is created.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
