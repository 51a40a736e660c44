use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// API key baked into the binary. Leave empty to resolve the key from the
/// key file or an interactive prompt instead.
pub const BUILT_IN_API_KEY: &str = "";

const KEY_FILE_NAME: &str = "api_key.txt";

/// Default directory for the key file and the favorites file.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "skycast", "skycast")
        .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

    Ok(dirs.data_dir().to_path_buf())
}

/// Plain-text storage for the OpenWeather API key: a single trimmed string,
/// written verbatim with no trailing newline.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn open_default() -> Result<Self> {
        Ok(Self { path: default_data_dir()?.join(KEY_FILE_NAME) })
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self { path: dir.join(KEY_FILE_NAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configured key, preferring the baked-in override over the
    /// key file. `None` when neither yields a non-empty string.
    #[allow(clippy::const_is_empty)]
    pub fn load(&self) -> Result<Option<String>> {
        if !BUILT_IN_API_KEY.trim().is_empty() {
            return Ok(Some(BUILT_IN_API_KEY.trim().to_string()));
        }

        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read API key file: {}", self.path.display()))?;

        let key = contents.trim();
        if key.is_empty() { Ok(None) } else { Ok(Some(key.to_string())) }
    }

    /// Overwrites the key file with exactly `key`, creating parent
    /// directories as needed.
    pub fn save(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        fs::write(&self.path, key)
            .with_context(|| format!("Failed to write API key file: {}", self.path.display()))?;

        Ok(())
    }
}
