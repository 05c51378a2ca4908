//! User configuration loaded from `~/.config/planner/config.toml`.
//!
//! Every field is optional in the file. Precedence is
//! CLI flag / environment > config file > defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dashboard::DEFAULT_RECENT_LIMIT;
use crate::store::ImportMode;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the task collection and preferences live.
    pub data_dir: Option<PathBuf>,
    /// Strategy used by `import` when no `--mode` is given.
    pub import_mode: ImportMode,
    /// Document loaded as the initial collection on a fresh install.
    pub seed_path: Option<PathBuf>,
    /// Number of entries in the dashboard's recent activity list.
    pub recent_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            import_mode: ImportMode::default(),
            seed_path: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Config {
    /// Loads the config at `path`, or defaults when the file does not exist.
    /// A file that exists but fails to parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Data directory after applying an override from the command line or
    /// environment.
    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        default_data_dir()
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| Error::Other("Could not determine config directory".to_string()))?;
    Ok(dir.join("planner").join("config.toml"))
}

pub fn default_data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(dir.join("planner"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.import_mode, ImportMode::Replace);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "import_mode = \"append\"\nseed_path = \"/srv/seed.json\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.import_mode, ImportMode::Append);
        assert_eq!(config.seed_path, Some(PathBuf::from("/srv/seed.json")));
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "import_mode = \"merge\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_data_dir_precedence() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_data_dir(Some(Path::new("/from/cli"))).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(config.resolve_data_dir(None).unwrap(), PathBuf::from("/from/config"));
    }
}
