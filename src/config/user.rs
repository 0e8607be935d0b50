//! User configuration
//!
//! Loads optional overrides from `user.toml` or `.user.toml` in the home directory.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Config file names, tried in order
pub const CONFIG_FILES: [&str; 2] = ["user.toml", ".user.toml"];

/// Directory under home holding all checkouts
pub const DEFAULT_GIT_DIR: &str = "git";
pub const DEFAULT_REPO_URL: &str = "ssh://git@bitbucket:7999/lug/os-bs.git";
/// Directory `git clone` produces for the default remote
pub const DEFAULT_REPO_DIR: &str = "os-bs";
/// File whose presence marks a usable checkout
pub const DEFAULT_MARKER: &str = ".gitignore";

/// Errors that can occur during config operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("couldn't find a config file in {0}")]
    NotFound(PathBuf),
    #[error("there is no section {0} in the config file")]
    NoSection(String),
    #[error("there is no item {item} in section {section} in the config file")]
    NoItem { section: String, item: String },
}

/// Read and deserialize one config file
pub(crate) fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    debug!("Reading config from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The `[git]` table of the config file
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct GitSection {
    /// Base directory, `~` expands to home
    pub dir: Option<String>,
    /// Remote cloned by `osbs clone`
    pub repo_url: Option<String>,
    /// Directory the clone produces
    pub repo_dir: Option<String>,
    /// Validity marker file
    pub marker: Option<String>,
}

/// On-disk config file
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct UserConfig {
    #[serde(default)]
    pub git: GitSection,
}

impl UserConfig {
    /// Find the first config file present under `home`
    pub fn find(home: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| home.join(name))
            .find(|path| path.is_file())
    }

    /// Load the user config, or the default when no file exists
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let Some(path) = Self::find(home) else {
            debug!("No config file in {}", home.display());
            return Ok(Self::default());
        };

        read_toml(&path)
    }
}

/// Raw view of the config file for `osbs config`
///
/// Sections are the top-level tables; everything else at the top level is
/// ignored. Listing order is alphabetical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTable {
    table: toml::Table,
}

impl ConfigTable {
    /// Load the config file under `home`, which must exist
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let path = UserConfig::find(home).ok_or_else(|| ConfigError::NotFound(home.to_path_buf()))?;
        Ok(Self {
            table: read_toml(&path)?,
        })
    }

    fn section(&self, name: &str) -> Result<&toml::Table, ConfigError> {
        self.table
            .get(name)
            .and_then(toml::Value::as_table)
            .ok_or_else(|| ConfigError::NoSection(name.to_string()))
    }

    /// Names of all sections
    pub fn sections(&self) -> Vec<&str> {
        self.table
            .iter()
            .filter(|(_, value)| value.is_table())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Names of the items in `section`
    pub fn items(&self, section: &str) -> Result<Vec<&str>, ConfigError> {
        Ok(self.section(section)?.keys().map(String::as_str).collect())
    }

    /// One item, strings unquoted and trimmed
    pub fn get(&self, section: &str, item: &str) -> Result<String, ConfigError> {
        let value = self
            .section(section)?
            .get(item)
            .ok_or_else(|| ConfigError::NoItem {
                section: section.to_string(),
                item: item.to_string(),
            })?;

        Ok(match value {
            toml::Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
    }
}

/// Resolved settings every command works from
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base directory, `<home>/git` unless overridden
    pub git_dir: PathBuf,
    pub repo_url: String,
    pub repo_dir: String,
    pub marker: String,
}

impl Settings {
    /// Built-in settings rooted at `home`
    pub fn defaults(home: &Path) -> Self {
        Self {
            git_dir: home.join(DEFAULT_GIT_DIR),
            repo_url: DEFAULT_REPO_URL.to_string(),
            repo_dir: DEFAULT_REPO_DIR.to_string(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    /// Apply the overrides in `config` on top of the defaults
    pub fn resolve(home: &Path, config: UserConfig) -> Self {
        let mut settings = Self::defaults(home);
        let git = config.git;

        if let Some(dir) = git.dir {
            let expanded = PathBuf::from(dir.replace('~', &home.to_string_lossy()));
            // A configured directory that doesn't exist falls back to the default
            if expanded.is_dir() {
                settings.git_dir = expanded;
            } else {
                debug!(
                    "Configured git dir {} doesn't exist, using {}",
                    expanded.display(),
                    settings.git_dir.display()
                );
            }
        }
        if let Some(url) = git.repo_url {
            settings.repo_url = url;
        }
        if let Some(repo_dir) = git.repo_dir {
            settings.repo_dir = repo_dir;
        }
        if let Some(marker) = git.marker {
            settings.marker = marker;
        }

        settings
    }

    /// Load the user config under `home` and resolve it
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        Ok(Self::resolve(home, UserConfig::load(home)?))
    }
}

/// The invoking user's home directory
pub fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config_file() {
        let home = tempdir().unwrap();
        let settings = Settings::load(home.path()).unwrap();

        assert_eq!(settings.git_dir, home.path().join("git"));
        assert_eq!(settings.repo_url, DEFAULT_REPO_URL);
        assert_eq!(settings.repo_dir, "os-bs");
        assert_eq!(settings.marker, ".gitignore");
    }

    #[test]
    fn test_plain_name_preferred_over_dotfile() {
        let home = tempdir().unwrap();
        fs::write(home.path().join("user.toml"), "[git]\nrepo_dir = \"plain\"\n").unwrap();
        fs::write(home.path().join(".user.toml"), "[git]\nrepo_dir = \"dot\"\n").unwrap();

        let settings = Settings::load(home.path()).unwrap();
        assert_eq!(settings.repo_dir, "plain");
    }

    #[test]
    fn test_dotfile_used_when_alone() {
        let home = tempdir().unwrap();
        fs::write(
            home.path().join(".user.toml"),
            "[git]\nrepo_url = \"file:///srv/os-bs.git\"\n",
        )
        .unwrap();

        let settings = Settings::load(home.path()).unwrap();
        assert_eq!(settings.repo_url, "file:///srv/os-bs.git");
        assert_eq!(settings.repo_dir, DEFAULT_REPO_DIR);
    }

    #[test]
    fn test_git_dir_tilde_expansion() {
        let home = tempdir().unwrap();
        fs::create_dir(home.path().join("src")).unwrap();
        fs::write(home.path().join("user.toml"), "[git]\ndir = \"~/src\"\n").unwrap();

        let settings = Settings::load(home.path()).unwrap();
        assert_eq!(settings.git_dir, home.path().join("src"));
    }

    #[test]
    fn test_missing_configured_git_dir_falls_back() {
        let home = tempdir().unwrap();
        fs::write(home.path().join("user.toml"), "[git]\ndir = \"~/nowhere\"\n").unwrap();

        let settings = Settings::load(home.path()).unwrap();
        assert_eq!(settings.git_dir, home.path().join("git"));
    }

    #[test]
    fn test_empty_file_is_default() {
        let home = tempdir().unwrap();
        fs::write(home.path().join("user.toml"), "").unwrap();

        let config = UserConfig::load(home.path()).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let home = tempdir().unwrap();
        fs::write(home.path().join("user.toml"), "[git\ndir = ").unwrap();

        let result = Settings::load(home.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_table_queries() {
        let home = tempdir().unwrap();
        fs::write(
            home.path().join("user.toml"),
            "[git]\nrepo_url = \"  file:///srv/os-bs.git \"\nrepo_dir = \"os-bs\"\n\n[jira]\nboard = 7\n",
        )
        .unwrap();

        let table = ConfigTable::load(home.path()).unwrap();
        assert_eq!(table.sections(), vec!["git", "jira"]);
        assert_eq!(table.items("git").unwrap(), vec!["repo_dir", "repo_url"]);
        assert_eq!(table.get("git", "repo_url").unwrap(), "file:///srv/os-bs.git");
        assert_eq!(table.get("jira", "board").unwrap(), "7");
    }

    #[test]
    fn test_config_table_missing_section_and_item() {
        let home = tempdir().unwrap();
        fs::write(home.path().join(".user.toml"), "top = 1\n[git]\ndir = \"~/git\"\n").unwrap();

        let table = ConfigTable::load(home.path()).unwrap();
        assert_eq!(table.sections(), vec!["git"]);

        let err = table.items("jira").unwrap_err();
        assert!(matches!(err, ConfigError::NoSection(_)));
        assert_eq!(err.to_string(), "there is no section jira in the config file");

        // Plain values at the top level are not sections
        assert!(matches!(table.get("top", "x"), Err(ConfigError::NoSection(_))));

        let err = table.get("git", "repo_url").unwrap_err();
        assert_eq!(
            err.to_string(),
            "there is no item repo_url in section git in the config file"
        );
    }

    #[test]
    fn test_config_table_requires_file() {
        let home = tempdir().unwrap();
        let result = ConfigTable::load(home.path());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
