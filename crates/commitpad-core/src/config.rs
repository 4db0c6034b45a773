//! Composer configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the draft database file
    pub database_path: PathBuf,
    /// Git executable used to create commits
    pub git_program: String,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("drafts.db"),
            git_program: "git".to_string(),
            log_filter: "info".to_string(),
        }
    }

    /// Defaults with `COMMITPAD_DB`, `COMMITPAD_GIT` and `COMMITPAD_LOG`
    /// overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading variables through `lookup`.
    /// Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::new(data_dir_from(&var));

        if let Some(path) = var("COMMITPAD_DB") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(program) = var("COMMITPAD_GIT") {
            config.git_program = program;
        }
        if let Some(filter) = var("COMMITPAD_LOG") {
            config.log_filter = filter;
        }

        config
    }

    /// Install the global subscriber, falling back to `log_filter` when
    /// `RUST_LOG` is unset
    pub fn init_logging(&self) {
        crate::init_logging_with(&self.log_filter);
    }

    /// Load a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.git_program.trim().is_empty() {
            return Err(CoreError::Config("git_program cannot be empty".to_string()));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(CoreError::Config("database_path cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn data_dir() -> PathBuf {
        data_dir_from(&|key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

/// Per-user data directory for the draft database, `.commitpad` in the
/// working directory when the platform location is unknown
fn data_dir_from<F>(var: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let base = if cfg!(target_os = "windows") {
        var("LOCALAPPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| PathBuf::from(home).join("Library").join("Application Support"))
    } else if cfg!(unix) {
        var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".local").join("share")))
    } else {
        None
    };

    base.map(|dir| dir.join("commitpad"))
        .unwrap_or_else(|| PathBuf::from(".commitpad"))
}
