//! XDG-compliant path resolution for taskling.
//!
//! Resolves the config/data/state/cache directories following the XDG Base
//! Directory Specification. The task database lives under the data dir, as
//! do the optional classifier model artifacts.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(taskling::paths::no_home),
        help("Set the HOME environment variable or ensure a valid user profile exists.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(taskling::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Global XDG-compliant directories for taskling.
#[derive(Debug, Clone)]
pub struct TasklingPaths {
    /// `$XDG_CONFIG_HOME/taskling/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/taskling/`
    pub data_dir: PathBuf,
    /// `$XDG_STATE_HOME/taskling/`
    pub state_dir: PathBuf,
    /// `$XDG_CACHE_HOME/taskling/`
    pub cache_dir: PathBuf,
}

impl TasklingPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("taskling");

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("taskling");

        let state_dir = std::env::var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/state"))
            .join("taskling");

        let cache_dir = std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".cache"))
            .join("taskling");

        Ok(Self {
            config_dir,
            data_dir,
            state_dir,
            cache_dir,
        })
    }

    /// Directory holding the redb task database.
    pub fn db_dir(&self) -> PathBuf {
        self.data_dir.join("tasks")
    }

    /// Directory scanned for classifier model artifacts
    /// (`priority_model.json`, `category_model.json`, `intent_model.json`).
    pub fn models_dir(&self) -> PathBuf {
        self.data_dir.join("models")
    }

    /// Create all base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [
            &self.config_dir,
            &self.data_dir,
            &self.state_dir,
            &self.cache_dir,
            &self.db_dir(),
            &self.models_dir(),
        ] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}
