//! # moc-config
//!
//! Layered configuration loading for MOC Ledger using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MOC_*` prefix, `__` as separator)
//! 2. Project-level `.moc/config.toml`
//! 3. User-level `~/.config/moc/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MOC_ACTOR__ROLE` -> `actor.role`,
//! `MOC_WORKFLOW__REQUIRE_PRE_TASKS_FOR_CLOSE` ->
//! `workflow.require_pre_tasks_for_close`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use moc_config::MocConfig;
//!
//! let config = MocConfig::load_with_dotenv().expect("config");
//! let policy = config.workflow.policy().expect("valid workflow section");
//! ```

mod actor;
mod error;
mod general;
mod workflow;

pub use actor::ActorConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use workflow::WorkflowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project directory holding config and database.
pub const PROJECT_DIR: &str = ".moc";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MocConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub actor: ActorConfig,
}

impl MocConfig {
    /// Load configuration from all sources, reading the project file from the
    /// current directory.
    ///
    /// Does NOT call `dotenvy`; use [`MocConfig::load_with_dotenv`] for `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration for the project rooted at `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        Self::figment_for(project_root)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Provider chain with the project file looked up in the current directory.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain for a project root.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("MOC_").split("__"))
    }

    /// Database path resolved against `project_root` when relative.
    #[must_use]
    pub fn db_path(&self, project_root: &Path) -> PathBuf {
        let path = PathBuf::from(&self.general.db_path);
        if path.is_absolute() || self.general.db_path == ":memory:" {
            path
        } else {
            project_root.join(path)
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moc").join("config.toml"))
    }

    /// Load `.env` from the workspace root, then the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
