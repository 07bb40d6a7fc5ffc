//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default database location, relative to the project root.
fn default_db_path() -> String {
    ".moc/moc.db".to_string()
}

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Path of the libSQL database file. Relative paths resolve against the
    /// project root.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            default_limit: default_limit(),
        }
    }
}
