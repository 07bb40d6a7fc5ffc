use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use moc_config::{MocConfig, PROJECT_DIR};
use moc_db::MocDb;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    config_path: String,
    config_written: bool,
    db_path: String,
}

/// Handle `mocctl init`.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let project_root = match flags.project.as_deref() {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let response = init_project(&project_root, args.force).await?;
    output(&response, flags.format)
}

async fn init_project(project_root: &Path, force: bool) -> anyhow::Result<InitResponse> {
    let project_dir = project_root.join(PROJECT_DIR);
    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("failed to create {}", project_dir.display()))?;

    let config_path = project_dir.join("config.toml");
    let config_written = force || !config_path.exists();
    if config_written {
        let rendered = toml::to_string_pretty(&MocConfig::default())
            .context("failed to render default configuration")?;
        std::fs::write(&config_path, rendered)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    } else {
        tracing::info!(path = %config_path.display(), "keeping existing config");
    }

    let config = MocConfig::load_for_project(project_root)
        .context("failed to load configuration")?;
    let db_path = config.db_path(project_root);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    MocDb::open_local(&db_path.to_string_lossy())
        .await
        .with_context(|| format!("failed to initialize database at {}", db_path.display()))?;

    Ok(InitResponse {
        project_root: project_root.display().to_string(),
        config_path: config_path.display().to_string(),
        config_written,
        db_path: db_path.display().to_string(),
    })
}
