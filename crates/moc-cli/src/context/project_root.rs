use std::path::{Path, PathBuf};

use anyhow::Context;
use moc_config::PROJECT_DIR;

/// Walk upwards from `start` until a `.moc` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Project root from `--project`, or discovered from the current directory.
///
/// `--project` may name the root or its `.moc` directory.
pub fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit.file_name().and_then(|name| name.to_str()) == Some(PROJECT_DIR) {
            return explicit
                .parent()
                .map(Path::to_path_buf)
                .context("invalid --project path: '.moc' directory has no parent");
        }
        if explicit.join(PROJECT_DIR).is_dir() {
            return Ok(explicit);
        }
        anyhow::bail!(
            "invalid --project '{}': no .moc directory. Run 'mocctl init' there first.",
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    find_project_root(&start)
        .context("not a MOC project (no .moc directory found). Run 'mocctl init' first.")
}
