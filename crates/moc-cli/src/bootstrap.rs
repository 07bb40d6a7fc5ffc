use std::path::Path;

use anyhow::Context;

/// Load `.env` from the project root, falling back to the usual lookup from
/// the current directory. Values already in the environment win.
pub fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}
