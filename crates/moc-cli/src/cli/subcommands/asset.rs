use chrono::NaiveDate;
use clap::Subcommand;

/// Asset register commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AssetCommands {
    /// Register an asset.
    Add {
        name: String,
        #[arg(long)]
        facility: String,
        #[arg(long, default_value = "equipment")]
        kind: String,
        /// Commissioning date, YYYY-MM-DD.
        #[arg(long)]
        commissioned: Option<NaiveDate>,
    },
    /// List registered assets.
    List,
    /// Show one asset.
    Show { id: String },
    /// Remove an asset from the register (admin).
    Purge { id: String },
}
