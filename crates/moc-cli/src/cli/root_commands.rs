use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AssetCommands, ChangeCommands, NotificationCommands, RiskCommands, TaskCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create `.moc/` with a default config and an empty database.
    Init(InitArgs),
    /// Change requests and their workflow.
    Change {
        #[command(subcommand)]
        action: ChangeCommands,
    },
    /// Checklist tasks on a change request.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Asset register.
    Asset {
        #[command(subcommand)]
        action: AssetCommands,
    },
    /// Notification panel.
    Notifications {
        #[command(subcommand)]
        action: NotificationCommands,
    },
    /// Risk calculator (no project needed).
    Risk {
        #[command(subcommand)]
        action: RiskCommands,
    },
    /// Query the global audit log.
    Audit(AuditArgs),
    /// Technical advice for a change request.
    Advise(AdviseArgs),
    /// Print the JSON schema of a record type.
    Schema(SchemaArgs),
}

/// Arguments for `mocctl init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing `.moc/config.toml`.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `mocctl audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// `change_request` or `asset`.
    #[arg(long = "type")]
    pub resource_type: Option<String>,
    /// Resource ID.
    #[arg(long)]
    pub resource: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
}

/// Arguments for `mocctl advise`.
#[derive(Clone, Debug, Args)]
pub struct AdviseArgs {
    pub id: String,
    #[arg(long, default_value = "What are the key technical risks of this change?")]
    pub prompt: String,
}

/// Arguments for `mocctl schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub type_name: String,
}
