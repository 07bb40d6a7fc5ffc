use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ActorOverride, ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `mocctl` binary.
#[derive(Debug, Parser)]
#[command(
    name = "mocctl",
    version,
    about = "MOC Ledger - management of change records, risk, and audit"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Table colours: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Project root path (defaults to auto-detect via .moc)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Act as this user ID (overrides `[actor] id`)
    #[arg(long = "as", global = true, value_name = "USER_ID")]
    pub actor_id: Option<String>,

    /// Display name for the acting user (overrides `[actor] name`)
    #[arg(long = "as-name", global = true, value_name = "NAME")]
    pub actor_name: Option<String>,

    /// Role for the acting user (overrides `[actor] role`)
    #[arg(long = "as-role", global = true, value_name = "ROLE")]
    pub actor_role: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            color: self.color,
            project: self.project.clone(),
            actor: ActorOverride {
                id: self.actor_id.clone(),
                name: self.actor_name.clone(),
                role: self.actor_role.clone(),
            },
        }
    }
}
