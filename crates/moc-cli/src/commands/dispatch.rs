use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Change { action } => commands::change::handle(&action, ctx, flags).await,
        Commands::Task { action } => commands::task::handle(&action, ctx, flags).await,
        Commands::Asset { action } => commands::asset::handle(&action, ctx, flags).await,
        Commands::Notifications { action } => {
            commands::notification::handle(&action, ctx, flags).await
        }
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Advise(args) => commands::advise::handle(&args, ctx, flags).await,
        Commands::Init(_) | Commands::Risk { .. } | Commands::Schema(_) => {
            anyhow::bail!("init, risk, and schema run without a project context")
        }
    }
}
