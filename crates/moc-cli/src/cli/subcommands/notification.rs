use clap::Subcommand;

/// Notification panel commands.
#[derive(Clone, Debug, Subcommand)]
pub enum NotificationCommands {
    /// List notifications, newest last.
    List,
    /// Remove every notification (admin). Audit logs are kept.
    Clear,
}
