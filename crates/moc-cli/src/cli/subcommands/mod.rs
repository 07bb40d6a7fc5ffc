mod asset;
mod change;
mod notification;
mod risk;
mod task;

pub use asset::AssetCommands;
pub use change::ChangeCommands;
pub use notification::NotificationCommands;
pub use risk::RiskCommands;
pub use task::TaskCommands;
