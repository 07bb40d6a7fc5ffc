pub mod advise;
pub mod asset;
pub mod audit;
pub mod change;
pub mod dispatch;
pub mod init;
pub mod notification;
pub mod risk;
pub mod schema;
pub mod shared;
pub mod task;
