//! Repository methods on `MocService`, one module per resource.

pub mod asset;
pub mod audit;
pub mod change;
pub mod notification;

use moc_core::enums::Role;
use moc_core::errors::LifecycleError;
use moc_core::identity::Actor;

use crate::error::DatabaseError;

/// Administrative actions (purge, clear) are reserved to admins.
pub(crate) fn require_admin(actor: &Actor, action: &'static str) -> Result<(), DatabaseError> {
    if actor.role == Role::Admin {
        return Ok(());
    }
    Err(LifecycleError::Unauthorized {
        actor: actor.name.clone(),
        role: actor.role,
        action,
    }
    .into())
}
