//! Asset register repository.

use chrono::{NaiveDate, Utc};

use moc_core::entities::{Asset, AuditEntry, ChangeRequest, GlobalAuditEntry};
use moc_core::enums::{AuditAction, ResourceType};
use moc_core::errors::LifecycleError;
use moc_core::identity::Actor;
use moc_core::ids::{PREFIX_ASSET, PREFIX_AUDIT};

use crate::batch::WriteBatch;
use crate::error::DatabaseError;
use crate::repos::require_admin;
use crate::service::MocService;

/// Input for registering an asset. The ID is generated on create.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub facility: String,
    pub kind: String,
    pub commissioned_at: Option<NaiveDate>,
}

impl MocService {
    /// Register an asset.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` for an empty name, or
    /// `DatabaseError` if the write fails.
    pub async fn register_asset(
        &self,
        new: NewAsset,
        actor: &Actor,
    ) -> Result<Asset, DatabaseError> {
        if new.name.trim().is_empty() {
            return Err(LifecycleError::Validation(
                "asset name must not be empty".into(),
            )
            .into());
        }
        let asset = Asset {
            id: self.db().generate_id(PREFIX_ASSET).await?,
            name: new.name,
            facility: new.facility,
            kind: new.kind,
            commissioned_at: new.commissioned_at,
            created_at: Utc::now(),
        };

        let mut batch = WriteBatch::new();
        batch.put(&asset)?;
        batch.audit(
            self.asset_row(
                &asset.id,
                actor,
                AuditAction::AssetRegistered,
                format!("Registered asset \"{}\" at {}", asset.name, asset.facility),
            )
            .await?,
        );
        self.db().commit(batch).await?;
        tracing::debug!(id = %asset.id, "asset registered");
        Ok(asset)
    }

    /// Load one asset.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no asset has this ID.
    pub async fn get_asset(&self, id: &str) -> Result<Asset, DatabaseError> {
        self.db()
            .get_record::<Asset>(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("asset", id))
    }

    /// Registered assets, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_assets(&self, limit: Option<u32>) -> Result<Vec<Asset>, DatabaseError> {
        let limit = limit.map_or(usize::MAX, |l| l as usize);
        let mut assets = self.db().list_records::<Asset>().await?;
        assets.truncate(limit);
        Ok(assets)
    }

    /// Remove an asset from the register. Admin only.
    ///
    /// Change requests that reference the asset keep the reference; their
    /// history is untouched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Lifecycle` (unauthorized) for non-admins, or
    /// `DatabaseError::NotFound` for an unknown ID.
    pub async fn purge_asset(&self, id: &str, actor: &Actor) -> Result<Asset, DatabaseError> {
        require_admin(actor, "purge assets")?;
        let asset = self.get_asset(id).await?;
        let referencing = self
            .db()
            .list_records::<ChangeRequest>()
            .await?
            .iter()
            .filter(|cr| cr.asset_id() == Some(id))
            .count();

        let mut batch = WriteBatch::new();
        batch.delete::<Asset>(id)?;
        batch.audit(
            self.asset_row(
                id,
                actor,
                AuditAction::AssetPurged,
                format!(
                    "Purged asset \"{}\" ({referencing} change requests reference it)",
                    asset.name
                ),
            )
            .await?,
        );
        self.db().commit(batch).await?;
        tracing::warn!(id, referencing, actor = %actor.id, "asset purged");
        Ok(asset)
    }

    async fn asset_row(
        &self,
        asset_id: &str,
        actor: &Actor,
        action: AuditAction,
        details: String,
    ) -> Result<GlobalAuditEntry, DatabaseError> {
        Ok(GlobalAuditEntry {
            resource_type: ResourceType::Asset,
            resource_id: asset_id.to_string(),
            entry: AuditEntry {
                id: self.db().generate_id(PREFIX_AUDIT).await?,
                timestamp: Utc::now(),
                user_id: actor.id.clone(),
                user: actor.name.clone(),
                action,
                details,
                transition: None,
            },
        })
    }
}
