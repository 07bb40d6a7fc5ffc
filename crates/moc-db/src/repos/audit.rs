//! Global audit log repository.
//!
//! The `audit_log` table is insert-only (enforced by triggers). Rows are
//! written through `WriteBatch`; this module reads them back, merges them with
//! a record's own history, and exports that history.

use std::path::Path;

use anyhow::Context;

use moc_core::audit_trail::merge;
use moc_core::entities::{AuditEntry, GlobalAuditEntry};
use moc_core::enums::{AuditAction, ResourceType};
use moc_core::ids::PREFIX_AUDIT;
use moc_core::report::ChangeReport;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::MocService;

/// Filter criteria for global audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub resource_type: Option<ResourceType>,
    pub resource_id: Option<String>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

impl MocService {
    /// Query the global audit log, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row does not parse.
    pub async fn query_audit(
        &self,
        filter: &AuditFilter,
    ) -> Result<Vec<GlobalAuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(rt) = filter.resource_type {
            params.push(libsql::Value::Text(rt.as_str().to_string()));
            conditions.push(format!("resource_type = ?{}", params.len()));
        }
        if let Some(ref rid) = filter.resource_id {
            params.push(libsql::Value::Text(rid.clone()));
            conditions.push(format!("resource_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit_clause = filter
            .limit
            .map_or_else(String::new, |limit| format!("LIMIT {limit}"));
        let sql = format!(
            "SELECT id, resource_type, resource_id, action, user_id, user_name, details, transition, created_at
             FROM audit_log {where_clause}
             ORDER BY created_at, rowid {limit_clause}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            let transition = get_opt_string(&row, 7)?
                .map(|raw| serde_json::from_str(&raw))
                .transpose()?;
            entries.push(GlobalAuditEntry {
                resource_type: parse_enum(&row.get::<String>(1)?)?,
                resource_id: row.get::<String>(2)?,
                entry: AuditEntry {
                    id: row.get::<String>(0)?,
                    timestamp: parse_datetime(&row.get::<String>(8)?)?,
                    user_id: row.get::<String>(4)?,
                    user: row.get::<String>(5)?,
                    action: parse_enum(&row.get::<String>(3)?)?,
                    details: get_opt_string(&row, 6)?.unwrap_or_default(),
                    transition,
                },
            });
        }
        Ok(entries)
    }

    /// Full history of a change request: its own log merged with the global
    /// rows about it, chronological.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown ID.
    pub async fn history(&self, change_id: &str) -> Result<Vec<AuditEntry>, DatabaseError> {
        let record = self.get_change(change_id).await?;
        let global: Vec<AuditEntry> = self
            .query_audit(&AuditFilter {
                resource_type: Some(ResourceType::ChangeRequest),
                resource_id: Some(change_id.to_string()),
                ..AuditFilter::default()
            })
            .await?
            .into_iter()
            .map(|row| row.entry)
            .collect();
        Ok(merge(record.audit_log().entries(), &global))
    }

    /// Report snapshot with the merged history attached.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown ID.
    pub async fn change_report(&self, change_id: &str) -> Result<ChangeReport, DatabaseError> {
        let record = self.get_change(change_id).await?;
        let history = self.history(change_id).await?;
        Ok(ChangeReport::from_record(&record, history))
    }

    /// Write the merged history as JSON Lines, one entry per line.
    ///
    /// Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown ID, or
    /// `DatabaseError::Other` if the file cannot be written.
    pub async fn export_history(
        &self,
        change_id: &str,
        path: &Path,
    ) -> Result<usize, DatabaseError> {
        let history = self.history(change_id).await?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        serde_jsonlines::write_json_lines(path, &history)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(change_id, path = %path.display(), entries = history.len(), "history exported");
        Ok(history.len())
    }

    /// Global copy of a record-local entry, sharing its timestamp and user.
    pub(crate) async fn global_copy(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        entry: &AuditEntry,
    ) -> Result<GlobalAuditEntry, DatabaseError> {
        Ok(GlobalAuditEntry {
            resource_type,
            resource_id: resource_id.to_string(),
            entry: AuditEntry {
                id: self.db().generate_id(PREFIX_AUDIT).await?,
                ..entry.clone()
            },
        })
    }
}
