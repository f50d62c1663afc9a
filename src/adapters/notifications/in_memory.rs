//! In-memory notification store for tests and local runs.

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId, TenantId, UserId};
use crate::domain::notification::NotificationRecord;
use crate::ports::NotificationStore;

/// Append-only vector of records behind a lock.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    records: RwLock<Vec<NotificationRecord>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record in insertion order.
    pub fn all(&self) -> Vec<NotificationRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn owned_by(record: &NotificationRecord, user_id: &UserId, tenant_id: &TenantId) -> bool {
        &record.user_id == user_id && &record.tenant_id == tenant_id
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn save(&self, record: &NotificationRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records.iter().any(|r| r.id == record.id) {
            return Err(DomainError::new(
                ErrorCode::PersistenceFailure,
                format!("Notification {} already exists", record.id),
            ));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn mark_all_read(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
    ) -> Result<u64, DomainError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let mut changed = 0;
        for record in records
            .iter_mut()
            .filter(|r| Self::owned_by(r, user_id, tenant_id) && !r.is_read)
        {
            record.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn mark_read(&self, id: &NotificationId, user_id: &UserId) -> Result<(), DomainError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let record = records
            .iter_mut()
            .find(|r| &r.id == id && &r.user_id == user_id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::NotificationNotFound,
                    format!("Notification {} not found", id),
                )
            })?;
        record.is_read = true;
        Ok(())
    }

    async fn unread_count(&self, user_id: &UserId, tenant_id: &TenantId) -> Result<u64, DomainError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .iter()
            .filter(|r| Self::owned_by(r, user_id, tenant_id) && !r.is_read)
            .count() as u64)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, DomainError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut owned: Vec<NotificationRecord> = records
            .iter()
            .filter(|r| Self::owned_by(r, user_id, tenant_id))
            .cloned()
            .collect();
        // Ties keep insertion order, so reversing puts the latest save first.
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        owned.reverse();
        owned.truncate(limit as usize);
        Ok(owned)
    }
}
