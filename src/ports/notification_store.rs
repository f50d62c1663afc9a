//! NotificationStore port - persistence of notification records.
//!
//! The bus never owns durability; the dispatcher hands each record to this
//! collaborator and moves on.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NotificationId, TenantId, UserId};
use crate::domain::notification::NotificationRecord;

/// Port for storing and reading notification records.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a freshly created record.
    async fn save(&self, record: &NotificationRecord) -> Result<(), DomainError>;

    /// Mark every unread notification of a user in a tenant as read.
    ///
    /// Returns the number of records changed.
    async fn mark_all_read(&self, user_id: &UserId, tenant_id: &TenantId)
        -> Result<u64, DomainError>;

    /// Mark a single notification as read.
    ///
    /// # Errors
    ///
    /// `NotificationNotFound` if the id does not exist or belongs to another user.
    async fn mark_read(&self, id: &NotificationId, user_id: &UserId) -> Result<(), DomainError>;

    /// Count unread notifications of a user in a tenant.
    async fn unread_count(&self, user_id: &UserId, tenant_id: &TenantId)
        -> Result<u64, DomainError>;

    /// Most recent notifications first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, DomainError>;
}
