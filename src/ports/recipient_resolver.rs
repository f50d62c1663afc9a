//! Recipient resolution ports.
//!
//! `RecipientResolver` decides who hears about an event; `EnrollmentDirectory`
//! is the read-side query collaborator it usually delegates to.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::events::Event;
use crate::domain::foundation::{CourseId, DomainError, TenantId, UserId};

/// Resolves the set of users who should be notified about an event.
#[async_trait]
pub trait RecipientResolver: Send + Sync {
    /// Returns the recipients. An empty set is a valid answer.
    async fn resolve_recipients(&self, event: &Event) -> Result<BTreeSet<UserId>, DomainError>;
}

/// Query collaborator over enrollment data.
#[async_trait]
pub trait EnrollmentDirectory: Send + Sync {
    /// Students enrolled in a course.
    async fn students_in_course(
        &self,
        tenant_id: &TenantId,
        course_id: &CourseId,
    ) -> Result<Vec<UserId>, DomainError>;

    /// Every student belonging to a tenant.
    async fn students_in_tenant(&self, tenant_id: &TenantId) -> Result<Vec<UserId>, DomainError>;
}
