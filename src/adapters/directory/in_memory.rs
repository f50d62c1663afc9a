//! In-memory enrollment directory for tests and local runs.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::{CourseId, DomainError, TenantId, UserId};
use crate::ports::EnrollmentDirectory;

#[derive(Debug, Default)]
struct Directory {
    courses: HashMap<(TenantId, CourseId), BTreeSet<UserId>>,
    tenants: HashMap<TenantId, BTreeSet<UserId>>,
}

/// Enrollment directory backed by in-process maps.
///
/// Enrolling a student in a course also makes them a member of the tenant.
#[derive(Debug, Default)]
pub struct InMemoryEnrollmentDirectory {
    inner: RwLock<Directory>,
}

impl InMemoryEnrollmentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enroll(&self, tenant_id: &TenantId, course_id: &CourseId, user_id: &UserId) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner
            .courses
            .entry((tenant_id.clone(), course_id.clone()))
            .or_default()
            .insert(user_id.clone());
        inner
            .tenants
            .entry(tenant_id.clone())
            .or_default()
            .insert(user_id.clone());
    }

    /// Add a tenant member without any course enrollment.
    pub fn add_member(&self, tenant_id: &TenantId, user_id: &UserId) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .tenants
            .entry(tenant_id.clone())
            .or_default()
            .insert(user_id.clone());
    }
}

#[async_trait]
impl EnrollmentDirectory for InMemoryEnrollmentDirectory {
    async fn students_in_course(
        &self,
        tenant_id: &TenantId,
        course_id: &CourseId,
    ) -> Result<Vec<UserId>, DomainError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .courses
            .get(&(tenant_id.clone(), course_id.clone()))
            .map(|students| students.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn students_in_tenant(&self, tenant_id: &TenantId) -> Result<Vec<UserId>, DomainError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .tenants
            .get(tenant_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }
}
