//! Recipient resolution backed by the enrollment directory.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::events::{Event, EventPayload};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{EnrollmentDirectory, RecipientResolver};

/// Maps each event kind to the audience it concerns.
///
/// | Event              | Recipients                       |
/// |--------------------|----------------------------------|
/// | lesson created     | students enrolled in the course  |
/// | course updated     | students enrolled in the course  |
/// | course published   | every student of the tenant      |
/// | user enrolled      | the enrolled user                |
/// | assignment graded  | the graded student               |
/// | lesson completed   | nobody                           |
pub struct EnrollmentRecipientResolver {
    directory: Arc<dyn EnrollmentDirectory>,
}

impl EnrollmentRecipientResolver {
    pub fn new(directory: Arc<dyn EnrollmentDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl RecipientResolver for EnrollmentRecipientResolver {
    async fn resolve_recipients(&self, event: &Event) -> Result<BTreeSet<UserId>, DomainError> {
        let tenant_id = event.tenant_id();

        let recipients = match event.payload() {
            EventPayload::LessonCreated(p) => self
                .directory
                .students_in_course(tenant_id, &p.course_id)
                .await?
                .into_iter()
                .collect(),
            EventPayload::CourseUpdated(p) => self
                .directory
                .students_in_course(tenant_id, &p.course_id)
                .await?
                .into_iter()
                .collect(),
            EventPayload::CoursePublished(_) => self
                .directory
                .students_in_tenant(tenant_id)
                .await?
                .into_iter()
                .collect(),
            EventPayload::UserEnrolled(p) => BTreeSet::from([p.user_id.clone()]),
            EventPayload::AssignmentGraded(p) => BTreeSet::from([p.student_id.clone()]),
            EventPayload::LessonCompleted(_) => BTreeSet::new(),
        };

        Ok(recipients)
    }
}
