//! EventPublisher port - Interface for emitting domain events.
//!
//! Emitting never waits for handlers to finish. The returned [`Dispatch`]
//! may be dropped (fire-and-forget) or awaited where the caller needs to
//! know the handlers have settled, e.g. graceful shutdown or tests.

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::domain::events::{Event, RawEvent};
use crate::domain::foundation::DomainError;

/// Outcome counts for one emit, available once every handler has settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchSummary {
    /// Number of handlers that were invoked.
    pub fn invoked(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Handle to the handlers scheduled by one emit.
///
/// Dropping it does not cancel anything.
#[derive(Debug)]
pub struct Dispatch {
    scheduled: usize,
    task: Option<JoinHandle<DispatchSummary>>,
}

impl Dispatch {
    /// Wraps the task driving `scheduled` handlers.
    pub fn new(scheduled: usize, task: JoinHandle<DispatchSummary>) -> Self {
        Self {
            scheduled,
            task: Some(task),
        }
    }

    /// A dispatch with no handlers to run.
    pub fn empty() -> Self {
        Self {
            scheduled: 0,
            task: None,
        }
    }

    /// Number of handlers scheduled for this event.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Waits for every scheduled handler to finish.
    ///
    /// If the driving task itself was cancelled (runtime shutdown), all
    /// scheduled handlers are reported as failed.
    pub async fn settled(self) -> DispatchSummary {
        match self.task {
            Some(task) => task.await.unwrap_or(DispatchSummary {
                succeeded: 0,
                failed: self.scheduled,
            }),
            None => DispatchSummary::default(),
        }
    }
}

/// Port for emitting domain events.
///
/// Implementations must ensure:
/// - Handlers for the event's kind start in registration order
/// - A failing handler never fails the emit or stops other handlers
/// - Only structurally invalid input is reported to the caller
///
/// # Example
///
/// ```ignore
/// let event = Event::new(tenant_id, LessonCreated { /* ... */ });
/// bus.emit(event).await?; // dispatch dropped: fire-and-forget
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Schedule every handler registered for the event's kind.
    async fn emit(&self, event: Event) -> Result<Dispatch, DomainError>;

    /// Validate a loosely-typed event and emit it.
    ///
    /// Fails with `InvalidEventKind` if the tag is outside the taxonomy.
    async fn emit_raw(&self, raw: RawEvent) -> Result<Dispatch, DomainError> {
        let event = Event::try_from(raw)?;
        self.emit(event).await
    }
}
